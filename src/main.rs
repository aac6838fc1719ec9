use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use kindred::{load_books, load_movies, ItemId, UserRating};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Recommendation engine for book and movie catalogs
#[derive(Parser, Debug)]
#[command(name = "kindred")]
#[command(about = "Resolve titles and rank recommendations from precomputed similarity data", long_about = None)]
struct Args {
    /// Path to the dataset directory
    #[arg(short, long, default_value = "./data")]
    data_dir: PathBuf,

    /// Which catalog to load
    #[arg(long, value_enum, default_value_t = Catalog::Books)]
    catalog: Catalog,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Catalog {
    Books,
    Movies,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve a free-text title and list its most similar items
    Related {
        title: String,
    },
    /// Show catalog metadata for a stable id (ISBN or movie id)
    Describe {
        id: String,
    },
    /// Show the strongest TF-IDF features of a title (movies only)
    Explain {
        title: String,
        /// Compare against a second title instead
        #[arg(long)]
        with: Option<String>,
        #[arg(short, long, default_value_t = 10)]
        count: usize,
    },
    /// Personalized recommendations from a ratings file
    /// (JSON array of {"title", "rating"})
    Recommend {
        ratings: PathBuf,
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// List the most popular catalog items
    Popular {
        #[arg(short, long, default_value_t = 10)]
        count: usize,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting kindred v{}", env!("CARGO_PKG_VERSION"));
    info!("Data directory: {:?}", args.data_dir);

    let engine = match args.catalog {
        Catalog::Books => load_books(&args.data_dir)
            .with_context(|| format!("loading book dataset from {:?}", args.data_dir))?,
        Catalog::Movies => load_movies(&args.data_dir)
            .with_context(|| format!("loading movie dataset from {:?}", args.data_dir))?,
    };
    info!("Catalog loaded: {} index entries", engine.catalog().len());

    match args.command {
        Command::Related { title } => print_json(&engine.related(&title)?),
        Command::Describe { id } => {
            let id = match id.parse::<u64>() {
                Ok(numeric) => ItemId::Id(numeric),
                Err(_) => ItemId::Isbn(id),
            };
            print_json(&engine.describe(&id)?)
        }
        Command::Explain { title, with, count } => match with {
            Some(other) => print_json(&engine.explain_pair(&title, &other, count)?),
            None => print_json(&engine.explain(&title, count)?),
        },
        Command::Recommend { ratings, limit } => {
            let file = std::fs::File::open(&ratings)
                .with_context(|| format!("opening ratings file {:?}", ratings))?;
            let history: Vec<UserRating> =
                serde_json::from_reader(std::io::BufReader::new(file))
                    .context("parsing ratings file")?;
            validate_ratings(&history)?;
            print_json(&engine.recommend_for_user(&history, limit))
        }
        Command::Popular { count } => print_json(&engine.popular(count)),
    }
}

/// Rating bounds are the caller's responsibility, and here the CLI is the
/// caller.
fn validate_ratings(history: &[UserRating]) -> anyhow::Result<()> {
    for entry in history {
        if !(1..=10).contains(&entry.rating) {
            anyhow::bail!(
                "rating for '{}' is {}, must be 1-10",
                entry.title,
                entry.rating
            );
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
