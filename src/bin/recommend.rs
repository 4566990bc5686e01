use clap::Parser;
use tracing_subscriber::EnvFilter;

use cinematch_api::config::{build_recommender, Config};

/// One-shot recommendation query
///
/// Prints the ranked movies as a JSON array on stdout. Any failure exits with
/// status 1.
#[derive(Parser, Debug)]
#[command(name = "recommend")]
#[command(about = "Recommend movies for a free-text description", long_about = None)]
struct Args {
    /// Free-text description of the desired movie
    query: String,

    /// Number of results (defaults to DEFAULT_TOP_N)
    #[arg(short = 'n', long)]
    top_n: Option<usize>,

    /// Comma-separated keyword hints
    #[arg(long)]
    keywords: Option<String>,

    /// Comma-separated genre hints
    #[arg(long)]
    genres: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // stdout carries the JSON result
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    let recommender = build_recommender(&config)?;

    let results = recommender
        .try_recommend(
            &args.query,
            args.top_n.unwrap_or(config.default_top_n),
            args.keywords.as_deref(),
            args.genres.as_deref(),
        )
        .await?;

    println!("{}", serde_json::to_string(&results)?);
    Ok(())
}
