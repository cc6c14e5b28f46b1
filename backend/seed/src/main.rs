use std::path::PathBuf;

use clap::Parser;
use seed::DEFAULT_SEED_PATH;
use server::{config::Config, state::AppState};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Seed file with colleges and research papers.
    #[arg(long, default_value = DEFAULT_SEED_PATH)]
    path: PathBuf,

    /// Leave existing reviews in place.
    #[arg(long)]
    keep_reviews: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let seed_file = seed::utils::load_seed(&args.path)?;
    let state = AppState::new(Config::load()?).await?;

    let report = seed::load_catalog(state.store.as_ref(), seed_file, args.keep_reviews).await?;

    println!("Colleges: {}", report.colleges);
    println!("Papers: {}", report.papers);
    if !report.skipped.is_empty() {
        println!("Skipped: {}", report.skipped.join(", "));
    }

    Ok(())
}
