//! seed-content entrypoint

use anyhow::Result;
use clap::Parser;

use content_pipeline::cli::{self, SeedCli};

#[tokio::main]
async fn main() -> Result<()> {
    cli::init_tracing();

    // No arguments beyond --help/--version
    SeedCli::parse();
    cli::run_seed().await
}
