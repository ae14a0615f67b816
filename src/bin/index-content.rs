//! index-content entrypoint

use anyhow::Result;
use clap::Parser;

use content_pipeline::cli::{self, IndexCli};

#[tokio::main]
async fn main() -> Result<()> {
    cli::init_tracing();

    // No arguments beyond --help/--version
    IndexCli::parse();
    cli::run_index().await
}
