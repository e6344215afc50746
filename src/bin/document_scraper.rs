use anyhow::Result;
use clap::Parser;
use serp_links::cli::{self, DocumentArgs};
use serp_links::logging::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let config = DocumentArgs::parse().into_config()?;
    cli::run(&config, "document links").await
}
