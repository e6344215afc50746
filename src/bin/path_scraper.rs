use anyhow::Result;
use clap::Parser;
use serp_links::cli::{self, PathArgs};
use serp_links::logging::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let config = PathArgs::parse().into_config()?;
    cli::run(&config, "paths").await
}
