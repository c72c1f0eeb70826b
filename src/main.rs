use anyhow::Context;
use clap::Parser;
use climo_import::cli::{run, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run(cli).await.context("climatology import failed")
}
