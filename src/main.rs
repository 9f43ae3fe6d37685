use anyhow::Result;
use chainscope::cli::CliArgs;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    chainscope::run(args).await
}
