#![allow(clippy::print_stdout)]

use clap::Parser;
use kissj_cli::{Cli, run};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let outcome = run(Cli::parse()).await?;
    println!("{outcome}");
    Ok(())
}
