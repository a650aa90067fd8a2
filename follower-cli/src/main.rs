use clap::Parser;
use follower_cli::Cli;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    follower_cli::run(Cli::parse()).await
}
