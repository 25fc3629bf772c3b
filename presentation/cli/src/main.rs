use std::process::ExitCode;

use clap::Parser;
use dotenvy::dotenv;

mod cli;

use cli::Cli;

/// One-shot client: connects to the MCP server, asks a single question and
/// prints the answer.
#[tokio::main]
async fn main() -> ExitCode {
    // .env first so clap's env fallbacks see it
    dotenv().ok();

    let cli = Cli::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(cli.log_filter()));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    openai::config::warn_missing_vars();

    match cli::run(cli).await {
        Ok(answer) => {
            println!("\nResult: {}", answer);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
