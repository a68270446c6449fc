mod cmd;

use std::process::ExitCode;

use clap::Parser;
use cmd::config::{ConsumeArgs, Effective};
use cmd::error::ConsumerError;

#[derive(Parser)]
#[command(name = "relay-consumer", about = "Чтение сообщений из Kafka до Ctrl+C")]
struct Cli {
    #[command(flatten)]
    args: ConsumeArgs,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), ConsumerError> {
    let eff = Effective::new(&cli.args)?;
    cmd::consume::run(eff).await
}
