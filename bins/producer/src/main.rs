mod cmd;

use std::process::ExitCode;

use clap::Parser;
use cmd::config::{Effective, ProduceArgs};
use cmd::error::ProducerError;

#[derive(Parser)]
#[command(name = "relay-producer", about = "Отправка тестовых сообщений в Kafka")]
struct Cli {
    #[command(flatten)]
    args: ProduceArgs,
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

/// Конфиг, соединение и отправка. Любая ошибка до начала цикла — exit 1.
async fn run(cli: Cli) -> Result<(), ProducerError> {
    let eff = Effective::new(&cli.args)?;
    cmd::produce::run(eff).await
}
