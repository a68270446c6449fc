use std::time::Duration;

use clap::Args;

use relay_client::{ClientConfig, RelayConfig};

use super::error::ConsumerError;

#[derive(Args, Clone, Debug)]
pub struct ConsumeArgs {
    /// Путь к kafka.toml
    #[arg(long, default_value = "config/kafka.toml", env = "RELAY_CONFIG")]
    pub config: String,

    /// Таймаут одного poll (напр. 500ms, 1s)
    #[arg(long, default_value = "1s", value_parser = humantime::parse_duration)]
    pub timeout: Duration,

    /// Topic. Без указания — consumer.topic из конфига
    #[arg(long)]
    pub topic: Option<String>,
}

/// Итоговая конфигурация: kafka.toml < CLI.
pub struct Effective {
    pub config_path: String,
    pub timeout: Duration,
    pub topic: String,
    pub group_id: String,
    pub client: ClientConfig,
}

impl Effective {
    pub fn new(args: &ConsumeArgs) -> Result<Self, ConsumerError> {
        let cfg = RelayConfig::load(&args.config)?;
        Self::from_config(args, &cfg)
    }

    pub fn from_config(args: &ConsumeArgs, cfg: &RelayConfig) -> Result<Self, ConsumerError> {
        let section = cfg.consumer()?;
        Ok(Self {
            config_path: args.config.clone(),
            timeout: args.timeout,
            topic: args.topic.clone().unwrap_or_else(|| section.topic.clone()),
            group_id: section.group_id.clone(),
            client: cfg.consumer_client_config()?,
        })
    }
}
