use std::time::Duration;

use clap::Args;

use relay_api::DEFAULT_PRODUCER;
use relay_client::{ClientConfig, RelayConfig};

use super::error::ProducerError;

// ═══════════════════════════════════════════════════════════════
//  CLI args
// ═══════════════════════════════════════════════════════════════

#[derive(Args, Clone, Debug)]
pub struct ProduceArgs {
    /// Путь к kafka.toml
    #[arg(long, default_value = "config/kafka.toml", env = "RELAY_CONFIG")]
    pub config: String,

    /// Количество сообщений
    #[arg(long, default_value_t = 10)]
    pub count: u64,

    /// Пауза между отправками (напр. 500ms, 1s, 2m)
    #[arg(long, default_value = "1s", value_parser = humantime::parse_duration)]
    pub interval: Duration,

    /// Topic. Без указания — producer.topic из конфига
    #[arg(long)]
    pub topic: Option<String>,

    /// Значение поля `producer` в сообщениях
    #[arg(long, default_value = DEFAULT_PRODUCER)]
    pub name: String,
}

// ═══════════════════════════════════════════════════════════════
//  Effective — merged config
// ═══════════════════════════════════════════════════════════════

/// Итоговая конфигурация: kafka.toml < CLI.
pub struct Effective {
    pub config_path: String,
    pub count: u64,
    pub interval: Duration,
    pub topic: String,
    pub producer_name: String,
    pub client: ClientConfig,
}

impl Effective {
    pub fn new(args: &ProduceArgs) -> Result<Self, ProducerError> {
        let cfg = RelayConfig::load(&args.config)?;
        Self::from_config(args, &cfg)
    }

    pub fn from_config(args: &ProduceArgs, cfg: &RelayConfig) -> Result<Self, ProducerError> {
        let section = cfg.producer()?;
        Ok(Self {
            config_path: args.config.clone(),
            count: args.count,
            interval: args.interval,
            topic: args.topic.clone().unwrap_or_else(|| section.topic.clone()),
            producer_name: args.name.clone(),
            client: cfg.producer_client_config()?,
        })
    }
}
