use std::collections::BTreeMap;

use rdkafka::config::ClientConfig;
use serde::Deserialize;

use crate::error::ClientError;

// ═══════════════════════════════════════════════════════════════
//  Config file (TOML)
// ═══════════════════════════════════════════════════════════════

/// Содержимое `kafka.toml`: соединение + секции producer/consumer.
///
/// Значения не валидируются, только переводятся в librdkafka-ключи.
/// Отсутствующие поля в карту не попадают.
#[derive(Debug, Deserialize)]
pub struct RelayConfig {
    pub kafka: KafkaConnection,
    #[serde(default)]
    pub producer: Option<ProducerSection>,
    #[serde(default)]
    pub consumer: Option<ConsumerSection>,
}

/// Параметры соединения, общие для producer'а и consumer'а.
#[derive(Debug, Deserialize)]
pub struct KafkaConnection {
    pub bootstrap_servers: String,
    pub security_protocol: Option<String>,
    pub sasl_mechanism: Option<String>,
    pub sasl_username: Option<String>,
    pub sasl_password: Option<String>,
    /// Произвольные librdkafka-свойства для обоих клиентов.
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct ProducerSection {
    pub topic: String,
    pub acks: Option<String>,
    pub retries: Option<u32>,
    pub batch_size: Option<u32>,
    pub linger_ms: Option<u32>,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct ConsumerSection {
    pub topic: String,
    pub group_id: String,
    pub auto_offset_reset: Option<String>,
    pub enable_auto_commit: Option<bool>,
    pub auto_commit_interval_ms: Option<u32>,
    pub session_timeout_ms: Option<u32>,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl RelayConfig {
    pub fn load(path: &str) -> Result<Self, ClientError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ClientError::Config { context: "read", detail: format!("'{path}': {e}") })?;
        Self::parse(&content)
            .map_err(|e| ClientError::Config { context: "parse", detail: format!("'{path}': {e}") })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn producer(&self) -> Result<&ProducerSection, ClientError> {
        self.producer.as_ref().ok_or(ClientError::Config {
            context: "producer",
            detail: "missing [producer] section".into(),
        })
    }

    pub fn consumer(&self) -> Result<&ConsumerSection, ClientError> {
        self.consumer.as_ref().ok_or(ClientError::Config {
            context: "consumer",
            detail: "missing [consumer] section".into(),
        })
    }

    /// Карта свойств producer'а: соединение, тюнинг, затем `properties`.
    pub fn producer_properties(&self) -> Result<BTreeMap<String, String>, ClientError> {
        let p = self.producer()?;
        let mut props = self.kafka.properties();
        set_opt(&mut props, "acks", &p.acks);
        set_opt(&mut props, "retries", &p.retries);
        set_opt(&mut props, "batch.size", &p.batch_size);
        set_opt(&mut props, "linger.ms", &p.linger_ms);
        props.extend(p.properties.clone());
        Ok(props)
    }

    /// Карта свойств consumer'а: соединение, group, offsets, затем `properties`.
    pub fn consumer_properties(&self) -> Result<BTreeMap<String, String>, ClientError> {
        let c = self.consumer()?;
        let mut props = self.kafka.properties();
        props.insert("group.id".into(), c.group_id.clone());
        set_opt(&mut props, "auto.offset.reset", &c.auto_offset_reset);
        set_opt(&mut props, "enable.auto.commit", &c.enable_auto_commit);
        set_opt(&mut props, "auto.commit.interval.ms", &c.auto_commit_interval_ms);
        set_opt(&mut props, "session.timeout.ms", &c.session_timeout_ms);
        props.extend(c.properties.clone());
        Ok(props)
    }

    pub fn producer_client_config(&self) -> Result<ClientConfig, ClientError> {
        Ok(to_client_config(self.producer_properties()?))
    }

    pub fn consumer_client_config(&self) -> Result<ClientConfig, ClientError> {
        Ok(to_client_config(self.consumer_properties()?))
    }
}

impl KafkaConnection {
    fn properties(&self) -> BTreeMap<String, String> {
        let mut props = BTreeMap::new();
        props.insert("bootstrap.servers".into(), self.bootstrap_servers.clone());
        set_opt(&mut props, "security.protocol", &self.security_protocol);
        set_opt(&mut props, "sasl.mechanism", &self.sasl_mechanism);
        set_opt(&mut props, "sasl.username", &self.sasl_username);
        set_opt(&mut props, "sasl.password", &self.sasl_password);
        props.extend(self.properties.clone());
        props
    }
}

fn set_opt<T: ToString>(props: &mut BTreeMap<String, String>, key: &str, value: &Option<T>) {
    if let Some(v) = value {
        props.insert(key.to_string(), v.to_string());
    }
}

fn to_client_config(props: BTreeMap<String, String>) -> ClientConfig {
    let mut config = ClientConfig::new();
    for (k, v) in props {
        config.set(k, v);
    }
    config
}
