use rdkafka::error::KafkaError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("config ({context}): {detail}")]
    Config { context: &'static str, detail: String },

    #[error("create {role}: {source}")]
    Create { role: &'static str, source: KafkaError },

    #[error("subscribe '{topic}': {source}")]
    Subscribe { topic: String, source: KafkaError },
}
