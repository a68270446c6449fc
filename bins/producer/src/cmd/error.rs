use relay_client::ClientError;

#[derive(Debug, thiserror::Error)]
pub enum ProducerError {
    #[error("{0}")]
    Client(#[from] ClientError),

    #[error("delivery task: {0}")]
    Join(#[from] tokio::task::JoinError),
}
