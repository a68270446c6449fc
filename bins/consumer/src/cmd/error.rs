use relay_client::ClientError;

#[derive(Debug, thiserror::Error)]
pub enum ConsumerError {
    #[error("{0}")]
    Client(#[from] ClientError),

    #[error("signal: {0}")]
    Signal(#[from] std::io::Error),

    #[error("poll task: {0}")]
    Join(#[from] tokio::task::JoinError),
}
