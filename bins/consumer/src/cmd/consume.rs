use relay_client::KafkaPoller;
use relay_runner::{PollLoop, ShutdownSignal};

use super::config::Effective;
use super::error::ConsumerError;

pub async fn run(eff: Effective) -> Result<(), ConsumerError> {
    tracing::info!(config = %eff.config_path, "loaded config");

    let shutdown = ShutdownSignal::install()?;
    let poller = KafkaPoller::subscribe(&eff.client, &eff.topic)?;
    tracing::info!(topic = %poller.topic(), group = %eff.group_id, "consuming (Ctrl+C to stop)");

    // poll блокирующий — цикл целиком на blocking pool.
    let timeout = eff.timeout;
    let stop = shutdown.clone();
    let mut poll_task = tokio::task::spawn_blocking(move || PollLoop::new(timeout).run(&poller, &stop));

    let summary = tokio::select! {
        res = &mut poll_task => res?,
        _ = shutdown.requested() => {
            // Текущий poll доживает до своего таймаута.
            tracing::info!(timeout = ?timeout, "stopping, waiting for in-flight poll");
            poll_task.await?
        }
    };

    tracing::info!(processed = summary.processed, "consumer closed");
    Ok(())
}
