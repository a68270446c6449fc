use std::sync::Arc;

use relay_client::KafkaSender;
use relay_runner::{SendLoop, spawn_delivery_drain};

use super::config::Effective;
use super::error::ProducerError;

pub async fn run(eff: Effective) -> Result<(), ProducerError> {
    tracing::info!(config = %eff.config_path, "loaded config");

    let (sender, events) = KafkaSender::create(&eff.client)?;
    let drain = spawn_delivery_drain(events);
    tracing::info!(topic = %eff.topic, count = eff.count, interval = ?eff.interval, "producer created");

    let send_loop = SendLoop::new(Arc::new(sender)).producer_name(eff.producer_name);
    let summary = send_loop.run(eff.count, eff.interval, &eff.topic).await;

    // Закрыть соединение: канал событий закроется, drain доработает и выйдет.
    drop(send_loop);
    let stats = drain.await?;

    tracing::info!(
        sent = summary.sent,
        errors = summary.errors,
        delivered = stats.delivered,
        failed = stats.failed,
        client_errors = stats.client_errors,
        "producer finished"
    );
    Ok(())
}
