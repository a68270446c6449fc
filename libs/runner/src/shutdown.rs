use tokio_util::sync::CancellationToken;

/// Однократный флаг остановки, выставляемый сигналом процесса.
///
/// Выставляется один раз и не сбрасывается. Проверка не блокирует,
/// поэтому её можно звать из синхронного poll-цикла на blocking-потоке.
#[derive(Clone, Debug, Default)]
pub struct ShutdownSignal {
    token: CancellationToken,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Подписаться на SIGINT/SIGTERM. Нужен запущенный tokio runtime.
    pub fn install() -> std::io::Result<Self> {
        let shutdown = Self::new();
        let listener = SignalListener::register()?;
        let token = shutdown.token.clone();
        tokio::spawn(async move {
            let name = listener.recv().await;
            tracing::info!(signal = name, "shutdown requested");
            token.cancel();
        });
        Ok(shutdown)
    }

    pub fn is_requested(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn request(&self) {
        self.token.cancel();
    }

    /// Дождаться сигнала (для async-кода).
    pub async fn requested(&self) {
        self.token.cancelled().await;
    }
}

#[cfg(unix)]
struct SignalListener {
    interrupt: tokio::signal::unix::Signal,
    terminate: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl SignalListener {
    fn register() -> std::io::Result<Self> {
        use tokio::signal::unix::{SignalKind, signal};
        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
        })
    }

    async fn recv(mut self) -> &'static str {
        tokio::select! {
            _ = self.interrupt.recv() => "SIGINT",
            _ = self.terminate.recv() => "SIGTERM",
        }
    }
}

#[cfg(not(unix))]
struct SignalListener;

#[cfg(not(unix))]
impl SignalListener {
    fn register() -> std::io::Result<Self> {
        Ok(Self)
    }

    async fn recv(self) -> &'static str {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = ?e, "ctrl-c listener failed");
        }
        "ctrl-c"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_once_never_cleared() {
        let s = ShutdownSignal::new();
        assert!(!s.is_requested());
        s.request();
        assert!(s.is_requested());
        s.request();
        assert!(s.is_requested());
    }

    #[test]
    fn clones_share_the_flag() {
        let s = ShutdownSignal::new();
        let seen_by_loop = s.clone();
        s.request();
        assert!(seen_by_loop.is_requested());
    }

    #[tokio::test]
    async fn requested_wakes_waiter_on_another_clone() {
        let s = ShutdownSignal::new();
        let waiter = {
            let s = s.clone();
            tokio::spawn(async move { s.requested().await })
        };
        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        s.request();
        tokio::time::timeout(std::time::Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn install_starts_unset_and_accepts_manual_request() {
        let s = ShutdownSignal::install().unwrap();
        assert!(!s.is_requested());
        s.request();
        tokio::time::timeout(std::time::Duration::from_secs(1), s.requested())
            .await
            .unwrap();
    }
}
