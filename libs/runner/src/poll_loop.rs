use std::time::Duration;

use relay_api::{ConsumedRecord, PollOutcome, Record, RecordPoller, decode, to_pretty};

use crate::shutdown::ShutdownSignal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopping,
    Stopped,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PollSummary {
    /// Успешно декодированные записи.
    pub processed: u64,
    pub decode_failures: u64,
    pub poll_errors: u64,
}

/// Что произошло с одним результатом poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handled {
    /// Таймаут: ничего не пришло.
    Idle,
    /// Ошибка poll, залогирована.
    PollFailed,
    /// Payload не разобрался, запись пропущена.
    Skipped,
    Processed(Record),
}

// ═══════════════════════════════════════════════════════════════
//  PollLoop
// ═══════════════════════════════════════════════════════════════

/// Синхронный цикл consumer'а: проверка флага остановки → poll с таймаутом
/// → классификация результата.
///
/// Poll нельзя прервать сигналом, поэтому после сигнала возможен максимум
/// один дополнительный вызов poll длительностью не более `timeout`.
pub struct PollLoop {
    timeout: Duration,
    state: LoopState,
    summary: PollSummary,
}

impl PollLoop {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            state: LoopState::Running,
            summary: PollSummary::default(),
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn summary(&self) -> PollSummary {
        self.summary
    }

    /// Крутиться до сигнала остановки. Возвращает итоговые счётчики.
    pub fn run<P: RecordPoller + ?Sized>(&mut self, poller: &P, shutdown: &ShutdownSignal) -> PollSummary {
        tracing::info!(timeout = ?self.timeout, "polling started");
        while self.state == LoopState::Running {
            self.step(poller, shutdown);
        }
        self.state = LoopState::Stopped;
        tracing::info!(
            processed = self.summary.processed,
            decode_failures = self.summary.decode_failures,
            poll_errors = self.summary.poll_errors,
            "polling stopped"
        );
        self.summary
    }

    /// Одна итерация цикла.
    pub fn step<P: RecordPoller + ?Sized>(&mut self, poller: &P, shutdown: &ShutdownSignal) -> LoopState {
        if self.state != LoopState::Running {
            return self.state;
        }
        if shutdown.is_requested() {
            tracing::info!("shutdown requested, stopping");
            self.state = LoopState::Stopping;
            return self.state;
        }
        let outcome = poller.poll(self.timeout);
        self.handle(outcome);
        self.state
    }

    pub fn handle(&mut self, outcome: PollOutcome) -> Handled {
        match outcome {
            PollOutcome::Timeout => Handled::Idle,
            PollOutcome::Error(e) => {
                self.summary.poll_errors += 1;
                tracing::error!(error = %e, "consumer error");
                Handled::PollFailed
            }
            PollOutcome::Record(record) => self.process(record),
        }
    }

    fn process(&mut self, consumed: ConsumedRecord) -> Handled {
        match decode(&consumed.payload) {
            Ok(record) => {
                self.summary.processed += 1;
                tracing::info!(
                    topic = %consumed.topic,
                    partition = consumed.partition,
                    offset = consumed.offset,
                    key = %consumed.key_display(),
                    timestamp = %consumed.timestamp_display(),
                    processed = self.summary.processed,
                    "received record\n{}",
                    to_pretty(&record)
                );
                Handled::Processed(record)
            }
            Err(e) => {
                self.summary.decode_failures += 1;
                tracing::error!(
                    topic = %consumed.topic,
                    partition = consumed.partition,
                    offset = consumed.offset,
                    raw = %consumed.payload_display(),
                    error = %e,
                    "cannot decode record"
                );
                Handled::Skipped
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use relay_api::{PollError, RecordData};

    use super::*;

    const SAMPLE: &str = r#"{"id":1,"timestamp":"2024-01-01T00:00:00Z","message":"hi","producer":"p","data":{"sequence":1,"batch_size":1}}"#;

    fn consumed(payload: &[u8], offset: i64) -> ConsumedRecord {
        ConsumedRecord {
            topic: "relay".into(),
            partition: 0,
            offset,
            key: None,
            timestamp_ms: Some(1_704_067_200_000),
            payload: payload.to_vec(),
        }
    }

    /// Отдаёт заранее заданные результаты, дальше — таймауты.
    /// Может выставить флаг остановки на N-м вызове poll.
    struct ScriptedPoller {
        outcomes: Mutex<VecDeque<PollOutcome>>,
        polls: AtomicUsize,
        stop_on_poll: Option<(usize, ShutdownSignal)>,
    }

    impl ScriptedPoller {
        fn new(outcomes: Vec<PollOutcome>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
                polls: AtomicUsize::new(0),
                stop_on_poll: None,
            }
        }

        fn stopping_on(mut self, poll: usize, shutdown: &ShutdownSignal) -> Self {
            self.stop_on_poll = Some((poll, shutdown.clone()));
            self
        }

        fn polls(&self) -> usize {
            self.polls.load(Ordering::SeqCst)
        }
    }

    impl RecordPoller for ScriptedPoller {
        fn poll(&self, _timeout: Duration) -> PollOutcome {
            let n = self.polls.fetch_add(1, Ordering::SeqCst) + 1;
            if let Some((at, shutdown)) = &self.stop_on_poll {
                if n == *at {
                    shutdown.request();
                }
            }
            self.outcomes.lock().unwrap().pop_front().unwrap_or(PollOutcome::Timeout)
        }
    }

    #[test]
    fn decodes_record_and_counts_it() {
        let mut l = PollLoop::new(Duration::from_secs(1));
        let handled = l.handle(PollOutcome::Record(consumed(SAMPLE.as_bytes(), 0)));
        assert_eq!(
            handled,
            Handled::Processed(Record {
                id: 1,
                timestamp: "2024-01-01T00:00:00Z".into(),
                message: "hi".into(),
                producer: "p".into(),
                data: RecordData { sequence: 1, batch_size: 1 },
            })
        );
        assert_eq!(l.summary().processed, 1);
    }

    #[test]
    fn malformed_payload_is_skipped() {
        let mut l = PollLoop::new(Duration::from_secs(1));
        assert_eq!(l.handle(PollOutcome::Record(consumed(b"not json", 0))), Handled::Skipped);
        assert_eq!(
            l.summary(),
            PollSummary {
                processed: 0,
                decode_failures: 1,
                poll_errors: 0,
            }
        );
        assert_eq!(l.state(), LoopState::Running);
    }

    #[test]
    fn five_timeouts_keep_running_with_nothing_counted() {
        let shutdown = ShutdownSignal::new();
        let poller = ScriptedPoller::new(vec![PollOutcome::Timeout; 5]);
        let mut l = PollLoop::new(Duration::from_secs(1));
        for _ in 0..5 {
            assert_eq!(l.step(&poller, &shutdown), LoopState::Running);
        }
        assert_eq!(poller.polls(), 5);
        assert_eq!(l.summary(), PollSummary::default());
    }

    #[test]
    fn poll_error_is_not_fatal() {
        let shutdown = ShutdownSignal::new();
        let poller = ScriptedPoller::new(vec![
            PollOutcome::Error(PollError("Broker: Not coordinator".into())),
            PollOutcome::Record(consumed(SAMPLE.as_bytes(), 4)),
        ]);
        let mut l = PollLoop::new(Duration::from_millis(10));
        l.step(&poller, &shutdown);
        assert_eq!(l.state(), LoopState::Running);
        l.step(&poller, &shutdown);
        assert_eq!(l.summary().poll_errors, 1);
        assert_eq!(l.summary().processed, 1);
    }

    #[test]
    fn stop_requested_before_start_polls_nothing() {
        let shutdown = ShutdownSignal::new();
        shutdown.request();
        let poller = ScriptedPoller::new(Vec::new());
        let mut l = PollLoop::new(Duration::from_secs(1));
        l.run(&poller, &shutdown);
        assert_eq!(poller.polls(), 0);
        assert_eq!(l.state(), LoopState::Stopped);
    }

    #[test]
    fn at_most_one_poll_after_signal() {
        let shutdown = ShutdownSignal::new();
        // Сигнал приходит во время 3-го poll: тот poll доигрывается, новых нет.
        let poller = ScriptedPoller::new(vec![
            PollOutcome::Timeout,
            PollOutcome::Record(consumed(SAMPLE.as_bytes(), 0)),
            PollOutcome::Record(consumed(SAMPLE.as_bytes(), 1)),
            PollOutcome::Record(consumed(SAMPLE.as_bytes(), 2)),
        ])
        .stopping_on(3, &shutdown);
        let mut l = PollLoop::new(Duration::from_millis(10));
        let summary = l.run(&poller, &shutdown);

        assert_eq!(poller.polls(), 3);
        assert_eq!(summary.processed, 2);
        assert_eq!(l.state(), LoopState::Stopped);
    }

    #[test]
    fn malformed_payload_does_not_stop_polling() {
        let shutdown = ShutdownSignal::new();
        let poller = ScriptedPoller::new(vec![
            PollOutcome::Record(consumed(b"\xff\x00garbage", 0)),
            PollOutcome::Record(consumed(SAMPLE.as_bytes(), 1)),
            PollOutcome::Timeout,
        ])
        .stopping_on(3, &shutdown);
        let summary = PollLoop::new(Duration::from_millis(10)).run(&poller, &shutdown);
        assert_eq!(
            summary,
            PollSummary {
                processed: 1,
                decode_failures: 1,
                poll_errors: 0,
            }
        );
    }

    #[test]
    fn step_after_stop_is_a_no_op() {
        let shutdown = ShutdownSignal::new();
        shutdown.request();
        let poller = ScriptedPoller::new(Vec::new());
        let mut l = PollLoop::new(Duration::from_secs(1));
        assert_eq!(l.step(&poller, &shutdown), LoopState::Stopping);
        assert_eq!(l.step(&poller, &shutdown), LoopState::Stopping);
        assert_eq!(poller.polls(), 0);
    }

    #[test]
    fn loop_runs_on_a_blocking_thread() {
        let shutdown = ShutdownSignal::new();
        let poller = ScriptedPoller::new(Vec::new()).stopping_on(2, &shutdown);
        let handle = std::thread::spawn(move || PollLoop::new(Duration::from_millis(1)).run(&poller, &shutdown));
        assert_eq!(handle.join().unwrap(), PollSummary::default());
    }
}
