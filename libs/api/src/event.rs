use crate::error::PollError;

// ═══════════════════════════════════════════════════════════════
//  Producer side
// ═══════════════════════════════════════════════════════════════

/// Асинхронное подтверждение (или отказ) одной отправки.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    pub topic: String,
    pub partition: i32,
    /// Offset записи при успехе, текст ошибки брокера при отказе.
    pub outcome: Result<i64, String>,
}

impl DeliveryReport {
    pub fn delivered(topic: impl Into<String>, partition: i32, offset: i64) -> Self {
        Self {
            topic: topic.into(),
            partition,
            outcome: Ok(offset),
        }
    }

    pub fn failed(topic: impl Into<String>, partition: i32, error: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            partition,
            outcome: Err(error.into()),
        }
    }
}

/// Всё, что клиент producer'а отдаёт асинхронно.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProducerEvent {
    Delivery(DeliveryReport),
    /// Ошибка уровня соединения, не привязанная к конкретной отправке.
    ClientError(String),
    /// Прочие события (статистика и т.п.).
    Other(&'static str),
}

// ═══════════════════════════════════════════════════════════════
//  Consumer side
// ═══════════════════════════════════════════════════════════════

/// Запись, полученная из брокера. Только для чтения.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumedRecord {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
    pub key: Option<Vec<u8>>,
    /// Timestamp брокера в миллисекундах (Unix epoch).
    pub timestamp_ms: Option<i64>,
    pub payload: Vec<u8>,
}

impl ConsumedRecord {
    pub fn key_display(&self) -> String {
        match &self.key {
            Some(k) => String::from_utf8_lossy(k).into_owned(),
            None => "<nil>".into(),
        }
    }

    pub fn timestamp_display(&self) -> String {
        self.timestamp_ms
            .and_then(chrono::DateTime::<chrono::Utc>::from_timestamp_millis)
            .map(|t| t.to_rfc3339_opts(chrono::SecondsFormat::Millis, true))
            .unwrap_or_else(|| "<nil>".into())
    }

    /// Payload для лога: валидный UTF-8 как есть, иначе байты с
    /// экранированием (`\xff`), чтобы разные payload'ы не склеивались.
    pub fn payload_display(&self) -> String {
        match std::str::from_utf8(&self.payload) {
            Ok(text) => text.to_owned(),
            Err(_) => self.payload.escape_ascii().to_string(),
        }
    }
}

/// Результат одного вызова poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// За отведённое время ничего не пришло. Не ошибка.
    Timeout,
    Record(ConsumedRecord),
    Error(PollError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_missing_metadata_as_nil() {
        let r = ConsumedRecord {
            topic: "t".into(),
            partition: 0,
            offset: 7,
            key: None,
            timestamp_ms: None,
            payload: vec![0xff, b'a'],
        };
        assert_eq!(r.key_display(), "<nil>");
        assert_eq!(r.timestamp_display(), "<nil>");
    }

    fn with_payload(payload: &[u8]) -> ConsumedRecord {
        ConsumedRecord {
            topic: "t".into(),
            partition: 0,
            offset: 0,
            key: None,
            timestamp_ms: None,
            payload: payload.to_vec(),
        }
    }

    #[test]
    fn raw_payload_keeps_invalid_bytes_apart() {
        let ff = with_payload(&[0xff, b'x']).payload_display();
        let fe = with_payload(&[0xfe, b'x']).payload_display();
        let c3 = with_payload(&[0xc3, b'x']).payload_display();
        assert_eq!(ff, "\\xffx");
        assert_eq!(fe, "\\xfex");
        assert_ne!(ff, c3);
        assert_ne!(fe, c3);
    }

    #[test]
    fn raw_payload_prints_text_as_is() {
        assert_eq!(with_payload(b"not json").payload_display(), "not json");
        assert_eq!(with_payload("привет".as_bytes()).payload_display(), "привет");
    }

    #[test]
    fn delivery_outcome() {
        assert_eq!(DeliveryReport::delivered("t", 0, 10).outcome, Ok(10));
        assert_eq!(
            DeliveryReport::failed("t", -1, "Message timed out").outcome,
            Err("Message timed out".to_string())
        );
    }

    #[test]
    fn displays_broker_timestamp() {
        let r = ConsumedRecord {
            topic: "t".into(),
            partition: 1,
            offset: 0,
            key: Some(b"k1".to_vec()),
            timestamp_ms: Some(1_704_067_200_000),
            payload: Vec::new(),
        };
        assert_eq!(r.key_display(), "k1");
        assert_eq!(r.timestamp_display(), "2024-01-01T00:00:00.000Z");
    }
}
