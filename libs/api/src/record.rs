use serde::{Deserialize, Serialize};

/// Значение поля `producer` по умолчанию.
pub const DEFAULT_PRODUCER: &str = "relay-demo-producer";

// ═══════════════════════════════════════════════════════════════
//  Record — wire payload
// ═══════════════════════════════════════════════════════════════

/// Одно сообщение, отправляемое producer'ом.
///
/// Идентичность — только `id`. В пределах одного запуска producer'а
/// `id` идут подряд с 1, `data.sequence == id`, `data.batch_size == count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: u64,
    /// RFC3339, секундная точность.
    pub timestamp: String,
    pub message: String,
    pub producer: String,
    pub data: RecordData,
}

/// Вложенный объект `data`: позиция записи в батче.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordData {
    pub sequence: u64,
    pub batch_size: u64,
}

impl Record {
    /// Запись для индекса цикла `index` (0-based) из `count`, с текущим временем.
    pub fn for_sequence(index: u64, count: u64, producer: &str) -> Self {
        Self::at(index, count, producer, now_rfc3339())
    }

    /// То же, что `for_sequence`, но с явным timestamp.
    pub fn at(index: u64, count: u64, producer: &str, timestamp: String) -> Self {
        let id = index + 1;
        Self {
            id,
            timestamp,
            message: format!("test message #{id}"),
            producer: producer.to_string(),
            data: RecordData {
                sequence: id,
                batch_size: count,
            },
        }
    }
}

/// Текущее локальное время в RFC3339 (`2024-01-01T08:00:00+08:00`, `Z` для UTC).
pub fn now_rfc3339() -> String {
    chrono::Local::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}
