use crate::error::CodecError;
use crate::record::Record;

/// Сериализовать запись в JSON.
pub fn encode(record: &Record) -> Result<Vec<u8>, CodecError> {
    serde_json::to_vec(record).map_err(CodecError::Encode)
}

/// Разобрать JSON payload. Любой вход даёт `Ok` или `CodecError::Decode`, без паники.
pub fn decode(bytes: &[u8]) -> Result<Record, CodecError> {
    serde_json::from_slice(bytes).map_err(CodecError::Decode)
}

/// Человекочитаемый JSON для логов consumer'а.
pub fn to_pretty(record: &Record) -> String {
    serde_json::to_string_pretty(record).unwrap_or_else(|_| format!("{record:?}"))
}
