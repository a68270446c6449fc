pub mod client;
pub mod codec;
pub mod error;
pub mod event;
pub mod record;

pub use client::{RecordPoller, RecordSender};
pub use codec::{decode, encode, to_pretty};
pub use error::{CodecError, FlushError, PollError, SendError};
pub use event::{ConsumedRecord, DeliveryReport, PollOutcome, ProducerEvent};
pub use record::{DEFAULT_PRODUCER, Record, RecordData, now_rfc3339};
