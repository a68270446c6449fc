pub mod delivery;
pub mod poll_loop;
pub mod send_loop;
pub mod shutdown;

pub use delivery::{DeliveryStats, drain_delivery_events, spawn_delivery_drain};
pub use poll_loop::{Handled, LoopState, PollLoop, PollSummary};
pub use send_loop::{FLUSH_TIMEOUT, SendLoop, SendSummary};
pub use shutdown::ShutdownSignal;
