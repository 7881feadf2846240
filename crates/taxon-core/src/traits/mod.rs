//! Core traits for store access and time.

mod clock;
mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use store::DocumentStore;
