pub mod bank;
pub mod clock;
pub mod status;

pub use bank::{Bank, Outcome};
pub use clock::{Clock, ManualClock, SystemClock};
pub use status::{StatusKind, StatusMessage, StatusSlot};
