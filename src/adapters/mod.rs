//! Adapters layer: Concrete implementations of ports.
//!
//! - `memory`: session-scoped Identity Registry and Clinical Ledger
//! - `clock`: system and fixed clocks for event timestamps
//! - `sanitize`: PII filtering for logs

pub mod clock;
pub mod memory;
pub mod sanitize;

pub use clock::{FixedClock, SystemClock};
pub use memory::{InMemoryLedger, InMemoryRegistry};
