//! Clock port: source of event timestamps.

use chrono::{DateTime, Local};

/// Trait for reading the current local time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}
