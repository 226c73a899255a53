//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the recognition, registration, event-entry and audit use cases.

mod audit;
mod session;

pub use audit::AuditService;
pub use session::{SessionService, SessionState};
