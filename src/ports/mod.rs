//! Ports layer: Trait definitions for the stores the application drives.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the session logic and the concrete stores (in-memory maps
//! today, anything `Send + Sync` tomorrow).

mod clock;
mod ledger;
mod registry;

pub use clock::Clock;
pub use ledger::ClinicalLedger;
pub use registry::IdentityRegistry;
