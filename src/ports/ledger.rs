//! Clinical Ledger port: anonymized id → ordered event history.

use crate::domain::{AnonymizedId, ClinicalEvent, LedgerSnapshot};

/// Trait for the append-only clinical ledger.
///
/// The ledger is keyed only by [`AnonymizedId`]; it has no access to
/// display names or digests. Appends to one identifier must not be lost
/// when issued concurrently.
pub trait ClinicalLedger: Send + Sync {
    /// Append an event stamped with the current time.
    ///
    /// Creates the entry on first use. Every call adds a record, even if
    /// `detail` repeats an earlier one.
    fn append_event(&self, id: &AnonymizedId, detail: &str);

    /// Events for `id` in insertion order; empty if there are none.
    fn history(&self, id: &AnonymizedId) -> Vec<ClinicalEvent>;

    /// Dump every entry for the audit view.
    fn snapshot(&self) -> LedgerSnapshot;
}
