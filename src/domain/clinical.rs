//! Clinical ledger types.
//!
//! Events carry only a timestamp and free-text detail. Nothing here can
//! hold a display name or a biometric digest.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::identity::AnonymizedId;

/// Default timestamp rendering for clinical events (day/month hour:minute).
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%d/%m %H:%M";

/// Check that a strftime-style format string parses.
///
/// Formatting with an invalid string panics inside chrono's `Display`, so
/// externally supplied formats must pass this first.
#[must_use]
pub fn is_valid_timestamp_format(format: &str) -> bool {
    use chrono::format::{Item, StrftimeItems};

    !format.is_empty() && StrftimeItems::new(format).all(|item| !matches!(item, Item::Error))
}

/// A single immutable clinical note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClinicalEvent {
    /// Creation-time snapshot, already formatted
    pub timestamp: String,

    /// Diagnosis or procedure text
    pub detail: String,
}

impl ClinicalEvent {
    #[must_use]
    pub fn new(timestamp: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            detail: detail.into(),
        }
    }
}

/// Full dump of the clinical ledger for the audit view.
///
/// Ordered by identifier so repeated dumps render identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LedgerSnapshot {
    pub entries: BTreeMap<AnonymizedId, Vec<ClinicalEvent>>,
}

impl LedgerSnapshot {
    /// Number of identities with at least one event.
    #[must_use]
    pub fn identity_count(&self) -> usize {
        self.entries.len()
    }

    /// Total number of events across all identities.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
