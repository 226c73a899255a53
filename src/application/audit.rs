//! Audit service: read-only view of the clinical ledger.
//!
//! Exposes every entry and event but never the Identity Registry, so the
//! dump contains no display names.

use std::sync::Arc;

use crate::domain::LedgerSnapshot;
use crate::ports::ClinicalLedger;
use crate::BiosecureError;

/// Service producing the privacy audit dump.
pub struct AuditService<L>
where
    L: ClinicalLedger,
{
    ledger: Arc<L>,
}

impl<L> AuditService<L>
where
    L: ClinicalLedger,
{
    /// Create a new audit service.
    pub fn new(ledger: Arc<L>) -> Self {
        Self { ledger }
    }

    /// Full ledger dump.
    #[must_use]
    pub fn snapshot(&self) -> LedgerSnapshot {
        let snapshot = self.ledger.snapshot();
        tracing::info!(
            "Audit snapshot: {} identities, {} events",
            snapshot.identity_count(),
            snapshot.event_count()
        );
        snapshot
    }

    /// Ledger dump rendered as pretty JSON.
    ///
    /// # Errors
    /// Returns error if serialization fails.
    pub fn to_json(&self) -> Result<String, BiosecureError> {
        Self::render(&self.ledger.snapshot())
    }

    /// Render an already taken snapshot as pretty JSON.
    ///
    /// # Errors
    /// Returns error if serialization fails.
    pub fn render(snapshot: &LedgerSnapshot) -> Result<String, BiosecureError> {
        Ok(serde_json::to_string_pretty(snapshot)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryLedger, InMemoryRegistry};
    use crate::application::SessionService;
    use crate::domain::digest;

    #[test]
    fn test_empty_ledger_dump() {
        let audit = AuditService::new(Arc::new(InMemoryLedger::new()));
        assert!(audit.snapshot().is_empty());
        assert_eq!(audit.to_json().expect("Should serialize"), "{}");
    }

    #[test]
    fn test_dump_excludes_names_and_digests() {
        let ledger = Arc::new(InMemoryLedger::new());
        let session = SessionService::new(Arc::new(InMemoryRegistry::new()), Arc::clone(&ledger));
        let audit = AuditService::new(ledger);

        let d = digest(b"b1");
        let id = session
            .register("Juan Perez", &d)
            .anonymized_id
            .expect("Should issue id");
        session.append_event(&id, "Fractura de brazo");

        let json = audit.to_json().expect("Should serialize");
        assert!(json.contains(id.as_str()));
        assert!(json.contains("Fractura de brazo"));
        assert!(!json.contains("Juan Perez"));
        assert!(!json.contains(d.as_str()));
    }
}
