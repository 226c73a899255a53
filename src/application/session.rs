//! Session service: capture → digest → recognition → register or append.
//!
//! The session has no mode field of its own. Its state is recomputed from
//! the current digest and the registry contents on every interaction, since
//! another session sharing the stores may have registered in between.

use std::sync::Arc;

use crate::domain::{
    digest, AnonymizedId, BiometricDigest, CaptureInput, ClinicalEvent, IdentityRecord,
    Registration,
};
use crate::ports::{ClinicalLedger, IdentityRegistry};
use crate::BiosecureError;

/// What the shell should show for the current input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No input captured yet
    AwaitingInput,
    /// Digest recognised: show identity and history, accept new events
    Found {
        record: IdentityRecord,
        history: Vec<ClinicalEvent>,
    },
    /// Digest unknown: prompt for registration
    NotFound { digest: BiometricDigest },
}

/// Service orchestrating recognition, registration and event entry.
///
/// Stores are shared through `Arc`, so several sessions can drive the same
/// registry and ledger.
pub struct SessionService<R, L>
where
    R: IdentityRegistry,
    L: ClinicalLedger,
{
    registry: Arc<R>,
    ledger: Arc<L>,
}

impl<R, L> Clone for SessionService<R, L>
where
    R: IdentityRegistry,
    L: ClinicalLedger,
{
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            ledger: Arc::clone(&self.ledger),
        }
    }
}

impl<R, L> SessionService<R, L>
where
    R: IdentityRegistry,
    L: ClinicalLedger,
{
    /// Create a new session service over the given stores.
    pub fn new(registry: Arc<R>, ledger: Arc<L>) -> Self {
        Self { registry, ledger }
    }

    /// Hash captured input into its biometric digest.
    #[must_use]
    pub fn capture(&self, input: &CaptureInput) -> BiometricDigest {
        let d = digest(input.as_bytes());
        tracing::debug!("Captured {:?} -> digest {}", input.mode(), d.prefix());
        d
    }

    /// Compute the session state for the current digest.
    #[must_use]
    pub fn resolve(&self, current: Option<&BiometricDigest>) -> SessionState {
        let Some(d) = current else {
            return SessionState::AwaitingInput;
        };

        match self.registry.lookup(d) {
            Some(record) => {
                let history = self.ledger.history(&record.anonymized_id);
                tracing::info!(
                    "Identity recognised ({} events on file)",
                    history.len()
                );
                SessionState::Found { record, history }
            }
            None => {
                tracing::info!("Digest {} not recognised", d.prefix());
                SessionState::NotFound { digest: d.clone() }
            }
        }
    }

    /// Look up an identity without touching the ledger.
    #[must_use]
    pub fn lookup(&self, d: &BiometricDigest) -> Option<IdentityRecord> {
        self.registry.lookup(d)
    }

    /// Register straight against the registry, with no input validation.
    #[must_use]
    pub fn register(&self, display_name: &str, d: &BiometricDigest) -> Registration {
        self.registry.register(display_name, d)
    }

    /// Handle a "new patient" form submission.
    ///
    /// The name is stored as typed; blank-only input is rejected.
    /// On success the shell returns to [`SessionState::AwaitingInput`]; the new
    /// identity is recognised on the next capture.
    ///
    /// # Errors
    /// Returns `Validation` if the name is blank.
    pub fn submit_registration(
        &self,
        display_name: &str,
        d: &BiometricDigest,
    ) -> Result<Registration, BiosecureError> {
        if display_name.trim().is_empty() {
            return Err(BiosecureError::Validation(
                "Debes ingresar un nombre.".to_string(),
            ));
        }

        Ok(self.registry.register(display_name, d))
    }

    /// Append straight to the ledger, with no input validation.
    pub fn append_event(&self, id: &AnonymizedId, detail: &str) {
        self.ledger.append_event(id, detail);
    }

    /// Handle a "new clinical record" form submission for a recognised patient.
    ///
    /// The detail is stored as typed. Returns the refreshed `Found` state.
    ///
    /// # Errors
    /// Returns `Validation` if the detail is blank.
    pub fn submit_event(
        &self,
        record: &IdentityRecord,
        detail: &str,
    ) -> Result<SessionState, BiosecureError> {
        if detail.trim().is_empty() {
            return Err(BiosecureError::Validation(
                "Debes ingresar un diagnóstico o procedimiento.".to_string(),
            ));
        }

        self.ledger.append_event(&record.anonymized_id, detail);

        Ok(SessionState::Found {
            record: record.clone(),
            history: self.ledger.history(&record.anonymized_id),
        })
    }

    /// Clinical history for an identity; empty if none.
    #[must_use]
    pub fn history(&self, id: &AnonymizedId) -> Vec<ClinicalEvent> {
        self.ledger.history(id)
    }

    /// Number of registered identities.
    #[must_use]
    pub fn identity_count(&self) -> usize {
        self.registry.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::clock::FixedClock;
    use crate::adapters::memory::{InMemoryLedger, InMemoryRegistry};
    use crate::domain::RegistrationStatus;
    use chrono::{Local, TimeZone};

    type TestSession = SessionService<InMemoryRegistry, InMemoryLedger<FixedClock>>;

    fn create_test_service() -> TestSession {
        let clock = FixedClock::new(
            Local
                .with_ymd_and_hms(2024, 3, 5, 9, 30, 0)
                .single()
                .expect("Valid local time"),
        );
        SessionService::new(
            Arc::new(InMemoryRegistry::new()),
            Arc::new(InMemoryLedger::with_clock(clock)),
        )
    }

    fn found(state: SessionState) -> (IdentityRecord, Vec<ClinicalEvent>) {
        match state {
            SessionState::Found { record, history } => (record, history),
            other => panic!("Expected Found, got {other:?}"),
        }
    }

    #[test]
    fn test_awaiting_input_without_digest() {
        let service = create_test_service();
        assert_eq!(service.resolve(None), SessionState::AwaitingInput);
    }

    #[test]
    fn test_unknown_digest_is_not_found() {
        let service = create_test_service();
        let d = service.capture(&CaptureInput::ManualCode("1234".to_string()));
        assert_eq!(
            service.resolve(Some(&d)),
            SessionState::NotFound { digest: d.clone() }
        );
    }

    #[test]
    fn test_register_and_recognise_photo() {
        let service = create_test_service();
        let b1 = vec![0xff, 0xd8, 0xff, 0xe0, 0x00, 0x10];

        let d1 = service.capture(&CaptureInput::Photo(b1.clone()));
        assert!(matches!(service.resolve(Some(&d1)), SessionState::NotFound { .. }));

        let outcome = service
            .submit_registration("Juan Perez", &d1)
            .expect("Name is valid");
        assert_eq!(outcome.status, RegistrationStatus::Registered);
        assert_eq!(outcome.status.message(), "Registro Exitoso");
        let u1 = outcome.anonymized_id.expect("Should issue id");

        // Recapture the same bytes
        let again = service.capture(&CaptureInput::Photo(b1));
        assert_eq!(again, d1);

        let (record, history) = found(service.resolve(Some(&again)));
        assert_eq!(record.display_name, "Juan Perez");
        assert_eq!(record.anonymized_id, u1);
        assert!(history.is_empty());
    }

    #[test]
    fn test_append_event_to_recognised_patient() {
        let service = create_test_service();
        let d1 = digest(b"b1");
        let u1 = service
            .register("Juan Perez", &d1)
            .anonymized_id
            .expect("Should issue id");

        let record = service.lookup(&d1).expect("Should find");
        let (_, history) = found(
            service
                .submit_event(&record, "Fractura de brazo")
                .expect("Detail is valid"),
        );

        assert_eq!(history.len(), 1);
        assert_eq!(history[0].detail, "Fractura de brazo");
        assert!(!history[0].timestamp.is_empty());
        assert_eq!(service.history(&u1), history);
    }

    #[test]
    fn test_duplicate_registration_leaves_history() {
        let service = create_test_service();
        let d1 = digest(b"b1");
        let u1 = service
            .register("Juan Perez", &d1)
            .anonymized_id
            .expect("Should issue id");
        service.append_event(&u1, "Fractura de brazo");

        let outcome = service.submit_registration("X", &d1).expect("Name is valid");
        assert_eq!(outcome.status, RegistrationStatus::AlreadyRegistered);
        assert!(outcome.anonymized_id.is_none());

        assert_eq!(service.history(&u1).len(), 1);
        let record = service.lookup(&d1).expect("Should find");
        assert_eq!(record.display_name, "Juan Perez");
    }

    #[test]
    fn test_append_keeps_order() {
        let service = create_test_service();
        let d = digest(b"pin");
        let id = service.register("Ana", &d).anonymized_id.expect("Should issue id");

        service.append_event(&id, "A");
        service.append_event(&id, "B");

        let details: Vec<_> = service.history(&id).into_iter().map(|e| e.detail).collect();
        assert_eq!(details, vec!["A", "B"]);
    }

    #[test]
    fn test_history_never_exposes_identity() {
        let service = create_test_service();
        let d = digest(b"pin");
        let id = service
            .register("Juan Perez", &d)
            .anonymized_id
            .expect("Should issue id");
        service.append_event(&id, "Control");

        for event in service.history(&id) {
            let json = serde_json::to_string(&event).expect("Should serialize");
            assert!(!json.contains("Juan Perez"));
            assert!(!json.contains(d.as_str()));
        }
    }

    #[test]
    fn test_blank_inputs_rejected_at_boundary() {
        let service = create_test_service();
        let d = digest(b"pin");

        assert!(matches!(
            service.submit_registration("   ", &d),
            Err(BiosecureError::Validation(_))
        ));
        assert_eq!(service.identity_count(), 0);

        let _ = service.register("Ana", &d);
        let record = service.lookup(&d).expect("Should find");
        assert!(matches!(
            service.submit_event(&record, ""),
            Err(BiosecureError::Validation(_))
        ));
        assert!(service.history(&record.anonymized_id).is_empty());
    }

    #[test]
    fn test_submitted_text_is_stored_as_typed() {
        let service = create_test_service();
        let d = digest(b"pin");

        let outcome = service
            .submit_registration(" Ana María ", &d)
            .expect("Name is valid");
        assert!(outcome.is_success());
        let record = service.lookup(&d).expect("Should find");
        assert_eq!(record.display_name, " Ana María ");

        let (_, history) = found(
            service
                .submit_event(&record, "  Control post-operatorio\t")
                .expect("Detail is valid"),
        );
        assert_eq!(history[0].detail, "  Control post-operatorio\t");
    }

    #[test]
    fn test_registration_visible_to_other_session() {
        let first = create_test_service();
        let second = first.clone();
        let d = digest(b"shared");

        assert!(matches!(second.resolve(Some(&d)), SessionState::NotFound { .. }));
        let _ = first.register("Ana", &d);
        assert!(matches!(second.resolve(Some(&d)), SessionState::Found { .. }));
    }
}
