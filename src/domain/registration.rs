//! Outcome of a registration attempt.

use serde::{Deserialize, Serialize};

use super::identity::AnonymizedId;

/// Status of a registration attempt.
///
/// `AlreadyRegistered` is an expected outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistrationStatus {
    /// A new identity was created
    Registered,
    /// The digest already maps to an identity; nothing changed
    AlreadyRegistered,
}

impl RegistrationStatus {
    /// Message shown to the clinician.
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Self::Registered => "Registro Exitoso",
            Self::AlreadyRegistered => "Paciente ya registrado con esta biometría.",
        }
    }
}

impl std::fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Result of `register`: the new id (if any) and the status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub anonymized_id: Option<AnonymizedId>,
    pub status: RegistrationStatus,
}

impl Registration {
    #[must_use]
    pub fn registered(anonymized_id: AnonymizedId) -> Self {
        Self {
            anonymized_id: Some(anonymized_id),
            status: RegistrationStatus::Registered,
        }
    }

    #[must_use]
    pub fn already_registered() -> Self {
        Self {
            anonymized_id: None,
            status: RegistrationStatus::AlreadyRegistered,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == RegistrationStatus::Registered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_messages() {
        assert_eq!(RegistrationStatus::Registered.to_string(), "Registro Exitoso");
        assert_eq!(
            RegistrationStatus::AlreadyRegistered.message(),
            "Paciente ya registrado con esta biometría."
        );
    }

    #[test]
    fn test_already_registered_has_no_id() {
        let outcome = Registration::already_registered();
        assert!(!outcome.is_success());
        assert!(outcome.anonymized_id.is_none());
    }
}
