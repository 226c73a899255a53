//! Patient identity types.
//!
//! An identity pairs the patient's display name with an anonymized
//! identifier. Only the identifier ever leaves the Identity Registry;
//! clinical data is keyed by it alone.

use serde::{Deserialize, Serialize};

/// Opaque, globally unique token referencing a patient's clinical data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnonymizedId(String);

impl AnonymizedId {
    /// Generate a fresh identifier from 128 random bits.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid_v4())
    }

    /// Wrap an identifier previously issued by [`AnonymizedId::generate`].
    #[must_use]
    pub fn from_issued(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last 8 characters, enough for a clinician to cross-check on screen.
    #[must_use]
    pub fn short(&self) -> &str {
        let start = self.0.len().saturating_sub(8);
        &self.0[start..]
    }
}

impl std::fmt::Display for AnonymizedId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A registered patient identity.
///
/// Created only by registration; never updated or deleted.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    /// Name shown to the clinician (never stored in the ledger)
    pub display_name: String,

    /// Key into the clinical ledger
    pub anonymized_id: AnonymizedId,
}

impl IdentityRecord {
    #[must_use]
    pub fn new(display_name: impl Into<String>, anonymized_id: AnonymizedId) -> Self {
        Self {
            display_name: display_name.into(),
            anonymized_id,
        }
    }
}

// Display names are PII: keep them out of debug output and logs.
impl std::fmt::Debug for IdentityRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityRecord")
            .field("display_name", &"[REDACTED]")
            .field("anonymized_id", &self.anonymized_id)
            .finish()
    }
}

/// Generate a UUID v4 string using a CSPRNG seeded from OS entropy.
fn uuid_v4() -> String {
    use rand::Rng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    let mut rng = ChaCha20Rng::from_entropy();
    let bytes: [u8; 16] = rng.gen();

    format!(
        "{:02x}{:02x}{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
        bytes[0], bytes[1], bytes[2], bytes[3],
        bytes[4], bytes[5],
        (bytes[6] & 0x0f) | 0x40, bytes[7],
        (bytes[8] & 0x3f) | 0x80, bytes[9],
        bytes[10], bytes[11], bytes[12], bytes[13], bytes[14], bytes[15]
    )
}
