//! Identity Registry port: biometric digest → patient identity.

use crate::domain::{BiometricDigest, IdentityRecord, Registration};

/// Trait for the digest-keyed identity store.
///
/// Implementations must make `register` atomic per digest: when two callers
/// race to register the same unseen digest, exactly one succeeds.
pub trait IdentityRegistry: Send + Sync {
    /// Register a new identity for `digest`.
    ///
    /// Generates a fresh anonymized id on success. If the digest is already
    /// present, returns [`Registration::already_registered`] and leaves the
    /// existing record untouched. An empty display name is stored as given.
    fn register(&self, display_name: &str, digest: &BiometricDigest) -> Registration;

    /// Look up the identity for `digest`.
    ///
    /// # Returns
    /// `None` if the digest has never been registered.
    fn lookup(&self, digest: &BiometricDigest) -> Option<IdentityRecord>;

    /// Number of registered identities.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
