//! Domain layer: Core business types and logic.
//!
//! Pure types with no I/O beyond reading a captured photo file.
//! Identity data (names) and clinical data (events) live in separate types
//! so the ledger is anonymized by construction.

mod capture;
mod clinical;
mod hashing;
mod identity;
mod registration;

pub use capture::{CaptureInput, CaptureMode};
pub use clinical::{
    is_valid_timestamp_format, ClinicalEvent, LedgerSnapshot, DEFAULT_TIMESTAMP_FORMAT,
};
pub use hashing::{digest, BiometricDigest, DigestError, DIGEST_HEX_LEN};
pub use identity::{AnonymizedId, IdentityRecord};
pub use registration::{Registration, RegistrationStatus};
