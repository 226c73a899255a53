//! # BioSecure
//!
//! Biometric-keyed patient identification with an anonymized clinical ledger.
//!
//! This crate provides:
//! - Hashing of captured input (photo bytes or a manual code) into a biometric digest
//! - An Identity Registry mapping digests to anonymized patient identities
//! - A Clinical Ledger of timestamped events keyed only by anonymized id
//! - Terminal UI for single-session, in-memory use
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core business types (digest, identity, clinical events)
//! - `ports`: Trait definitions for the stores and the clock
//! - `adapters`: Concrete implementations (in-memory stores, clocks, log sanitizer)
//! - `application`: Use cases orchestrating domain and ports
//! - `config`: Environment-driven settings for the binary
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use domain::{digest, AnonymizedId, BiometricDigest, ClinicalEvent, IdentityRecord};

/// Result type for BioSecure operations
pub type Result<T> = std::result::Result<T, BiosecureError>;

/// Main error type for BioSecure
///
/// Expected outcomes (unknown digest, empty history, duplicate registration)
/// are returned as values, never as errors.
#[derive(Debug, thiserror::Error)]
pub enum BiosecureError {
    #[error("Invalid biometric digest: {0}")]
    Digest(#[from] domain::DigestError),

    #[error("{0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
