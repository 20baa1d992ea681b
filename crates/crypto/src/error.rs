//! Error types for cryptographic operations.

use thiserror::Error;

/// Errors that can occur during cryptographic operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    #[error("Invalid commitment length: expected {expected} hex chars, got {got}")]
    InvalidCommitmentLength { expected: usize, got: usize },

    #[error("Commitment must be lowercase hex")]
    NonCanonicalHex,

    #[error("Invalid commitment encoding: {0}")]
    InvalidCommitmentEncoding(String),
}
