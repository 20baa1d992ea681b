//! Auction module error types.

use thiserror::Error;

use auction_types::Phase;

/// Errors surfaced by a ledger collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("Ledger unavailable: {0}")]
    Unavailable(String),

    #[error("Ledger write rejected for key {key}: {reason}")]
    WriteRejected { key: String, reason: String },
}

/// Errors that can occur in the auction module.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuctionError {
    #[error("Auction not found: {0}")]
    NotFound(String),

    #[error("Auction already exists: {0}")]
    AlreadyExists(String),

    #[error("Wrong phase. Expected: {expected}, Got: {got}")]
    WrongPhase { expected: Phase, got: Phase },

    #[error("No bid found for client {0}")]
    NoBidFound(String),

    #[error("Hash mismatch")]
    HashMismatch,

    #[error("Auction already awarded")]
    AlreadyAwarded,

    #[error("Invalid timing configuration")]
    InvalidTiming,

    #[error("Invalid asset identifier")]
    InvalidAsset,

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Codec error: {0}")]
    Codec(String),
}
