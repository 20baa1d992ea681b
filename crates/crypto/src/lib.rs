//! Commitment primitives for sealed-bid auctions.
//!
//! Bidders publish `SHA-256(decimal(value) || nonce)` as a lowercase hex
//! string during the bidding phase and later disclose `(value, nonce)`.
//! The engine checks the disclosure against the stored commitment before
//! accepting it.

pub mod commitment;
pub mod error;

pub use commitment::{commit, commit_bytes, parse_commitment, verify, COMMITMENT_HEX_LEN};
pub use error::CryptoError;
