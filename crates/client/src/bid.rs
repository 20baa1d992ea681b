//! Bid preparation.

use rand::{CryptoRng, RngCore};
use thiserror::Error;

use auction_crypto::{commit, parse_commitment, CryptoError};

/// Random bytes in a generated nonce.
pub const NONCE_BYTES: usize = 16;

/// Errors that can occur during bid creation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BidError {
    #[error("Nonce must not be empty")]
    EmptyNonce,

    /// The commitment preimage is `decimal(value) || nonce`, so a leading
    /// digit would let the bidder move digits between value and nonce at
    /// reveal time.
    #[error("Nonce must not start with a digit")]
    AmbiguousNonce,

    #[error(transparent)]
    InvalidCommitment(#[from] CryptoError),
}

/// A prepared bid ready for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedBid {
    /// Commitment to submit during the bidding phase
    pub bid_hash: String,
    /// Nonce (keep secret until the reveal phase)
    pub nonce: String,
    /// Bid value (keep secret until the reveal phase)
    pub bid_value: u64,
}

/// Generate a fresh nonce: `n` followed by hex-encoded random bytes.
pub fn generate_nonce<R: RngCore + CryptoRng>(rng: &mut R) -> String {
    let mut bytes = [0u8; NONCE_BYTES];
    rng.fill_bytes(&mut bytes);
    format!("n{}", hex::encode(bytes))
}

fn check_nonce(nonce: &str) -> Result<(), BidError> {
    match nonce.chars().next() {
        None => Err(BidError::EmptyNonce),
        Some(c) if c.is_ascii_digit() => Err(BidError::AmbiguousNonce),
        Some(_) => Ok(()),
    }
}

/// Check a commitment computed elsewhere before submitting it.
///
/// The chain stores whatever hash it is given, so a malformed one would only
/// show up as a failed reveal.
pub fn check_commitment(bid_hash: &str) -> Result<(), BidError> {
    parse_commitment(bid_hash)?;
    Ok(())
}

/// Create a bid with a freshly generated nonce.
pub fn create_bid<R: RngCore + CryptoRng>(bid_value: u64, rng: &mut R) -> PreparedBid {
    let nonce = generate_nonce(rng);
    PreparedBid {
        bid_hash: commit(bid_value, &nonce),
        nonce,
        bid_value,
    }
}

/// Builder for creating bids with additional options.
#[derive(Debug, Default)]
pub struct BidBuilder {
    bid_value: u64,
    nonce: Option<String>,
}

impl BidBuilder {
    /// Create a new bid builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bid value.
    pub fn bid_value(mut self, value: u64) -> Self {
        self.bid_value = value;
        self
    }

    /// Use a caller-chosen nonce instead of a random one.
    pub fn nonce(mut self, nonce: impl Into<String>) -> Self {
        self.nonce = Some(nonce.into());
        self
    }

    /// Build the prepared bid.
    pub fn build<R: RngCore + CryptoRng>(self, rng: &mut R) -> Result<PreparedBid, BidError> {
        match self.nonce {
            Some(nonce) => {
                check_nonce(&nonce)?;
                Ok(PreparedBid {
                    bid_hash: commit(self.bid_value, &nonce),
                    nonce,
                    bid_value: self.bid_value,
                })
            }
            None => Ok(create_bid(self.bid_value, rng)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auction_crypto::verify;
    use rand::rngs::OsRng;

    #[test]
    fn test_create_bid() {
        let bid = create_bid(1000, &mut OsRng);

        assert_eq!(bid.bid_value, 1000);
        assert!(bid.nonce.starts_with('n'));
        assert_eq!(bid.nonce.len(), 1 + 2 * NONCE_BYTES);
        assert!(verify(1000, &bid.nonce, &bid.bid_hash));
    }

    #[test]
    fn test_nonces_are_fresh() {
        let a = create_bid(5, &mut OsRng);
        let b = create_bid(5, &mut OsRng);
        assert_ne!(a.nonce, b.nonce);
        assert_ne!(a.bid_hash, b.bid_hash);
    }

    #[test]
    fn test_bid_builder() {
        let bid = BidBuilder::new()
            .bid_value(500)
            .nonce("secret")
            .build(&mut OsRng)
            .unwrap();

        assert_eq!(bid.bid_value, 500);
        assert_eq!(bid.nonce, "secret");
        assert_eq!(bid.bid_hash, commit(500, "secret"));
    }

    #[test]
    fn test_bid_builder_rejects_bad_nonces() {
        let empty = BidBuilder::new().bid_value(1).nonce("").build(&mut OsRng);
        assert_eq!(empty, Err(BidError::EmptyNonce));

        let digit = BidBuilder::new().bid_value(1).nonce("7abc").build(&mut OsRng);
        assert_eq!(digit, Err(BidError::AmbiguousNonce));
    }

    #[test]
    fn test_check_commitment() {
        assert!(check_commitment(&commit(42, "salt")).is_ok());
        assert!(matches!(
            check_commitment("deadbeef"),
            Err(BidError::InvalidCommitment(CryptoError::InvalidCommitmentLength {
                expected: 64,
                got: 8
            }))
        ));
        assert!(check_commitment(&commit(42, "salt").to_uppercase()).is_err());
    }
}
