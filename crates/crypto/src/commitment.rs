//! Hash commitments over `(value, nonce)` openings.
//!
//! A commitment is the SHA-256 digest of the decimal string of the bid value
//! followed by the nonce bytes, rendered as lowercase hex. It is:
//! - **Hiding**: as long as the nonce carries enough entropy
//! - **Binding**: finding a second opening requires a SHA-256 collision
//!
//! There is no domain separator or length prefix, so `(12, "3x")` and
//! `(1, "23x")` commit to the same digest; openings are only unambiguous when
//! nonces do not start with a digit. Existing commitments depend on this exact
//! preimage layout, so it cannot change.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::error::CryptoError;

/// Length of a hex-encoded commitment.
pub const COMMITMENT_HEX_LEN: usize = 64;

/// Compute the raw digest for an opening.
pub fn commit_bytes(value: u64, nonce: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(value.to_string().as_bytes());
    hasher.update(nonce.as_bytes());
    hasher.finalize().into()
}

/// Compute the lowercase hex commitment for an opening.
pub fn commit(value: u64, nonce: &str) -> String {
    hex::encode(commit_bytes(value, nonce))
}

/// Check that `(value, nonce)` opens `hash`.
///
/// Comparison is exact and case-sensitive: an uppercase rendering of the
/// right digest does not verify.
pub fn verify(value: u64, nonce: &str, hash: &str) -> bool {
    let expected = commit(value, nonce);
    if expected.len() != hash.len() {
        return false;
    }
    expected.as_bytes().ct_eq(hash.as_bytes()).into()
}

/// Validate a commitment string and decode its digest.
pub fn parse_commitment(hash: &str) -> Result<[u8; 32], CryptoError> {
    if hash.len() != COMMITMENT_HEX_LEN {
        return Err(CryptoError::InvalidCommitmentLength {
            expected: COMMITMENT_HEX_LEN,
            got: hash.len(),
        });
    }
    if hash.bytes().any(|b| b.is_ascii_uppercase()) {
        return Err(CryptoError::NonCanonicalHex);
    }

    let mut digest = [0u8; 32];
    hex::decode_to_slice(hash, &mut digest)
        .map_err(|e| CryptoError::InvalidCommitmentEncoding(e.to_string()))?;
    Ok(digest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_commit_known_vector() {
        // sha256("1000nonce")
        assert_eq!(
            commit(1000, "nonce"),
            hex::encode(Sha256::digest(b"1000nonce"))
        );
        assert_eq!(
            commit(0, ""),
            "5feceb66ffc86f38d952786c6d696c79c2dbc239dd4e91b46729d73a27fb57e9"
        );
    }

    #[test]
    fn test_commit_is_lowercase_hex() {
        let c = commit(100, "n1");
        assert_eq!(c.len(), COMMITMENT_HEX_LEN);
        assert!(c.chars().all(|ch| ch.is_ascii_digit() || ('a'..='f').contains(&ch)));
    }

    #[test]
    fn test_verify_rejects_wrong_opening() {
        let c = commit(100, "n1");
        assert!(verify(100, "n1", &c));
        assert!(!verify(101, "n1", &c));
        assert!(!verify(100, "n2", &c));
    }

    #[test]
    fn test_verify_is_case_sensitive() {
        let c = commit(100, "n1").to_uppercase();
        assert!(!verify(100, "n1", &c));
    }

    #[test]
    fn test_verify_rejects_truncated() {
        let c = commit(100, "n1");
        assert!(!verify(100, "n1", &c[..63]));
        assert!(!verify(100, "n1", ""));
    }

    #[test]
    fn test_parse_commitment() {
        let c = commit(7, "salt");
        assert_eq!(parse_commitment(&c).unwrap(), commit_bytes(7, "salt"));

        assert!(matches!(
            parse_commitment("abc"),
            Err(CryptoError::InvalidCommitmentLength { expected: 64, got: 3 })
        ));
        assert_eq!(
            parse_commitment(&c.to_uppercase()),
            Err(CryptoError::NonCanonicalHex)
        );
        assert!(matches!(
            parse_commitment(&"zz".repeat(32)),
            Err(CryptoError::InvalidCommitmentEncoding(_))
        ));
    }

    proptest! {
        #[test]
        fn commit_then_verify(value in any::<u64>(), nonce in "[a-zA-Z0-9]{0,32}") {
            let c = commit(value, &nonce);
            prop_assert!(verify(value, &nonce, &c));
            prop_assert!(parse_commitment(&c).is_ok());
        }

        #[test]
        fn other_value_does_not_verify(
            value in any::<u64>(),
            other in any::<u64>(),
            nonce in "[a-z]{1,16}",
        ) {
            prop_assume!(value != other);
            let c = commit(value, &nonce);
            prop_assert!(!verify(other, &nonce, &c));
        }

        #[test]
        fn other_nonce_does_not_verify(
            value in any::<u64>(),
            nonce in "[a-z]{1,16}",
            other in "[a-z]{1,16}",
        ) {
            prop_assume!(nonce != other);
            let c = commit(value, &nonce);
            prop_assert!(!verify(value, &other, &c));
        }
    }
}
