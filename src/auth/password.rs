//! Credential hashing.
//!
//! bcrypt digests embed their own salt and cost factor, so the cost can be
//! raised later without invalidating stored hashes: verification re-derives
//! from the parameters inside the digest.

/// Hash a plaintext password for storage.
pub fn hash(plaintext: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(plaintext, cost)
}

/// Verify a plaintext password against a stored digest.
///
/// Never fails: a malformed digest verifies as `false`.
pub fn verify(plaintext: &str, digest: &str) -> bool {
    bcrypt::verify(plaintext, digest).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    // bcrypt's minimum cost, to keep the tests quick
    const TEST_COST: u32 = 4;

    #[test]
    fn hash_then_verify_round_trips() {
        let digest = hash("hunter22", TEST_COST).unwrap();
        assert!(verify("hunter22", &digest));
        assert!(!verify("hunter23", &digest));
    }

    #[test]
    fn hashes_are_salted_but_both_verify() {
        let a = hash("hunter22", TEST_COST).unwrap();
        let b = hash("hunter22", TEST_COST).unwrap();
        assert_ne!(a, b);
        assert!(verify("hunter22", &a));
        assert!(verify("hunter22", &b));
    }

    #[test]
    fn malformed_digest_verifies_false() {
        assert!(!verify("hunter22", "not-a-bcrypt-digest"));
        assert!(!verify("hunter22", ""));
    }
}
