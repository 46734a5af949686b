use picklock_commons::HashAlgorithm;

use crate::error::{Error, Result};

/// The capability the search engine needs from the digest collaborator.
///
/// Implementations must be pure functions of their inputs so workers can
/// call them concurrently.
pub trait Matcher: Sync {
    /// Whether this candidate produces the target digest.
    fn matches(&self, candidate: &[u8]) -> bool;
}

impl<F> Matcher for F
where
    F: Fn(&[u8]) -> bool + Sync,
{
    fn matches(&self, candidate: &[u8]) -> bool {
        self(candidate)
    }
}

/// Matches candidates against a salted digest target.
#[derive(Clone, Debug)]
pub struct DigestVerifier {
    algorithm: HashAlgorithm,
    salt: Vec<u8>,
    target: Vec<u8>,
}

impl DigestVerifier {
    /// Validates the textual target digest and builds a verifier.
    pub fn new(algorithm: HashAlgorithm, salt: &[u8], target_hex: &str) -> Result<Self> {
        let target = hex::decode(target_hex).map_err(|_| Error::DigestNotHex)?;

        if target.len() != algorithm.digest_size() {
            return Err(Error::DigestLength {
                algorithm,
                got: target.len(),
                expected: algorithm.digest_size(),
            });
        }

        Ok(Self {
            algorithm,
            salt: salt.to_vec(),
            target,
        })
    }
}

impl Matcher for DigestVerifier {
    fn matches(&self, candidate: &[u8]) -> bool {
        self.algorithm.digest(&self.salt, candidate) == self.target
    }
}

#[cfg(test)]
mod tests {
    use picklock_commons::HashAlgorithm;

    use crate::error::Error;
    use crate::verify::{DigestVerifier, Matcher};

    #[test]
    fn test_matches_the_producing_candidate() {
        let target = HashAlgorithm::Sha256.digest_hex(b"hi", b"bac");
        let verifier = DigestVerifier::new(HashAlgorithm::Sha256, b"hi", &target).unwrap();

        assert!(verifier.matches(b"bac"));
        assert!(!verifier.matches(b"bab"));
        assert!(!verifier.matches(b"ba"));
    }

    #[test]
    fn test_uppercase_hex_is_accepted() {
        let target = HashAlgorithm::Md5.digest_hex(b"hi", b"ccc").to_uppercase();
        let verifier = DigestVerifier::new(HashAlgorithm::Md5, b"hi", &target).unwrap();

        assert!(verifier.matches(b"ccc"));
    }

    #[test]
    fn test_non_hex_target_is_rejected() {
        assert!(matches!(
            DigestVerifier::new(HashAlgorithm::Sha256, b"hi", "not-a-digest"),
            Err(Error::DigestNotHex)
        ));
    }

    #[test]
    fn test_wrong_digest_length_is_rejected() {
        // a valid md5 digest handed to a sha256 verifier
        let target = HashAlgorithm::Md5.digest_hex(b"hi", b"ccc");

        assert!(matches!(
            DigestVerifier::new(HashAlgorithm::Sha256, b"hi", &target),
            Err(Error::DigestLength { got: 16, .. })
        ));
    }
}
