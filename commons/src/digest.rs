use core::fmt::{self, Display};

use md5::Md5;
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Digest, Sha256};

/// The default salt mixed into every digest.
pub const DEFAULT_SALT: &[u8] = b"hi";

/// All the digest algorithms the hashing collaborator supports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    Sha256,
}

impl HashAlgorithm {
    /// Digest of `salt || candidate` as raw bytes.
    pub fn digest(&self, salt: &[u8], candidate: &[u8]) -> Vec<u8> {
        match self {
            HashAlgorithm::Md5 => salted::<Md5>(salt, candidate),
            HashAlgorithm::Sha1 => salted::<Sha1>(salt, candidate),
            HashAlgorithm::Sha256 => salted::<Sha256>(salt, candidate),
        }
    }

    /// The same digest in the textual encoding the collaborator emits.
    pub fn digest_hex(&self, salt: &[u8], candidate: &[u8]) -> String {
        hex::encode(self.digest(salt, candidate))
    }

    /// Gets the digest size in bytes.
    pub fn digest_size(&self) -> usize {
        match self {
            HashAlgorithm::Md5 => Md5::output_size(),
            HashAlgorithm::Sha1 => Sha1::output_size(),
            HashAlgorithm::Sha256 => Sha256::output_size(),
        }
    }
}

impl Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HashAlgorithm::Md5 => "md5",
            HashAlgorithm::Sha1 => "sha1",
            HashAlgorithm::Sha256 => "sha256",
        })
    }
}

fn salted<D: Digest>(salt: &[u8], candidate: &[u8]) -> Vec<u8> {
    let mut hasher = D::new();
    hasher.update(salt);
    hasher.update(candidate);
    hasher.finalize().to_vec()
}

#[cfg(test)]
mod tests {
    use crate::HashAlgorithm;

    #[test]
    fn test_known_digests() {
        // reference digests of the string "abc"
        assert_eq!(
            "900150983cd24fb0d6963f7d28e17f72",
            HashAlgorithm::Md5.digest_hex(b"a", b"bc")
        );
        assert_eq!(
            "a9993e364706816aba3e25717850c26c9cd0d89d",
            HashAlgorithm::Sha1.digest_hex(b"a", b"bc")
        );
        assert_eq!(
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad",
            HashAlgorithm::Sha256.digest_hex(b"a", b"bc")
        );
    }

    #[test]
    fn test_salt_is_a_plain_prefix() {
        let split_one = HashAlgorithm::Sha256.digest_hex(b"hi", b"ccc");
        let split_two = HashAlgorithm::Sha256.digest_hex(b"hic", b"cc");

        assert_eq!(split_one, split_two);
    }

    #[test]
    fn test_digest_sizes() {
        assert_eq!(16, HashAlgorithm::Md5.digest_size());
        assert_eq!(20, HashAlgorithm::Sha1.digest_size());
        assert_eq!(32, HashAlgorithm::Sha256.digest_size());
    }
}
