mod alphabet;
mod candidate;
mod digest;

pub use alphabet::{Alphabet, AlphabetError};
pub use candidate::Candidate;
pub use digest::{HashAlgorithm, DEFAULT_SALT};

/// The default alphabet.
pub const DEFAULT_ALPHABET: &[u8] = b"abc";

/// The default candidate length.
pub const DEFAULT_LENGTH: u32 = 3;

/// The maximum candidate length allowed.
pub const MAX_CANDIDATE_LENGTH_ALLOWED: usize = 20;

/// The maximum alphabet length allowed.
pub const MAX_ALPHABET_LENGTH_ALLOWED: usize = 126;
