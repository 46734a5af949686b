use std::io;

use picklock_commons::{AlphabetError, HashAlgorithm, MAX_CANDIDATE_LENGTH_ALLOWED};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong before or during a search.
///
/// Configuration problems are caught before any candidate is checked; they
/// are never folded into an `Exhausted` outcome.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Alphabet(#[from] AlphabetError),

    #[error("candidate length must be between 1 and {max}, got {got}", max = MAX_CANDIDATE_LENGTH_ALLOWED)]
    Length { got: usize },

    #[error("the search space exceeds 2^64 candidates (needs about 2^{0})")]
    Space(u32),

    #[error("the target digest is not valid hexadecimal")]
    DigestNotHex,

    #[error("the target digest is {got} bytes but {algorithm} digests are {expected} bytes")]
    DigestLength {
        algorithm: HashAlgorithm,
        got: usize,
        expected: usize,
    },

    #[error("a search worker terminated abnormally")]
    Worker,

    #[error("i/o failure during the distributed search")]
    Io(#[from] io::Error),

    #[error("failed to encode or decode a wire message")]
    Wire(#[from] bincode::Error),

    #[error("protocol violation: {0}")]
    Protocol(&'static str),
}
