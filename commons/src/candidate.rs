use core::fmt::{self, Debug, Display};
use core::str;

/// One fixed-length password candidate drawn from an alphabet.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Candidate(Vec<u8>);

impl Candidate {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Candidate(bytes.to_vec())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for Candidate {
    fn from(bytes: Vec<u8>) -> Self {
        Candidate(bytes)
    }
}

impl AsRef<[u8]> for Candidate {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(str::from_utf8(&self.0).map_err(|_| fmt::Error)?)
    }
}

impl Debug for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        <Candidate as Display>::fmt(self, f)
    }
}
