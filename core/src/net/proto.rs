use std::io::{self, Read, Write};

use picklock_commons::HashAlgorithm;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::{Error, Result};

/// Frames larger than this are rejected as corrupt.
const MAX_FRAME_LEN: u32 = 1 << 20;

/// Everything a client needs to reproduce the search definition.
///
/// The server hands this over on connect so both sides always agree on
/// what is being searched.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AttackSpec {
    pub alphabet: Vec<u8>,
    pub length: u32,
    pub algorithm: HashAlgorithm,
    pub salt: Vec<u8>,
    pub target: String,
}

/// One contiguous slice of the candidate space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSpec {
    pub start: u64,
    pub end: u64,
}

/// A match reported back by a client.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Hit {
    pub index: u64,
    pub candidate: Vec<u8>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum ServerMsg {
    Attack(AttackSpec),
    Job(JobSpec),
    Shutdown,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum ClientMsg {
    Report { job: JobSpec, hit: Option<Hit> },
}

/// Writes one length-prefixed bincode frame.
pub(crate) fn write_msg<T: Serialize>(stream: &mut impl Write, msg: &T) -> Result<()> {
    let payload = bincode::serialize(msg)?;
    let len = u32::try_from(payload.len()).map_err(|_| Error::Protocol("oversized frame"))?;
    if len > MAX_FRAME_LEN {
        return Err(Error::Protocol("oversized frame"));
    }

    stream.write_all(&len.to_le_bytes())?;
    stream.write_all(&payload)?;
    stream.flush()?;

    Ok(())
}

/// Reads one frame; `Ok(None)` on a clean end of stream.
pub(crate) fn read_msg<T: DeserializeOwned>(stream: &mut impl Read) -> Result<Option<T>> {
    let mut len_buf = [0u8; 4];
    let first = loop {
        match stream.read(&mut len_buf) {
            Ok(n) => break n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    };
    if first == 0 {
        return Ok(None);
    }
    stream.read_exact(&mut len_buf[first..])?;

    let len = u32::from_le_bytes(len_buf);
    if len > MAX_FRAME_LEN {
        return Err(Error::Protocol("frame length out of bounds"));
    }

    let mut payload = vec![0u8; len as usize];
    stream.read_exact(&mut payload)?;

    Ok(Some(bincode::deserialize(&payload)?))
}
