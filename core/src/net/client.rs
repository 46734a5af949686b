use std::net::{TcpStream, ToSocketAddrs};

use picklock_commons::{Alphabet, Candidate};
use tracing::{debug, info};

use crate::enumerate::Strategy;
use crate::error::{Error, Result};
use crate::net::proto::{read_msg, write_msg, ClientMsg, Hit, ServerMsg};
use crate::search::{run_range, Outcome};
use crate::space::SearchSpace;
use crate::verify::DigestVerifier;

/// Joins a dispatch server and works jobs until told to stop.
///
/// Each job is searched with the locally selected enumeration strategy.
/// Returns `Found` if this client produced the winning candidate.
pub fn run_client(addr: impl ToSocketAddrs, strategy: Strategy) -> Result<Outcome> {
    let mut stream = TcpStream::connect(addr)?;

    let Some(ServerMsg::Attack(attack)) = read_msg(&mut stream)? else {
        return Err(Error::Protocol("expected an attack description"));
    };

    let alphabet = Alphabet::new(&attack.alphabet)?;
    let space = SearchSpace::new(alphabet, attack.length as usize)?;
    let verifier = DigestVerifier::new(attack.algorithm, &attack.salt, &attack.target)?;
    info!(length = attack.length, "joined distributed search");

    let mut won = None;
    loop {
        match read_msg::<ServerMsg>(&mut stream)? {
            Some(ServerMsg::Job(job)) => {
                debug!(start = job.start, end = job.end, "working job");
                let hit = run_range(&space, &verifier, strategy, job.start..job.end, None).map(
                    |(index, candidate)| Hit {
                        index,
                        candidate: candidate.into_bytes(),
                    },
                );
                if let Some(hit) = &hit {
                    won = Some(Candidate::from_bytes(&hit.candidate));
                }
                write_msg(&mut stream, &ClientMsg::Report { job, hit })?;
            }
            Some(ServerMsg::Shutdown) | None => break,
            Some(ServerMsg::Attack(_)) => {
                return Err(Error::Protocol("unexpected attack description"))
            }
        }
    }

    Ok(match won {
        Some(candidate) => Outcome::Found(candidate),
        None => Outcome::Exhausted,
    })
}
