use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::sync::{Condvar, Mutex};
use std::thread;
use std::time::Duration;

use picklock_commons::{Alphabet, Candidate};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::net::proto::{read_msg, write_msg, AttackSpec, ClientMsg, Hit, JobSpec, ServerMsg};
use crate::search::Outcome;
use crate::space::SearchSpace;

/// How long the accept loop sleeps between polls for new connections.
const ACCEPT_POLL: Duration = Duration::from_millis(25);

/// Coordinates a distributed search, farming candidate ranges out to every
/// client that connects.
pub struct Server {
    listener: TcpListener,
}

impl Server {
    pub fn bind(addr: impl ToSocketAddrs) -> Result<Self> {
        let listener = TcpListener::bind(addr)?;
        listener.set_nonblocking(true)?;

        Ok(Self { listener })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Runs the search to completion.
    ///
    /// Blocks until a client reports a match or every job has been worked;
    /// jobs held by clients that drop mid-flight are handed to the next
    /// client that asks.
    pub fn run(&self, attack: &AttackSpec) -> Result<Outcome> {
        let alphabet = Alphabet::new(&attack.alphabet)?;
        // one job covers the last two candidate positions
        let span = (alphabet.len() as u64).saturating_mul(alphabet.len() as u64);
        let space = SearchSpace::new(alphabet, attack.length as usize)?;

        let dispatcher = Dispatcher::new(space.size(), span);
        info!(size = space.size(), span, "serving distributed search");

        thread::scope(|scope| {
            let dispatcher = &dispatcher;
            let mut clients = Vec::new();

            loop {
                match self.listener.accept() {
                    Ok((stream, peer)) => {
                        info!(%peer, "client connected");
                        let attack = attack.clone();
                        clients.push(scope.spawn(move || serve_client(stream, attack, dispatcher)));
                    }
                    Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                        if dispatcher.is_done() {
                            break;
                        }
                        thread::sleep(ACCEPT_POLL);
                    }
                    Err(e) => {
                        warn!(error = %e, "accept failed");
                        thread::sleep(ACCEPT_POLL);
                    }
                }
            }

            for client in clients {
                let _ = client.join();
            }
        });

        Ok(match dispatcher.into_hit() {
            Some(hit) => Outcome::Found(Candidate::from_bytes(&hit.candidate)),
            None => Outcome::Exhausted,
        })
    }
}

fn serve_client(mut stream: TcpStream, attack: AttackSpec, dispatcher: &Dispatcher) {
    let peer = stream.peer_addr().ok();

    if let Err(error) = write_msg(&mut stream, &ServerMsg::Attack(attack)) {
        warn!(?peer, %error, "failed to hand the attack to the client");
        return;
    }

    while let Some(job) = dispatcher.take() {
        if let Err(error) = write_msg(&mut stream, &ServerMsg::Job(job)) {
            warn!(?peer, %error, "client lost, requeueing its job");
            dispatcher.abandon(job);
            return;
        }

        match read_msg::<ClientMsg>(&mut stream) {
            Ok(Some(ClientMsg::Report { hit, .. })) => {
                if let Some(hit) = &hit {
                    debug!(index = hit.index, "client reported a hit");
                }
                dispatcher.complete(hit);
            }
            Ok(None) | Err(_) => {
                warn!(?peer, "client lost, requeueing its job");
                dispatcher.abandon(job);
                return;
            }
        }
    }

    let _ = write_msg(&mut stream, &ServerMsg::Shutdown);
}

/// Job dispatch state shared between the client-serving threads.
struct Dispatcher {
    state: Mutex<DispatchState>,
    progress: Condvar,
    span: u64,
    size: u64,
}

struct DispatchState {
    next: u64,
    retry: Vec<JobSpec>,
    outstanding: usize,
    hit: Option<Hit>,
    done: bool,
}

impl Dispatcher {
    fn new(size: u64, span: u64) -> Self {
        Self {
            state: Mutex::new(DispatchState {
                next: 0,
                retry: Vec::new(),
                outstanding: 0,
                hit: None,
                done: false,
            }),
            progress: Condvar::new(),
            span: span.max(1),
            size,
        }
    }

    /// Hands out the next job, blocking while requeued work may still show
    /// up. `None` once the search is complete.
    fn take(&self) -> Option<JobSpec> {
        let mut state = self.state.lock().unwrap();

        loop {
            if state.done {
                return None;
            }
            if let Some(job) = state.retry.pop() {
                state.outstanding += 1;
                return Some(job);
            }
            if state.next < self.size {
                let start = state.next;
                let end = self.size.min(start + self.span);
                state.next = end;
                state.outstanding += 1;
                return Some(JobSpec { start, end });
            }
            if state.outstanding == 0 {
                state.done = true;
                self.progress.notify_all();
                return None;
            }
            state = self.progress.wait(state).unwrap();
        }
    }

    /// Registers a completed job and any hit it produced. A hit ends the
    /// dispatch; the smallest reported index wins.
    fn complete(&self, hit: Option<Hit>) {
        let mut state = self.state.lock().unwrap();
        state.outstanding -= 1;

        if let Some(hit) = hit {
            let better = state.hit.as_ref().map_or(true, |best| hit.index < best.index);
            if better {
                state.hit = Some(hit);
            }
            state.done = true;
        }
        if state.outstanding == 0 && state.next >= self.size && state.retry.is_empty() {
            state.done = true;
        }

        self.progress.notify_all();
    }

    /// Returns a failed job to the queue.
    fn abandon(&self, job: JobSpec) {
        let mut state = self.state.lock().unwrap();
        state.outstanding -= 1;
        state.retry.push(job);
        self.progress.notify_all();
    }

    fn is_done(&self) -> bool {
        self.state.lock().unwrap().done
    }

    fn into_hit(self) -> Option<Hit> {
        self.state.into_inner().unwrap().hit
    }
}
