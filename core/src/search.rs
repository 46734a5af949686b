use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use picklock_commons::Candidate;
use tracing::debug;

use crate::enumerate::{self, CandidateStream, Strategy};
use crate::error::{Error, Result};
use crate::space::SearchSpace;
use crate::verify::Matcher;

/// The available execution models.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExecMode {
    /// One control flow walks the whole space.
    SingleThreaded,
    /// The space is split into contiguous ranges, one worker thread each.
    MultiThreaded,
    /// A single pull-driven pipeline of enumerator and verifier.
    Streaming,
}

/// The terminal outcome of a search run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Found(Candidate),
    Exhausted,
}

impl Outcome {
    pub fn is_found(&self) -> bool {
        matches!(self, Outcome::Found(_))
    }
}

/// Drives `strategy` against `matcher` under `mode`.
///
/// Returns the first match in candidate order, or `Exhausted` once the
/// whole space has been checked. The outcome is a pure function of the
/// inputs: every strategy and mode combination reports the same result.
pub fn search<M: Matcher>(
    space: &SearchSpace,
    matcher: &M,
    strategy: Strategy,
    mode: ExecMode,
) -> Result<Outcome> {
    debug!(?strategy, ?mode, size = space.size(), "starting search");

    match mode {
        ExecMode::SingleThreaded => Ok(sequential(space, matcher, strategy)),
        ExecMode::MultiThreaded => parallel(space, matcher, strategy),
        ExecMode::Streaming => Ok(streaming(space, matcher, strategy)),
    }
}

fn sequential<M: Matcher>(space: &SearchSpace, matcher: &M, strategy: Strategy) -> Outcome {
    match run_range(space, matcher, strategy, space.full_range(), None) {
        Some((_, candidate)) => Outcome::Found(candidate),
        None => Outcome::Exhausted,
    }
}

fn streaming<M: Matcher>(space: &SearchSpace, matcher: &M, strategy: Strategy) -> Outcome {
    let stream = CandidateStream::new(space, strategy, space.full_range());

    for candidate in stream {
        if matcher.matches(candidate.as_bytes()) {
            return Outcome::Found(candidate);
        }
    }

    Outcome::Exhausted
}

fn parallel<M: Matcher>(space: &SearchSpace, matcher: &M, strategy: Strategy) -> Result<Outcome> {
    let size = space.size();
    let workers = worker_count(size);
    if workers <= 1 {
        return Ok(sequential(space, matcher, strategy));
    }

    debug!(workers, "dispatching contiguous worker ranges");

    let stop_flag = AtomicBool::new(false);
    let stop = &stop_flag;

    let reports = thread::scope(|scope| {
        let handles: Vec<_> = partition(size, workers)
            .map(|range| {
                scope.spawn(move || {
                    let hit = run_range(space, matcher, strategy, range, Some(stop));
                    if hit.is_some() {
                        stop.store(true, Ordering::Relaxed);
                    }
                    hit
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join())
            .collect::<Vec<_>>()
    });

    // several workers may report near-simultaneous hits; the smallest
    // global index wins regardless of scheduling
    let mut best: Option<(u64, Candidate)> = None;
    for report in reports {
        let hit = report.map_err(|_| Error::Worker)?;
        if let Some((index, candidate)) = hit {
            if best.as_ref().map_or(true, |(b, _)| index < *b) {
                best = Some((index, candidate));
            }
        }
    }

    Ok(match best {
        Some((_, candidate)) => Outcome::Found(candidate),
        None => Outcome::Exhausted,
    })
}

/// Runs one strategy instance over `range` and returns the first hit with
/// its global index. Checks `stop` between candidates when given.
pub(crate) fn run_range<M: Matcher>(
    space: &SearchSpace,
    matcher: &M,
    strategy: Strategy,
    range: Range<u64>,
    stop: Option<&AtomicBool>,
) -> Option<(u64, Candidate)> {
    let base = range.start;
    let mut offset = 0u64;
    let mut hit = None;

    let mut handler = |candidate: &[u8]| {
        if let Some(stop) = stop {
            if stop.load(Ordering::Relaxed) {
                return true;
            }
        }
        if matcher.matches(candidate) {
            debug!(index = base + offset, "candidate matched");
            hit = Some((base + offset, Candidate::from_bytes(candidate)));
            return true;
        }
        offset += 1;
        false
    };

    enumerate::run(space, strategy, range, &mut handler);
    hit
}

/// Splits `size` candidates into `parts` contiguous, exhaustive ranges.
fn partition(size: u64, parts: u64) -> impl Iterator<Item = Range<u64>> {
    (0..parts).map(move |part| {
        let start = (size as u128 * part as u128 / parts as u128) as u64;
        let end = (size as u128 * (part + 1) as u128 / parts as u128) as u64;
        start..end
    })
}

fn worker_count(size: u64) -> u64 {
    let threads = thread::available_parallelism().map_or(1, |n| n.get()) as u64;
    threads.min(size).max(1)
}
