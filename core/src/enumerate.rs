use std::ops::Range;
use std::thread;

use crossbeam_channel::{bounded, Receiver};
use picklock_commons::Candidate;

use crate::space::SearchSpace;

/// Candidates buffered between the producer thread of a recursive stream
/// and its consumer.
const STREAM_BUFFER: usize = 1024;

/// The available candidate enumeration strategies.
///
/// All three walk the same range in the same ascending order; they differ
/// only in mechanism.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Mixed-radix counter over an array of digit indices.
    Iterative,
    /// Depth-first backtracking, one recursion level per position.
    Recursive,
    /// Pull-based sequence decoding a moving cursor index.
    Lazy,
}

/// Walks `strategy` over `range`, invoking `handler` for every candidate in
/// ascending order until it returns `true`.
pub(crate) fn run(
    space: &SearchSpace,
    strategy: Strategy,
    range: Range<u64>,
    handler: &mut impl FnMut(&[u8]) -> bool,
) {
    match strategy {
        Strategy::Iterative => {
            Odometer::new(space, range).run(handler);
        }
        Strategy::Recursive => {
            run_recursive(space, range, handler);
        }
        Strategy::Lazy => {
            for candidate in Candidates::new(space, range) {
                if handler(candidate.as_bytes()) {
                    break;
                }
            }
        }
    }
}

/// Mixed-radix counter over the digit indices of a candidate range.
///
/// The digits start at the range's first candidate; each step increments
/// the last digit and carries towards the front, so the rendered buffer
/// moves through the range in ascending order.
pub(crate) struct Odometer<'a> {
    symbols: &'a [u8],
    digits: Vec<usize>,
    buf: Vec<u8>,
    remaining: u64,
}

impl<'a> Odometer<'a> {
    pub(crate) fn new(space: &'a SearchSpace, range: Range<u64>) -> Self {
        let remaining = range.end.saturating_sub(range.start);
        let digits = if remaining == 0 {
            vec![0; space.length()]
        } else {
            space.digits_at(range.start)
        };

        let symbols = space.alphabet().symbols();
        let mut buf = vec![0u8; space.length()];
        for (slot, &digit) in buf.iter_mut().zip(&digits) {
            *slot = symbols[digit];
        }

        Self {
            symbols,
            digits,
            buf,
            remaining,
        }
    }

    /// Calls `handler` for every remaining candidate, stopping early once it
    /// returns `true`. Returns whether the walk was stopped.
    pub(crate) fn run(mut self, handler: &mut impl FnMut(&[u8]) -> bool) -> bool {
        while self.remaining > 0 {
            if handler(&self.buf) {
                return true;
            }
            self.remaining -= 1;
            if self.remaining > 0 {
                self.advance();
            }
        }

        false
    }

    /// Pull-style consumption, used by the streaming pipeline.
    pub(crate) fn next_candidate(&mut self) -> Option<Candidate> {
        if self.remaining == 0 {
            return None;
        }

        let candidate = Candidate::from_bytes(&self.buf);
        self.remaining -= 1;
        if self.remaining > 0 {
            self.advance();
        }

        Some(candidate)
    }

    fn advance(&mut self) {
        for k in (0..self.digits.len()).rev() {
            self.digits[k] += 1;
            if self.digits[k] < self.symbols.len() {
                self.buf[k] = self.symbols[self.digits[k]];
                return;
            }
            self.digits[k] = 0;
            self.buf[k] = self.symbols[0];
        }

        // a carry out of the first digit means the range accounting is off
        debug_assert!(false, "odometer advanced past the end of the space");
    }
}

/// Depth-first backtracking enumeration of `range`, position 0 outermost.
///
/// The range restriction is carried down the recursion as tight lower and
/// upper digit bounds.
pub(crate) fn run_recursive(
    space: &SearchSpace,
    range: Range<u64>,
    handler: &mut impl FnMut(&[u8]) -> bool,
) -> bool {
    if range.start >= range.end {
        return false;
    }

    let lo = space.digits_at(range.start);
    let hi = space.digits_at(range.end - 1);
    let mut buf = vec![0u8; space.length()];

    descend(
        space.alphabet().symbols(),
        &lo,
        &hi,
        0,
        (true, true),
        &mut buf,
        handler,
    )
}

fn descend(
    symbols: &[u8],
    lo: &[usize],
    hi: &[usize],
    pos: usize,
    (tight_lo, tight_hi): (bool, bool),
    buf: &mut [u8],
    handler: &mut impl FnMut(&[u8]) -> bool,
) -> bool {
    if pos == buf.len() {
        return handler(buf);
    }

    let first = if tight_lo { lo[pos] } else { 0 };
    let last = if tight_hi { hi[pos] } else { symbols.len() - 1 };

    for digit in first..=last {
        buf[pos] = symbols[digit];
        let bounds = (tight_lo && digit == first, tight_hi && digit == last);
        if descend(symbols, lo, hi, pos + 1, bounds, buf, handler) {
            return true;
        }
    }

    false
}

/// A pull-based sequence of the candidates in a range, in ascending order.
///
/// Finite, forward-only and not restartable; candidates are decoded on
/// demand so the space is never materialized.
pub struct Candidates<'a> {
    space: &'a SearchSpace,
    cursor: u64,
    end: u64,
}

impl<'a> Candidates<'a> {
    pub fn new(space: &'a SearchSpace, range: Range<u64>) -> Self {
        Self {
            space,
            cursor: range.start,
            end: range.end,
        }
    }
}

impl Iterator for Candidates<'_> {
    type Item = Candidate;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.end {
            return None;
        }

        let candidate = self.space.candidate_at(self.cursor);
        self.cursor += 1;

        Some(candidate)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = usize::try_from(self.end - self.cursor).ok();
        (left.unwrap_or(usize::MAX), left)
    }
}

/// A recursive enumeration driven from its own thread and consumed as a
/// pull-based stream through a bounded channel.
pub struct RecursiveStream {
    receiver: Option<Receiver<Candidate>>,
    producer: Option<thread::JoinHandle<()>>,
}

impl RecursiveStream {
    pub(crate) fn spawn(space: &SearchSpace, range: Range<u64>) -> Self {
        let (sender, receiver) = bounded(STREAM_BUFFER);

        let symbols = space.alphabet().symbols().to_vec();
        let length = space.length();
        let bounds = if range.start >= range.end {
            None
        } else {
            Some((space.digits_at(range.start), space.digits_at(range.end - 1)))
        };

        let producer = thread::spawn(move || {
            let Some((lo, hi)) = bounds else { return };
            let mut buf = vec![0u8; length];

            // a send fails once the consumer hangs up, which stops the walk
            descend(&symbols, &lo, &hi, 0, (true, true), &mut buf, &mut |bytes: &[u8]| {
                sender.send(Candidate::from_bytes(bytes)).is_err()
            });
        });

        Self {
            receiver: Some(receiver),
            producer: Some(producer),
        }
    }
}

impl Iterator for RecursiveStream {
    type Item = Candidate;

    fn next(&mut self) -> Option<Self::Item> {
        self.receiver.as_ref()?.recv().ok()
    }
}

impl Drop for RecursiveStream {
    fn drop(&mut self) {
        drop(self.receiver.take());
        if let Some(producer) = self.producer.take() {
            let _ = producer.join();
        }
    }
}

/// Any strategy consumed as a pull-based candidate stream, for the
/// streaming execution model.
pub struct CandidateStream<'a> {
    inner: StreamInner<'a>,
}

enum StreamInner<'a> {
    Iterative(Odometer<'a>),
    Recursive(RecursiveStream),
    Lazy(Candidates<'a>),
}

impl<'a> CandidateStream<'a> {
    pub fn new(space: &'a SearchSpace, strategy: Strategy, range: Range<u64>) -> Self {
        let inner = match strategy {
            Strategy::Iterative => StreamInner::Iterative(Odometer::new(space, range)),
            Strategy::Recursive => StreamInner::Recursive(RecursiveStream::spawn(space, range)),
            Strategy::Lazy => StreamInner::Lazy(Candidates::new(space, range)),
        };

        Self { inner }
    }
}

impl Iterator for CandidateStream<'_> {
    type Item = Candidate;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            StreamInner::Iterative(odometer) => odometer.next_candidate(),
            StreamInner::Recursive(stream) => stream.next(),
            StreamInner::Lazy(candidates) => candidates.next(),
        }
    }
}

#[cfg(test)]
mod tests {
    use picklock_commons::Alphabet;

    use crate::enumerate::{run, CandidateStream, Strategy};
    use crate::space::SearchSpace;

    const STRATEGIES: [Strategy; 3] = [Strategy::Iterative, Strategy::Recursive, Strategy::Lazy];

    fn build_space(symbols: &[u8], length: usize) -> SearchSpace {
        SearchSpace::new(Alphabet::new(symbols).unwrap(), length).unwrap()
    }

    fn collect(space: &SearchSpace, strategy: Strategy, range: std::ops::Range<u64>) -> Vec<String> {
        let mut seen = Vec::new();
        run(space, strategy, range, &mut |bytes| {
            seen.push(String::from_utf8(bytes.to_vec()).unwrap());
            false
        });
        seen
    }

    #[test]
    fn test_strategies_agree_on_the_full_space() {
        let space = build_space(b"abc", 3);

        let reference = collect(&space, Strategy::Iterative, space.full_range());

        assert_eq!(27, reference.len());
        assert_eq!("aaa", reference[0]);
        assert_eq!("ccc", reference[26]);

        let mut sorted = reference.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(reference, sorted);

        for strategy in STRATEGIES {
            assert_eq!(reference, collect(&space, strategy, space.full_range()));
        }
    }

    #[test]
    fn test_strategies_agree_on_sub_ranges() {
        let space = build_space(b"adef", 3);

        for range in [0..17, 5..17, 17..64, 63..64, 10..10] {
            let expected: Vec<String> = (range.start..range.end)
                .map(|i| space.candidate_at(i).to_string())
                .collect();

            for strategy in STRATEGIES {
                assert_eq!(expected, collect(&space, strategy, range.clone()));
            }
        }
    }

    #[test]
    fn test_early_stop_counts_candidates() {
        let space = build_space(b"abc", 3);

        for strategy in STRATEGIES {
            let mut calls = 0;
            run(&space, strategy, space.full_range(), &mut |bytes| {
                calls += 1;
                bytes == b"aca"
            });
            // aaa, aab, aac, aba, abb, abc, aca
            assert_eq!(7, calls);
        }
    }

    #[test]
    fn test_streams_match_the_push_walk() {
        let space = build_space(b"abc", 4);

        let reference = collect(&space, Strategy::Iterative, space.full_range());

        for strategy in STRATEGIES {
            let streamed: Vec<String> = CandidateStream::new(&space, strategy, space.full_range())
                .map(|candidate| candidate.to_string())
                .collect();
            assert_eq!(reference, streamed);
        }
    }

    #[test]
    fn test_abandoned_recursive_stream_shuts_down() {
        let space = build_space(b"abc", 7);

        let mut stream = CandidateStream::new(&space, Strategy::Recursive, space.full_range());
        assert_eq!("aaaaaaa", stream.next().unwrap().to_string());
        assert_eq!("aaaaaab", stream.next().unwrap().to_string());

        // dropping mid-space must not leave the producer thread behind
        drop(stream);
    }
}
