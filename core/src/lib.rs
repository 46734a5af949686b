//! The exhaustive search engine behind the `picklock` CLI.
//!
//! Three interchangeable candidate enumeration strategies, driven under
//! three interchangeable execution models; every one of the nine
//! combinations reports the same outcome for the same inputs.

pub mod net;

mod enumerate;
mod error;
mod search;
mod space;
mod verify;

pub use enumerate::{CandidateStream, Candidates, RecursiveStream, Strategy};
pub use error::{Error, Result};
pub use search::{search, ExecMode, Outcome};
pub use space::SearchSpace;
pub use verify::{DigestVerifier, Matcher};
