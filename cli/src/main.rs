use std::io;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use picklock_commons::{Alphabet, HashAlgorithm, DEFAULT_ALPHABET, DEFAULT_LENGTH, DEFAULT_SALT};
use picklock_core::{
    net::{run_client, AttackSpec, Server},
    search, DigestVerifier, ExecMode, Outcome, SearchSpace, Strategy,
};
use tracing_subscriber::EnvFilter;

/// How the search is executed.
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    /// One thread walks the whole space.
    SingleThreaded,
    /// The space is split across worker threads.
    Multithreaded,
    /// A pull-driven pipeline of enumerator and verifier.
    #[value(alias = "generator")]
    Streaming,
    /// Dispatch jobs to remote clients over TCP.
    Server,
    /// Work jobs for a remote dispatch server.
    Client,
}

/// How candidates are enumerated.
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    Iterative,
    Recursive,
    #[value(name = "lazy-sequence", alias = "lazy")]
    LazySequence,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Iterative => Strategy::Iterative,
            StrategyArg::Recursive => Strategy::Recursive,
            StrategyArg::LazySequence => Strategy::Lazy,
        }
    }
}

/// All the digest algorithms supported.
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum AlgorithmArg {
    Md5,
    Sha1,
    Sha256,
}

impl From<AlgorithmArg> for HashAlgorithm {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::Md5 => HashAlgorithm::Md5,
            AlgorithmArg::Sha1 => HashAlgorithm::Sha1,
            AlgorithmArg::Sha256 => HashAlgorithm::Sha256,
        }
    }
}

/// Recovers the password behind a salted digest by exhaustive search.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The execution model driving the search.
    #[arg(short, long, value_enum, default_value_t = ModeArg::SingleThreaded)]
    mode: ModeArg,

    /// The candidate enumeration strategy.
    #[arg(short = 'b', long = "strategy", value_enum, default_value_t = StrategyArg::Iterative)]
    strategy: StrategyArg,

    /// The password length to search.
    #[arg(short, long, default_value_t = DEFAULT_LENGTH)]
    length: u32,

    /// The target digest, in hexadecimal. Defaults to the digest of "ccc".
    #[arg(short = 'd', long = "digest", alias = "hash", value_parser = check_hex)]
    digest: Option<String>,

    /// The alphabet candidates are drawn from.
    #[arg(short, long, default_value_t = String::from_utf8_lossy(DEFAULT_ALPHABET).to_string())]
    alphabet: String,

    /// The salt the digest collaborator mixes into every hash.
    #[arg(long, default_value_t = String::from_utf8_lossy(DEFAULT_SALT).to_string())]
    salt: String,

    /// The digest algorithm of the collaborator.
    #[arg(long, value_enum, default_value_t = AlgorithmArg::Sha256)]
    algorithm: AlgorithmArg,

    /// Bind address in server mode, server address in client mode.
    #[arg(long, default_value = "127.0.0.1:9000")]
    address: String,
}

/// Checks that the digest is valid hexadecimal.
fn check_hex(hex: &str) -> Result<String> {
    hex::decode(hex).context("The digest is not valid hexadecimal")?;
    Ok(hex.to_owned())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let algorithm = HashAlgorithm::from(cli.algorithm);
    let strategy = Strategy::from(cli.strategy);
    let target = cli
        .digest
        .clone()
        .unwrap_or_else(|| algorithm.digest_hex(cli.salt.as_bytes(), b"ccc"));
    tracing::debug!(?strategy, %algorithm, digest = %target, "configured");

    let outcome = match cli.mode {
        ModeArg::Server => {
            let attack = AttackSpec {
                alphabet: cli.alphabet.clone().into_bytes(),
                length: cli.length,
                algorithm,
                salt: cli.salt.clone().into_bytes(),
                target,
            };
            let server = Server::bind(&cli.address)
                .with_context(|| format!("unable to bind {}", cli.address))?;
            server.run(&attack)?
        }
        ModeArg::Client => run_client(&cli.address, strategy)
            .with_context(|| format!("unable to join {}", cli.address))?,
        local => {
            let alphabet = Alphabet::new(cli.alphabet.as_bytes())?;
            let space = SearchSpace::new(alphabet, cli.length as usize)?;
            let verifier = DigestVerifier::new(algorithm, cli.salt.as_bytes(), &target)?;
            let mode = match local {
                ModeArg::Multithreaded => ExecMode::MultiThreaded,
                ModeArg::Streaming => ExecMode::Streaming,
                _ => ExecMode::SingleThreaded,
            };
            search(&space, &verifier, strategy, mode)?
        }
    };

    match outcome {
        Outcome::Found(candidate) => println!("Password found: '{candidate}'"),
        Outcome::Exhausted => println!("Password not found"),
    }

    Ok(())
}
