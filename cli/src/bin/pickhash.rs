use clap::{Parser, ValueEnum};
use picklock_commons::{HashAlgorithm, DEFAULT_SALT};

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

/// Prints the salted digest of a password, as the search engine expects it.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The password to digest.
    #[arg(short, long, default_value = "abcd")]
    password: String,

    /// The salt mixed into the digest.
    #[arg(short, long, default_value_t = String::from_utf8_lossy(DEFAULT_SALT).to_string())]
    salt: String,

    /// The digest algorithm.
    #[arg(long, value_enum, default_value_t = AlgorithmArg::Sha256)]
    algorithm: AlgorithmArg,
}

fn main() {
    let cli = Cli::parse();
    let algorithm = HashAlgorithm::from(cli.algorithm);

    println!(
        "{}",
        algorithm.digest_hex(cli.salt.as_bytes(), cli.password.as_bytes())
    );
}
