//! Distributed search over TCP: a dispatch server partitions the candidate
//! space into jobs and farms them out to worker clients.

mod client;
mod proto;
mod server;

pub use client::run_client;
pub use proto::AttackSpec;
pub use server::Server;

#[cfg(test)]
mod tests {
    use std::thread;

    use picklock_commons::HashAlgorithm;

    use crate::net::{run_client, AttackSpec, Server};
    use crate::search::Outcome;
    use crate::Strategy;

    fn build_attack(password: &[u8]) -> AttackSpec {
        AttackSpec {
            alphabet: b"abc".to_vec(),
            length: password.len() as u32,
            algorithm: HashAlgorithm::Sha256,
            salt: b"hi".to_vec(),
            target: HashAlgorithm::Sha256.digest_hex(b"hi", password),
        }
    }

    fn run_pair(attack: AttackSpec, strategy: Strategy) -> (Outcome, Outcome) {
        let server = Server::bind("127.0.0.1:0").unwrap();
        let addr = server.local_addr().unwrap();

        let client = thread::spawn(move || run_client(addr, strategy).unwrap());
        let server_outcome = server.run(&attack).unwrap();
        let client_outcome = client.join().unwrap();

        (server_outcome, client_outcome)
    }

    #[test]
    fn test_loopback_search_finds_the_password() {
        let (server_outcome, client_outcome) = run_pair(build_attack(b"bacca"), Strategy::Iterative);

        assert_eq!(Outcome::Found(b"bacca".to_vec().into()), server_outcome);
        assert_eq!(Outcome::Found(b"bacca".to_vec().into()), client_outcome);
    }

    #[test]
    fn test_loopback_search_exhausts_on_a_foreign_password() {
        let (server_outcome, client_outcome) = run_pair(build_attack(b"qaaaa"), Strategy::Recursive);

        assert_eq!(Outcome::Exhausted, server_outcome);
        assert_eq!(Outcome::Exhausted, client_outcome);
    }
}
