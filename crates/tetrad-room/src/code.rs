//! Room code allocation.
//!
//! Codes are six characters from `0-9A-Z`, short enough to read out loud.
//! With 36^6 (about 2.2 billion) codes a collision is rare, but a live
//! room's code is never handed out twice.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tetrad_protocol::RoomCode;

const ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const CODE_LEN: usize = 6;

/// Produces room codes from a seedable generator.
#[derive(Debug)]
pub struct CodeGenerator {
    rng: StdRng,
}

impl CodeGenerator {
    /// A generator that yields the same sequence for the same seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// A generator seeded from the operating system.
    pub fn from_os_rng() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_os_rng(),
        }
    }

    /// Returns a code for which `taken` is false, drawing again on
    /// collision.
    pub fn next_code(&mut self, taken: impl Fn(&RoomCode) -> bool) -> RoomCode {
        loop {
            let raw: String = (0..CODE_LEN)
                .map(|_| ALPHABET[self.rng.random_range(0..ALPHABET.len())] as char)
                .collect();
            let code = RoomCode::normalize(&raw);
            if !taken(&code) {
                return code;
            }
            tracing::debug!(%code, "room code collision, drawing again");
        }
    }
}
