//! ID generation: nano ids and snowflake ids

use std::fmt;
use std::thread;
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use rand::Rng;

use crate::error::{KitError, Result};

const DEFAULT_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const SPECIAL_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";
const DEFAULT_NANO_LEN: usize = 22;

fn nano_from(alphabet: &[u8], len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| char::from(alphabet[rng.gen_range(0..alphabet.len())]))
        .collect()
}

/// 22-character alphanumeric id
pub fn nano_id() -> String {
    nano_from(DEFAULT_ALPHABET, DEFAULT_NANO_LEN)
}

pub fn nano_id_with_len(len: usize) -> String {
    nano_from(DEFAULT_ALPHABET, len)
}

/// Like [`nano_id_with_len`] but the alphabet also holds ASCII punctuation
pub fn special_nano_id_with_len(len: usize) -> String {
    nano_from(SPECIAL_ALPHABET, len)
}

// ═══════════════════════════════════════════════════════════════
// SNOWFLAKE
// ═══════════════════════════════════════════════════════════════

/// 2020-01-01T00:00:00Z in Unix milliseconds
const EPOCH_MS: i64 = 1_577_836_800_000;
const NODE_BITS: u32 = 10;
const SEQUENCE_BITS: u32 = 12;
const MAX_NODE: u16 = (1 << NODE_BITS) - 1;
const SEQUENCE_MASK: u64 = (1 << SEQUENCE_BITS) - 1;

#[derive(Debug, Default)]
struct SnowflakeState {
    last_ms: u64,
    sequence: u64,
    last_id: u64,
}

/// Snowflake id generator.
///
/// Layout (high to low): 41-bit milliseconds since 2020-01-01, 10-bit node,
/// 12-bit sequence. Ids from one generator are strictly increasing, even
/// across a backwards clock step.
#[derive(Debug)]
pub struct Snowflake {
    node: u64,
    state: Mutex<SnowflakeState>,
}

impl Snowflake {
    /// Generator for `node` (0..=1023)
    pub fn new(node: u16) -> Result<Self> {
        if node > MAX_NODE {
            return Err(KitError::IntOverflow {
                value: node.to_string(),
            });
        }
        Ok(Self {
            node: u64::from(node),
            state: Mutex::new(SnowflakeState::default()),
        })
    }

    pub fn node(&self) -> u16 {
        self.node as u16
    }

    pub fn next_id(&self) -> u64 {
        let mut state = self.state.lock();
        let mut now = now_ms().max(state.last_ms);

        if now == state.last_ms {
            state.sequence = (state.sequence + 1) & SEQUENCE_MASK;
            if state.sequence == 0 {
                now = wait_past(state.last_ms);
            }
        } else {
            state.sequence = 0;
        }

        state.last_ms = now;
        state.last_id = (now << (NODE_BITS + SEQUENCE_BITS)) | (self.node << SEQUENCE_BITS) | state.sequence;
        state.last_id
    }

    /// Most recently issued id, 0 before the first call
    pub fn last_id(&self) -> u64 {
        self.state.lock().last_id
    }
}

impl Default for Snowflake {
    fn default() -> Self {
        Self {
            node: 0,
            state: Mutex::new(SnowflakeState::default()),
        }
    }
}

impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.last_id())
    }
}

fn now_ms() -> u64 {
    u64::try_from(Utc::now().timestamp_millis() - EPOCH_MS).unwrap_or(0)
}

fn wait_past(last_ms: u64) -> u64 {
    loop {
        let now = now_ms();
        if now > last_ms {
            return now;
        }
        thread::sleep(Duration::from_micros(100));
    }
}
