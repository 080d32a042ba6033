use std::fmt;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU32, Ordering};

use chrono::Utc;

use super::error::DomainError;

const ID_BYTES: usize = 12;
pub(crate) const ID_HEX_LEN: usize = ID_BYTES * 2;

// 12 байт: секунды (4, big-endian), случайные (5), счётчик (3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ObjectId([u8; ID_BYTES]);

static COUNTER: OnceLock<AtomicU32> = OnceLock::new();

impl ObjectId {
    pub(crate) fn new() -> Self {
        Self::from_parts(
            Utc::now().timestamp() as u32,
            rand::random::<[u8; 5]>(),
            next_counter(),
        )
    }

    fn from_parts(seconds: u32, random: [u8; 5], counter: u32) -> Self {
        let mut bytes = [0u8; ID_BYTES];
        bytes[..4].copy_from_slice(&seconds.to_be_bytes());
        bytes[4..9].copy_from_slice(&random);
        bytes[9..].copy_from_slice(&counter.to_be_bytes()[1..]);
        Self(bytes)
    }

    pub(crate) fn parse(raw: &str) -> Result<Self, DomainError> {
        if raw.len() != ID_HEX_LEN {
            return Err(invalid_id());
        }

        let mut bytes = [0u8; ID_BYTES];
        for (slot, pair) in bytes.iter_mut().zip(raw.as_bytes().chunks_exact(2)) {
            let high = hex_value(pair[0]).ok_or_else(invalid_id)?;
            let low = hex_value(pair[1]).ok_or_else(invalid_id)?;
            *slot = (high << 4) | low;
        }
        Ok(Self(bytes))
    }
}

fn invalid_id() -> DomainError {
    DomainError::Validation {
        field: "id",
        message: "must be 24 hex chars",
    }
}

fn hex_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

fn next_counter() -> u32 {
    COUNTER
        .get_or_init(|| AtomicU32::new(rand::random::<u32>()))
        .fetch_add(1, Ordering::Relaxed)
        & 0x00ff_ffff
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}
