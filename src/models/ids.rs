//! Document ID generation.

use ring::rand::{SecureRandom, SystemRandom};
use std::sync::atomic::{AtomicU32, Ordering};

static COUNTER: AtomicU32 = AtomicU32::new(0);

/// Generate a 24-character hex ID (timestamp, counter, random suffix).
///
/// IDs sort roughly by creation time.
pub fn generate_id() -> String {
    let seconds = chrono::Utc::now().timestamp() as u32;
    let count = COUNTER.fetch_add(1, Ordering::Relaxed);

    let mut random = [0u8; 4];
    if SystemRandom::new().fill(&mut random).is_err() {
        tracing::warn!("System RNG unavailable, ID uniqueness relies on counter");
    }

    let mut bytes = [0u8; 12];
    bytes[..4].copy_from_slice(&seconds.to_be_bytes());
    bytes[4..8].copy_from_slice(&count.to_be_bytes());
    bytes[8..].copy_from_slice(&random);
    hex::encode(bytes)
}
