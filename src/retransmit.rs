//! Single-slot retransmission cache for unicast responses.
//!
//! Probe-resp, auth-resp and assoc-resp each deposit their frame here on
//! first send; the stored copy has the Retry bit set so a later resend of
//! the identical bytes carries it. Beacons never touch this cache.

use crate::wire::CTRL_RETRY;
use std::time::{Duration, Instant};

/// Retry bit lives in byte 1 of the dot11 header, which starts right after
/// the 9-byte radiotap header this system always emits.
const CONTROL_FLAGS_OFFSET: usize = crate::wire::RADIOTAP_LEN as usize + 1;

const RATE_LIMIT: Duration = Duration::from_millis(50);

pub struct RetransmitCache {
    buf: Option<Vec<u8>>,
    last_retransmit_at: Option<Instant>,
}

impl Default for RetransmitCache {
    fn default() -> Self {
        RetransmitCache {
            buf: None,
            last_retransmit_at: None,
        }
    }
}

impl RetransmitCache {
    pub fn is_empty(&self) -> bool {
        self.buf.is_none()
    }

    /// Record `frame` as the last sent unicast response, then flip the
    /// Retry bit in the stored copy. The frame as actually transmitted is
    /// left untouched (Retry=0 on the wire for the initial send).
    pub fn store(&mut self, frame: &[u8]) {
        let mut stored = frame.to_vec();
        if let Some(flags) = stored.get_mut(CONTROL_FLAGS_OFFSET) {
            *flags |= CTRL_RETRY;
        }
        self.buf = Some(stored);
    }

    pub fn clear(&mut self) {
        self.buf = None;
        self.last_retransmit_at = None;
    }

    /// If the cache holds a frame and the rate limit has elapsed, return it
    /// and update the retransmit clock. Otherwise return `None`.
    pub fn try_resend(&mut self, now: Instant) -> Option<&[u8]> {
        let ready = match self.last_retransmit_at {
            None => true,
            Some(last) => now.duration_since(last) >= RATE_LIMIT,
        };
        if !ready || self.buf.is_none() {
            return None;
        }
        self.last_retransmit_at = Some(now);
        self.buf.as_deref()
    }
}
