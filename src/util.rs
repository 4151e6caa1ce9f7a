//! MAC/SSID formatting, the sequence counter, and timespec arithmetic.

/// A raw 802.11 MAC address. Kept as a bare array rather than pulling in a
/// richer MAC type for the hot parse/emit path.
pub type Mac = [u8; 6];

pub const BROADCAST: Mac = [0xff; 6];

/// Format a MAC address as six lowercase hex pairs separated by colons.
pub fn mac_string(mac: &Mac) -> String {
    mac.iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(":")
}

/// Render an SSID byte string for logging: copy up to 31 bytes and stop at
/// the first invalid UTF-8 boundary. Never used on the wire.
pub fn ssid_string(ssid: &[u8]) -> String {
    let truncated = &ssid[..ssid.len().min(31)];
    String::from_utf8_lossy(truncated).into_owned()
}

/// Process-wide 12-bit sequence counter. Starts at 1337 and wraps at 4096,
/// matching the original tool's numbering exactly so packet captures taken
/// against either implementation look the same on the wire.
#[derive(Debug, Clone)]
pub struct SequenceCounter {
    next: u16,
}

impl Default for SequenceCounter {
    fn default() -> Self {
        SequenceCounter { next: 1337 }
    }
}

impl SequenceCounter {
    /// Return the next sequence number and advance the counter.
    pub fn next(&mut self) -> u16 {
        let seq = self.next;
        self.next = if seq >= 4095 { 0 } else { seq + 1 };
        seq
    }
}

/// A `(seconds, nanoseconds)` pair with nanoseconds normalized to
/// `[0, 1_000_000_000)`, mirroring `struct timespec` arithmetic.
pub type TimeSpec = (i64, i64);

/// Subtract `older` from `newer`, borrowing a second when the nanosecond
/// component would otherwise go negative.
pub fn timespec_diff(newer: TimeSpec, older: TimeSpec) -> TimeSpec {
    let (mut sec, mut nsec) = (newer.0 - older.0, newer.1 - older.1);
    if nsec < 0 {
        sec -= 1;
        nsec += 1_000_000_000;
    }
    (sec, nsec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_mac_lowercase() {
        let mac = [0xAA, 0xBB, 0x0C, 0xDD, 0xEE, 0xFF];
        assert_eq!(mac_string(&mac), "aa:bb:0c:dd:ee:ff");
    }

    #[test]
    fn sequence_counter_wraps_at_4096() {
        let mut seq = SequenceCounter { next: 4095 };
        assert_eq!(seq.next(), 4095);
        assert_eq!(seq.next(), 0);
        assert_eq!(seq.next(), 1);
    }

    #[test]
    fn sequence_counter_starts_at_1337() {
        let mut seq = SequenceCounter::default();
        assert_eq!(seq.next(), 1337);
        assert_eq!(seq.next(), 1338);
    }

    #[test]
    fn timespec_diff_borrows_nanoseconds() {
        let newer = (10, 200);
        let older = (9, 900_000_000);
        assert_eq!(timespec_diff(newer, older), (0, 300_000_000));
    }

    #[test]
    fn timespec_diff_without_borrow() {
        let newer = (10, 900_000_000);
        let older = (9, 100_000_000);
        assert_eq!(timespec_diff(newer, older), (1, 800_000_000));
    }
}
