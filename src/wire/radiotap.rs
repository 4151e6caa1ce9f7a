use super::WireError;

/// Length in bytes of every radiotap header this system emits: the fixed
/// 8-byte header plus a single rate field, nothing else.
pub const RADIOTAP_LEN: u16 = 9;

const RADIOTAP_RATE_BIT: u32 = 1 << 2;
const RATE_2MBPS: u8 = 0x04;

/// Parse a radiotap header prefix off `data`, returning `(it_len, body)`
/// where `body` is everything after the radiotap header.
///
/// Only `it_len` is read from the header; the presence bitmap and any PHY
/// fields it describes are skipped over unparsed, since nothing downstream
/// of this codec needs them.
pub fn parse_radiotap(data: &[u8]) -> Result<(u16, &[u8]), WireError> {
    if data.len() < 8 {
        return Err(WireError::Short);
    }

    let it_len = u16::from_le_bytes([data[2], data[3]]);

    // There must be at least one byte of 802.11 data after the header.
    if (data.len() as u64) <= it_len as u64 {
        return Err(WireError::Malformed);
    }

    Ok((it_len, &data[it_len as usize..]))
}

/// Append the minimal 9-byte radiotap header this system always emits:
/// version 0, no padding, length 9, presence bitmap with only the RATE bit
/// set, followed by a single rate byte (`0x04` = 2 Mb/s).
pub fn emit_radiotap(buf: &mut Vec<u8>) {
    buf.push(0); // it_version
    buf.push(0); // it_pad
    buf.extend_from_slice(&RADIOTAP_LEN.to_le_bytes());
    buf.extend_from_slice(&RADIOTAP_RATE_BIT.to_le_bytes());
    buf.push(RATE_2MBPS);
}
