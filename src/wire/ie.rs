use super::WireError;

pub const IE_SSID: u8 = 0;
pub const IE_RATES: u8 = 1;
pub const IE_DSPARAMS: u8 = 3;

/// A single information element: an id, and a borrowed view of its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ie<'a> {
    pub id: u8,
    pub data: &'a [u8],
}

/// Walk a concatenation of information elements looking for the first
/// SSID IE (id 0). Stops and returns `None` as soon as the area is
/// malformed, rather than trying to resynchronize.
pub fn find_ssid_ie(area: &[u8]) -> Option<Ie<'_>> {
    let mut rem = area;
    loop {
        if rem.is_empty() {
            return None;
        }
        if rem.len() < 2 {
            return None;
        }
        let id = rem[0];
        let len = rem[1] as usize;
        if rem.len() < 2 + len {
            return None;
        }
        let data = &rem[2..2 + len];
        if id == IE_SSID {
            return Some(Ie { id, data });
        }
        rem = &rem[2 + len..];
    }
}

/// Append a single information element: 1-byte id, 1-byte length, then the
/// payload verbatim. Payloads longer than 255 bytes are a caller bug (every
/// IE this system emits is well under that), so the length is truncated to
/// `u8` rather than threading a `Result` through every call site.
pub fn emit_ie(buf: &mut Vec<u8>, id: u8, data: &[u8]) {
    buf.push(id);
    buf.push(data.len() as u8);
    buf.extend_from_slice(data);
}

/// Parse a single IE off the front of `area`, for callers that need
/// something other than SSID lookup (the assoc-request handler reads the
/// SSID IE, if present, purely for logging).
pub fn parse_ie(area: &[u8]) -> Result<(Ie<'_>, &[u8]), WireError> {
    if area.len() < 2 {
        return Err(WireError::Short);
    }
    let id = area[0];
    let len = area[1] as usize;
    if area.len() < 2 + len {
        return Err(WireError::Short);
    }
    Ok((
        Ie {
            id,
            data: &area[2..2 + len],
        },
        &area[2 + len..],
    ))
}
