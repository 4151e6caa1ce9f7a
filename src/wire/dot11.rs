use super::WireError;
use crate::util::Mac;

/// Fixed size of the 802.11 MAC header this system reads and writes.
pub const DOT11_HEADER_LEN: usize = 24;

/// Bit 3 of the control-flags byte: the Retry flag.
pub const CTRL_RETRY: u8 = 0x08;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameType {
    Management,
    Control,
    Data,
    Reserved,
}

impl FrameType {
    fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => FrameType::Management,
            1 => FrameType::Control,
            2 => FrameType::Data,
            _ => FrameType::Reserved,
        }
    }

    fn to_bits(self) -> u8 {
        match self {
            FrameType::Management => 0,
            FrameType::Control => 1,
            FrameType::Data => 2,
            FrameType::Reserved => 3,
        }
    }
}

/// A parsed (or about-to-be-emitted) 802.11 MAC header.
///
/// The first wire byte packs version (low 2 bits), type (next 2 bits) and
/// subtype (high 4 bits); the second byte is the control-flags byte, whose
/// bit 3 is the Retry flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dot11Header {
    pub version: u8,
    pub frame_type: FrameType,
    pub subtype: u8,
    pub control_flags: u8,
    pub duration: u16,
    pub dst: Mac,
    pub src: Mac,
    pub bssid: Mac,
    pub frag: u8,
    pub seq: u16,
}

impl Dot11Header {
    pub fn retry(&self) -> bool {
        self.control_flags & CTRL_RETRY != 0
    }
}

fn read_mac(bytes: &[u8]) -> Mac {
    [bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5]]
}

/// Parse the fixed 24-byte 802.11 MAC header, returning the header and
/// whatever bytes follow it (the frame body + information elements).
pub fn parse_dot11(data: &[u8]) -> Result<(Dot11Header, &[u8]), WireError> {
    if data.len() < DOT11_HEADER_LEN {
        return Err(WireError::Short);
    }

    let b0 = data[0];
    let version = b0 & 0x03;
    let frame_type = FrameType::from_bits(b0 >> 2);
    let subtype = b0 >> 4;

    let control_flags = data[1];
    let duration = u16::from_le_bytes([data[2], data[3]]);
    let dst = read_mac(&data[4..10]);
    let src = read_mac(&data[10..16]);
    let bssid = read_mac(&data[16..22]);
    let seq_ctrl = u16::from_le_bytes([data[22], data[23]]);
    let frag = (seq_ctrl & 0x0f) as u8;
    let seq = seq_ctrl >> 4;

    let header = Dot11Header {
        version,
        frame_type,
        subtype,
        control_flags,
        duration,
        dst,
        src,
        bssid,
        frag,
        seq,
    };

    Ok((header, &data[DOT11_HEADER_LEN..]))
}

/// Append a 24-byte 802.11 MAC header. Always uses protocol version 0,
/// fragment 0, duration 0 and control flags 0 (Retry is set later, on the
/// stored retransmission copy, not at emission time).
pub fn emit_dot11(buf: &mut Vec<u8>, frame_type: FrameType, subtype: u8, dst: &Mac, src: &Mac, bssid: &Mac, seq: u16) {
    let b0 = (frame_type.to_bits() << 2) | (subtype << 4);
    buf.push(b0);
    buf.push(0); // control flags
    buf.extend_from_slice(&0u16.to_le_bytes()); // duration
    buf.extend_from_slice(dst);
    buf.extend_from_slice(src);
    buf.extend_from_slice(bssid);
    let seq_ctrl = (seq << 4) & 0xfff0; // frag = 0 in the low nibble
    buf.extend_from_slice(&seq_ctrl.to_le_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Mac, Mac, Mac) {
        (
            [0x02, 0xaa, 0xbb, 0xcc, 0xdd, 0xee],
            [0x11, 0x22, 0x33, 0x44, 0x55, 0x66],
            [0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc],
        )
    }

    #[test]
    fn round_trips_every_field() {
        let (dst, src, bssid) = sample();
        let mut buf = Vec::new();
        emit_dot11(&mut buf, FrameType::Management, 11, &dst, &src, &bssid, 2000);

        let (hdr, rest) = parse_dot11(&buf).unwrap();
        assert_eq!(hdr.version, 0);
        assert_eq!(hdr.frame_type, FrameType::Management);
        assert_eq!(hdr.subtype, 11);
        assert_eq!(hdr.control_flags, 0);
        assert_eq!(hdr.duration, 0);
        assert_eq!(hdr.dst, dst);
        assert_eq!(hdr.src, src);
        assert_eq!(hdr.bssid, bssid);
        assert_eq!(hdr.frag, 0);
        assert_eq!(hdr.seq, 2000);
        assert!(rest.is_empty());
    }

    #[test]
    fn packs_version_type_subtype_into_first_byte() {
        let (dst, src, bssid) = sample();
        let mut buf = Vec::new();
        emit_dot11(&mut buf, FrameType::Data, 0, &dst, &src, &bssid, 0);
        // type = Data (2), subtype = 0, version = 0 -> 0b0000_1000
        assert_eq!(buf[0], 0b0000_1000);
    }

    #[test]
    fn retry_bit_is_bit_three_of_second_byte() {
        let mut hdr_bytes = vec![0u8; DOT11_HEADER_LEN];
        hdr_bytes[1] = CTRL_RETRY;
        let (hdr, _) = parse_dot11(&hdr_bytes).unwrap();
        assert!(hdr.retry());
    }

    #[test]
    fn rejects_short_header() {
        assert_eq!(parse_dot11(&[0u8; 23]), Err(WireError::Short));
    }
}
