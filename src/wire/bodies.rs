use super::WireError;

/// Shared by beacons and probe responses: an 8-byte timestamp (always
/// written as 0 by this system), a 16-bit interval, and 16-bit capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeaconBody {
    pub timestamp: u64,
    pub interval: u16,
    pub capabilities: u16,
}

impl BeaconBody {
    pub const LEN: usize = 12;

    pub fn parse(data: &[u8]) -> Result<Self, WireError> {
        if data.len() < Self::LEN {
            return Err(WireError::Short);
        }
        Ok(BeaconBody {
            timestamp: u64::from_le_bytes(data[0..8].try_into().unwrap()),
            interval: u16::from_le_bytes([data[8], data[9]]),
            capabilities: u16::from_le_bytes([data[10], data[11]]),
        })
    }

    pub fn emit(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.timestamp.to_le_bytes());
        buf.extend_from_slice(&self.interval.to_le_bytes());
        buf.extend_from_slice(&self.capabilities.to_le_bytes());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthBody {
    pub algorithm: u16,
    pub seq: u16,
    pub status: u16,
}

impl AuthBody {
    pub const LEN: usize = 6;

    pub fn parse(data: &[u8]) -> Result<Self, WireError> {
        if data.len() < Self::LEN {
            return Err(WireError::Short);
        }
        Ok(AuthBody {
            algorithm: u16::from_le_bytes([data[0], data[1]]),
            seq: u16::from_le_bytes([data[2], data[3]]),
            status: u16::from_le_bytes([data[4], data[5]]),
        })
    }

    pub fn emit(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.algorithm.to_le_bytes());
        buf.extend_from_slice(&self.seq.to_le_bytes());
        buf.extend_from_slice(&self.status.to_le_bytes());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssocReqBody {
    pub capabilities: u16,
    pub listen_interval: u16,
}

impl AssocReqBody {
    pub const LEN: usize = 4;

    pub fn parse(data: &[u8]) -> Result<Self, WireError> {
        if data.len() < Self::LEN {
            return Err(WireError::Short);
        }
        Ok(AssocReqBody {
            capabilities: u16::from_le_bytes([data[0], data[1]]),
            listen_interval: u16::from_le_bytes([data[2], data[3]]),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssocRespBody {
    pub capabilities: u16,
    pub status: u16,
    pub association_id: u16,
}

impl AssocRespBody {
    pub const LEN: usize = 6;

    pub fn emit(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.capabilities.to_le_bytes());
        buf.extend_from_slice(&self.status.to_le_bytes());
        buf.extend_from_slice(&self.association_id.to_le_bytes());
    }
}
