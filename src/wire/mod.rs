//! Binary codec for radiotap + 802.11 management frames.
//!
//! Every reader here is explicit about byte order and never reinterprets a
//! slice as a packed struct: captured bytes come from the kernel with no
//! alignment guarantee, and the wire layout has to be identical regardless
//! of host endianness.

mod bodies;
mod dot11;
mod ie;
mod radiotap;

pub use bodies::{AssocReqBody, AssocRespBody, AuthBody, BeaconBody};
pub use dot11::{emit_dot11, Dot11Header, FrameType, CTRL_RETRY};
pub use ie::{emit_ie, find_ssid_ie, Ie, IE_DSPARAMS, IE_RATES, IE_SSID};
pub use radiotap::{emit_radiotap, parse_radiotap, RADIOTAP_LEN};

use thiserror::Error;

/// Errors produced while parsing inbound wire bytes. These are never fatal
/// to the process: a handler that receives one discards the frame and the
/// main loop continues.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WireError {
    #[error("not enough bytes for this field")]
    Short,
    #[error("field value was structurally invalid")]
    Malformed,
}

pub use dot11::parse_dot11;
