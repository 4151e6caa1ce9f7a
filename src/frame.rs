//! Frame builders: the four outbound frame shapes this system ever emits,
//! each assembled into a single contiguous injection buffer starting with
//! the radiotap header.

use crate::util::Mac;
use crate::wire::{
    emit_dot11, emit_ie, emit_radiotap, AssocRespBody, AuthBody, BeaconBody, FrameType, IE_DSPARAMS,
    IE_RATES, IE_SSID,
};

pub const SUBTYPE_BEACON: u8 = 8;
pub const SUBTYPE_PROBE_REQ: u8 = 4;
pub const SUBTYPE_PROBE_RESP: u8 = 5;
pub const SUBTYPE_AUTH: u8 = 11;
pub const SUBTYPE_ASSOC_REQ: u8 = 0;
pub const SUBTYPE_ASSOC_RESP: u8 = 1;

const BEACON_INTERVAL: u16 = 500;
const CAPABILITIES_ESS: u16 = 1;
const SUPPORTED_RATES: [u8; 8] = [0x0c, 0x12, 0x18, 0x24, 0x30, 0x48, 0x60, 0x6c];

/// Append the SSID, Supported-Rates and DS-Parameter-Set IEs shared by
/// beacons and probe responses.
fn emit_beacon_like_ies(buf: &mut Vec<u8>, ssid: &[u8], channel: u8) {
    emit_ie(buf, IE_SSID, ssid);
    emit_ie(buf, IE_RATES, &SUPPORTED_RATES);
    emit_ie(buf, IE_DSPARAMS, &[channel]);
}

fn beacon_like_body() -> BeaconBody {
    BeaconBody {
        timestamp: 0,
        interval: BEACON_INTERVAL,
        capabilities: CAPABILITIES_ESS,
    }
}

/// Build a beacon frame: dst is always broadcast. Not retransmission-tracked.
pub fn build_beacon(bssid: &Mac, ssid: &[u8], channel: u8, seq: u16) -> Vec<u8> {
    let mut buf = Vec::new();
    emit_radiotap(&mut buf);
    emit_dot11(
        &mut buf,
        FrameType::Management,
        SUBTYPE_BEACON,
        &crate::util::BROADCAST,
        bssid,
        bssid,
        seq,
    );
    beacon_like_body().emit(&mut buf);
    emit_beacon_like_ies(&mut buf, ssid, channel);
    buf
}

/// Build a probe response addressed to `dst`. Body and IE set are identical
/// to a beacon; only the destination address and subtype differ.
pub fn build_probe_resp(bssid: &Mac, dst: &Mac, ssid: &[u8], channel: u8, seq: u16) -> Vec<u8> {
    let mut buf = Vec::new();
    emit_radiotap(&mut buf);
    emit_dot11(
        &mut buf,
        FrameType::Management,
        SUBTYPE_PROBE_RESP,
        dst,
        bssid,
        bssid,
        seq,
    );
    beacon_like_body().emit(&mut buf);
    emit_beacon_like_ies(&mut buf, ssid, channel);
    buf
}

/// Build an open-system auth response: algorithm 0, sequence 2 (answering
/// the station's sequence 1), status 0. No IEs.
pub fn build_auth_resp(bssid: &Mac, dst: &Mac, seq: u16) -> Vec<u8> {
    let mut buf = Vec::new();
    emit_radiotap(&mut buf);
    emit_dot11(
        &mut buf,
        FrameType::Management,
        SUBTYPE_AUTH,
        dst,
        bssid,
        bssid,
        seq,
    );
    AuthBody {
        algorithm: 0,
        seq: 2,
        status: 0,
    }
    .emit(&mut buf);
    buf
}

/// Build an assoc response: capabilities 1, status 0, association ID 1.
/// Carries the Supported-Rates IE only; no SSID IE.
pub fn build_assoc_resp(bssid: &Mac, dst: &Mac, seq: u16) -> Vec<u8> {
    let mut buf = Vec::new();
    emit_radiotap(&mut buf);
    emit_dot11(
        &mut buf,
        FrameType::Management,
        SUBTYPE_ASSOC_RESP,
        dst,
        bssid,
        bssid,
        seq,
    );
    AssocRespBody {
        capabilities: CAPABILITIES_ESS,
        status: 0,
        association_id: 1,
    }
    .emit(&mut buf);
    emit_ie(&mut buf, IE_RATES, &SUPPORTED_RATES);
    buf
}
