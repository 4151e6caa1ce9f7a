//! The dispatcher: turns one captured frame into zero or more emitted
//! response frames and state transitions, per the fixed five-step
//! algorithm described in this module's tests.

use crate::frame::{
    build_assoc_resp, build_auth_resp, build_probe_resp, SUBTYPE_ASSOC_REQ, SUBTYPE_AUTH,
    SUBTYPE_PROBE_REQ,
};
use crate::inject::{InjectTransport, SendError};
use crate::session::SessionState;
use crate::util::{mac_string, ssid_string, Mac, SequenceCounter, BROADCAST};
use crate::wire::{
    find_ssid_ie, parse_dot11, parse_ie, AssocReqBody, AuthBody, FrameType, WireError, IE_SSID,
};
use log::{debug, info, warn};
use std::time::Instant;

use crate::retransmit::RetransmitCache;

/// Owns everything a single tracked station's handshake needs: identity,
/// session state, the sequence counter, and the retransmission cache.
/// Only one station is tracked at a time, matching this system's
/// single-client scope.
pub struct Dispatcher {
    pub bssid: Mac,
    pub ssid: Vec<u8>,
    pub channel: u8,
    pub state: SessionState,
    seq: SequenceCounter,
    cache: RetransmitCache,
}

impl Dispatcher {
    pub fn new(bssid: Mac, ssid: Vec<u8>, channel: u8) -> Self {
        Dispatcher {
            bssid,
            ssid,
            channel,
            state: SessionState::default(),
            seq: SequenceCounter::default(),
            cache: RetransmitCache::default(),
        }
    }

    fn send_tracked(&mut self, transport: &mut dyn InjectTransport, frame: Vec<u8>) -> Result<(), SendError> {
        transport.send(&frame)?;
        self.cache.store(&frame);
        Ok(())
    }

    /// Draw the next sequence number from the single process-wide counter.
    /// Beacons go through this too (see `Engine::run_beacon`) so that every
    /// frame this system ever emits, beacon or response, shares one
    /// monotone sequence stream.
    pub fn next_seq(&mut self) -> u16 {
        self.seq.next()
    }

    /// Step 1/2/3/4/5 of the dispatch algorithm. `now` is threaded in
    /// rather than read from the clock so the retransmit rate limit is
    /// testable without sleeping.
    pub fn handle_frame(
        &mut self,
        data: &[u8],
        now: Instant,
        transport: &mut dyn InjectTransport,
    ) -> Result<(), SendError> {
        let (hdr, body) = match parse_dot11(data) {
            Ok(parsed) => parsed,
            Err(WireError::Short) => {
                debug!("dropping frame: too short for a dot11 header");
                return Ok(());
            }
            Err(WireError::Malformed) => {
                warn!("dropping malformed frame");
                return Ok(());
            }
        };

        // 1. loopback
        if hdr.src == self.bssid {
            return Ok(());
        }

        // 2. retry-bit replay, handled before anything else and returning
        // unconditionally afterward.
        if hdr.retry() {
            if let Some(resend) = self.cache.try_resend(now) {
                let resend = resend.to_vec();
                transport.send(&resend)?;
                debug!("resent cached response to retry-bit frame");
            } else {
                debug!("dropping retry-bit frame: cache empty or rate-limited");
            }
            return Ok(());
        }

        // 3. probe-req handled regardless of destination.
        if hdr.frame_type == FrameType::Management && hdr.subtype == SUBTYPE_PROBE_REQ {
            self.handle_probe_req(&hdr.dst, &hdr.src, body, now, transport)?;
            return Ok(());
        }

        // 4. everything else must be addressed to us.
        if hdr.dst != self.bssid {
            return Ok(());
        }

        // 5. dispatch by (type, subtype).
        match (hdr.frame_type, hdr.subtype) {
            (FrameType::Management, SUBTYPE_AUTH) => {
                match AuthBody::parse(body) {
                    Ok(auth) if auth.seq != 1 => {
                        warn!(
                            "authentication sequence is not 0x0001 from {}",
                            mac_string(&hdr.src)
                        );
                    }
                    Err(_) => warn!("authentication frame too short to parse body"),
                    _ => {}
                }
                let seq = self.next_seq();
                let resp = build_auth_resp(&self.bssid, &hdr.src, seq);
                self.send_tracked(transport, resp)?;
                self.state = SessionState::SentAuth;
                info!("sent auth-resp to {}", mac_string(&hdr.src));
            }
            (FrameType::Management, SUBTYPE_ASSOC_REQ) => {
                match AssocReqBody::parse(body) {
                    Ok(_) => {
                        let mut rest = &body[AssocReqBody::LEN..];
                        while let Ok((ie, next)) = parse_ie(rest) {
                            if ie.id == IE_SSID {
                                debug!(
                                    "assoc-req from {} advertises ssid \"{}\"",
                                    mac_string(&hdr.src),
                                    ssid_string(ie.data)
                                );
                                break;
                            }
                            rest = next;
                        }
                    }
                    Err(_) => warn!(
                        "association request without parameters from {}",
                        mac_string(&hdr.src)
                    ),
                }
                let seq = self.next_seq();
                let resp = build_assoc_resp(&self.bssid, &hdr.src, seq);
                self.send_tracked(transport, resp)?;
                self.state = SessionState::SentAssocResp;
                info!("sent assoc-resp to {}", mac_string(&hdr.src));
            }
            (FrameType::Data, _) => {
                if !self.state.is_established() {
                    self.cache.clear();
                    self.state = SessionState::Established;
                    info!("station {} established", mac_string(&hdr.src));
                }
            }
            _ => {
                debug!(
                    "ignoring frame type={:?} subtype={} from {}",
                    hdr.frame_type,
                    hdr.subtype,
                    mac_string(&hdr.src)
                );
            }
        }

        Ok(())
    }

    fn handle_probe_req(
        &mut self,
        dst: &Mac,
        src: &Mac,
        body: &[u8],
        _now: Instant,
        transport: &mut dyn InjectTransport,
    ) -> Result<(), SendError> {
        // No SSID IE anywhere in the IE area: drop for every destination
        // class, unicast or broadcast. Only a *present* SSID IE (even with
        // zero-length data) goes on to the wildcard/match logic below.
        let requested_ssid = match find_ssid_ie(body) {
            Some(ie) => ie.data,
            None => {
                warn!("probe request from {} has no SSID element", mac_string(src));
                return Ok(());
            }
        };

        if *dst == self.bssid {
            // unicast: exact match required, empty SSID is not a wildcard
            // under the default policy.
            if requested_ssid != self.ssid.as_slice() {
                return Ok(());
            }
            let seq = self.next_seq();
            let resp = build_probe_resp(&self.bssid, src, &self.ssid, self.channel, seq);
            self.send_tracked(transport, resp)?;
            self.state = SessionState::SentProbeResp;
            info!("sent probe-resp to {}", mac_string(src));
        } else if *dst == BROADCAST {
            // broadcast: empty SSID is a wildcard, state is unchanged.
            if !requested_ssid.is_empty() && requested_ssid != self.ssid.as_slice() {
                return Ok(());
            }
            let seq = self.next_seq();
            let resp = build_probe_resp(&self.bssid, src, &self.ssid, self.channel, seq);
            self.send_tracked(transport, resp)?;
            info!("sent broadcast-probe-resp to {}", mac_string(src));
        }
        // other destination classes: ignored.
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inject::test_double::RecordingTransport;
    use crate::wire::{emit_dot11, emit_ie, emit_radiotap, IE_SSID};

    const BSSID: Mac = [0x02, 0xaa, 0xbb, 0xcc, 0xdd, 0xee];
    const STA: Mac = [0x11, 0x22, 0x33, 0x44, 0x55, 0x66];

    fn probe_req(dst: Mac, ssid: &[u8]) -> Vec<u8> {
        let mut buf = Vec::new();
        emit_radiotap(&mut buf);
        emit_dot11(&mut buf, FrameType::Management, SUBTYPE_PROBE_REQ, &dst, &STA, &BROADCAST, 1);
        emit_ie(&mut buf, IE_SSID, ssid);
        buf
    }

    fn probe_req_no_ssid_ie(dst: Mac) -> Vec<u8> {
        let mut buf = Vec::new();
        emit_radiotap(&mut buf);
        emit_dot11(&mut buf, FrameType::Management, SUBTYPE_PROBE_REQ, &dst, &STA, &BROADCAST, 1);
        buf
    }

    fn data_frame(dst: Mac, src: Mac) -> Vec<u8> {
        let mut buf = Vec::new();
        emit_radiotap(&mut buf);
        emit_dot11(&mut buf, FrameType::Data, 0, &dst, &src, &BROADCAST, 1);
        buf
    }

    #[test]
    fn broadcast_probe_for_our_ssid_replies_without_changing_state() {
        let mut disp = Dispatcher::new(BSSID, b"TestNet".to_vec(), 6);
        let mut transport = RecordingTransport::default();
        let frame = probe_req(BROADCAST, b"TestNet");
        disp.handle_frame(&frame, Instant::now(), &mut transport).unwrap();
        assert_eq!(transport.sent.len(), 1);
        assert_eq!(disp.state, SessionState::AwaitingProbeReq);
    }

    #[test]
    fn broadcast_probe_for_other_ssid_is_ignored() {
        let mut disp = Dispatcher::new(BSSID, b"TestNet".to_vec(), 6);
        let mut transport = RecordingTransport::default();
        let frame = probe_req(BROADCAST, b"OtherNet");
        disp.handle_frame(&frame, Instant::now(), &mut transport).unwrap();
        assert!(transport.sent.is_empty());
    }

    #[test]
    fn probe_with_no_ssid_element_is_dropped_unicast_and_broadcast() {
        let mut disp = Dispatcher::new(BSSID, b"TestNet".to_vec(), 6);
        let mut transport = RecordingTransport::default();

        disp.handle_frame(&probe_req_no_ssid_ie(BSSID), Instant::now(), &mut transport)
            .unwrap();
        assert!(transport.sent.is_empty());

        disp.handle_frame(&probe_req_no_ssid_ie(BROADCAST), Instant::now(), &mut transport)
            .unwrap();
        assert!(transport.sent.is_empty());
    }

    #[test]
    fn broadcast_probe_with_empty_ssid_element_is_a_wildcard() {
        let mut disp = Dispatcher::new(BSSID, b"TestNet".to_vec(), 6);
        let mut transport = RecordingTransport::default();
        let frame = probe_req(BROADCAST, b"");
        disp.handle_frame(&frame, Instant::now(), &mut transport).unwrap();
        assert_eq!(transport.sent.len(), 1);
    }

    #[test]
    fn unicast_auth_then_assoc_then_data_reaches_established() {
        let mut disp = Dispatcher::new(BSSID, b"TestNet".to_vec(), 6);
        let mut transport = RecordingTransport::default();

        let mut auth = Vec::new();
        emit_radiotap(&mut auth);
        emit_dot11(&mut auth, FrameType::Management, SUBTYPE_AUTH, &BSSID, &STA, &BSSID, 2);
        AuthBody {
            algorithm: 0,
            seq: 1,
            status: 0,
        }
        .emit(&mut auth);
        disp.handle_frame(&auth, Instant::now(), &mut transport).unwrap();
        assert_eq!(disp.state, SessionState::SentAuth);

        let mut assoc = Vec::new();
        emit_radiotap(&mut assoc);
        emit_dot11(&mut assoc, FrameType::Management, SUBTYPE_ASSOC_REQ, &BSSID, &STA, &BSSID, 3);
        assoc.extend_from_slice(&1u16.to_le_bytes()); // capabilities
        assoc.extend_from_slice(&0u16.to_le_bytes()); // listen_interval
        emit_ie(&mut assoc, IE_SSID, b"TestNet");
        disp.handle_frame(&assoc, Instant::now(), &mut transport).unwrap();
        assert_eq!(disp.state, SessionState::SentAssocResp);

        let data = data_frame(BSSID, STA);
        disp.handle_frame(&data, Instant::now(), &mut transport).unwrap();
        assert_eq!(disp.state, SessionState::Established);
        assert_eq!(transport.sent.len(), 2);
    }

    #[test]
    fn auth_and_assoc_req_protocol_surprises_do_not_stop_the_response() {
        // auth with seq != 1 and assoc-req with no body at all are both
        // logged as warnings but still answered, matching best-effort
        // handling of protocol surprises.
        let mut disp = Dispatcher::new(BSSID, b"TestNet".to_vec(), 6);
        let mut transport = RecordingTransport::default();

        let mut auth = Vec::new();
        emit_radiotap(&mut auth);
        emit_dot11(&mut auth, FrameType::Management, SUBTYPE_AUTH, &BSSID, &STA, &BSSID, 2);
        AuthBody {
            algorithm: 0,
            seq: 3,
            status: 0,
        }
        .emit(&mut auth);
        disp.handle_frame(&auth, Instant::now(), &mut transport).unwrap();
        assert_eq!(disp.state, SessionState::SentAuth);
        assert_eq!(transport.sent.len(), 1);

        let mut assoc = Vec::new();
        emit_radiotap(&mut assoc);
        emit_dot11(&mut assoc, FrameType::Management, SUBTYPE_ASSOC_REQ, &BSSID, &STA, &BSSID, 3);
        disp.handle_frame(&assoc, Instant::now(), &mut transport).unwrap();
        assert_eq!(disp.state, SessionState::SentAssocResp);
        assert_eq!(transport.sent.len(), 2);
    }

    #[test]
    fn retry_bit_replays_cached_response_then_rate_limits() {
        let mut disp = Dispatcher::new(BSSID, b"TestNet".to_vec(), 6);
        let mut transport = RecordingTransport::default();
        let t0 = Instant::now();

        let frame = probe_req(BSSID, b"TestNet");
        disp.handle_frame(&frame, t0, &mut transport).unwrap();
        assert_eq!(transport.sent.len(), 1);

        let mut retry = frame.clone();
        // flip retry bit in the dot11 header for a unicast probe, well,
        // any source frame works since only the retry bit is inspected.
        let retry_offset = crate::wire::RADIOTAP_LEN as usize + 1;
        retry[retry_offset] |= crate::wire::CTRL_RETRY;

        disp.handle_frame(&retry, t0 + std::time::Duration::from_millis(60), &mut transport)
            .unwrap();
        assert_eq!(transport.sent.len(), 2);

        disp.handle_frame(&retry, t0 + std::time::Duration::from_millis(70), &mut transport)
            .unwrap();
        assert_eq!(transport.sent.len(), 2);
    }

    #[test]
    fn loopback_frames_are_dropped() {
        let mut disp = Dispatcher::new(BSSID, b"TestNet".to_vec(), 6);
        let mut transport = RecordingTransport::default();
        let mut frame = Vec::new();
        emit_radiotap(&mut frame);
        emit_dot11(&mut frame, FrameType::Management, SUBTYPE_PROBE_REQ, &BROADCAST, &BSSID, &BROADCAST, 1);
        disp.handle_frame(&frame, Instant::now(), &mut transport).unwrap();
        assert!(transport.sent.is_empty());
    }
}
