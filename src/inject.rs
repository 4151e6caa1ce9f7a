//! The injection-transport collaborator: a link-layer raw send bound to
//! the monitor interface, abstracted behind a trait so the core pipeline
//! can be driven by a recording test double instead of a radio.

use thiserror::Error;

#[derive(Debug, Error)]
#[error("failed to inject frame: {0}")]
pub struct SendError(pub String);

pub trait InjectTransport {
    /// Send one complete frame, starting with its radiotap header. Errors
    /// are always transient from the caller's point of view: log and
    /// continue, there is no state to roll back.
    fn send(&mut self, frame: &[u8]) -> Result<(), SendError>;
}
