//! Everything that touches the link port: the bit transceiver, the packet
//! codec on top of it and the session state machine on top of that.

use core::fmt;

pub mod codec;
mod line;
mod session;
mod transceiver;

#[cfg(test)]
pub(crate) mod sim;

pub use line::{SignalLine, Symbol};
pub use session::{Session, State};
pub use transceiver::{ByteLink, Transceiver};

/// Wait that timed out while sending a bit.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum WritePhase {
    /// Both lines never went idle, so the peer was not ready for the bit.
    Settle,
    /// The peer never pulled the other line low.
    Acknowledge,
    /// The peer never released its acknowledging line.
    Release,
}

/// Wait that timed out while receiving a bit.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ReadPhase {
    /// No symbol showed up on the lines.
    Enter,
    /// The sender never released its line after we acknowledged.
    Release,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LinkError {
    WriteTimeout { bit: u8, phase: WritePhase },
    ReadTimeout { bit: u8, phase: ReadPhase },
    ChecksumMismatch { received: u16, calculated: u16 },
    /// A data packet cannot carry more than `MAX_PAYLOAD_LEN` bytes.
    PayloadTooLong { len: usize },
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LinkError::WriteTimeout { bit, phase } => {
                write!(f, "write timeout on bit {} ({:?})", bit, phase)
            }
            LinkError::ReadTimeout { bit, phase } => {
                write!(f, "read timeout on bit {} ({:?})", bit, phase)
            }
            LinkError::ChecksumMismatch { received, calculated } => write!(
                f,
                "checksum mismatch: received {:#06x}, calculated {:#06x}",
                received, calculated
            ),
            LinkError::PayloadTooLong { len } => {
                write!(f, "payload of {} bytes does not fit in a packet", len)
            }
        }
    }
}

/// Housekeeping that has to keep running while the link blocks, e.g. the
/// status LED and the auto shutdown timer. Called on every poll of a receive
/// wait, so it must return quickly.
pub trait Maintenance {
    fn tick(&mut self);
}

impl<F> Maintenance for F
where
    F: FnMut(),
{
    fn tick(&mut self) {
        self()
    }
}

/// A hook with nothing to do.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoMaintenance;

impl Maintenance for NoMaintenance {
    fn tick(&mut self) {}
}
