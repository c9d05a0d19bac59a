#![cfg_attr(not(test), no_std)]

//! ti_link
//!
//! Device side of the TI-82/83/84 calculator link port protocol, for small
//! microcontrollers sitting on the other end of a link cable.
//!
//! The link port is two open-drain lines, ring (L1) and tip (L2), pulled up
//! to idle. There is no clock and no UART here: bits are moved by a four step
//! handshake that the [`Transceiver`] bit-bangs over any pair of pins that
//! implement embedded-hal's `InputPin` and `OutputPin` (with an infallible
//! error type). Packets and the READY/ACK handshake are handled by a
//! [`Session`].
//!
//! It is intended for use on embedded hardware, and as such is `no_std`.
//!
//! ## General Usage
//!
//! Wait for the calculator and act on each data packet:
//!
//! ```no_run
//! use ti_link::{LinkConfig, Session, SignalLine};
//!
//! fn serve<L1: SignalLine, L2: SignalLine>(ring: L1, tip: L2) -> ! {
//!     let mut session = Session::from_lines(ring, tip, LinkConfig::default());
//!     let mut idle_polls = 0u32;
//!
//!     loop {
//!         // Blocks until a valid data packet arrives. The closure runs on
//!         // every poll while the lines are quiet.
//!         let first = session.await_packet(&mut || idle_polls += 1);
//!         match first {
//!             0x01 => {
//!                 session.payload_mut().clear();
//!                 let _ = session.payload_mut().extend_from_slice(&[0x42]);
//!                 let _ = session.send_payload(&mut || {});
//!             }
//!             _ => {}
//!         }
//!     }
//! }
//! ```
//!
//! Packets on the wire:
//!
//! ```
//! use ti_link::{checksum, Command, Header, MachineId};
//!
//! //         ---- PC84 origin
//! //         |     ---- DATA
//! //         |     |     ---------- length, little endian
//! //         |     |     |
//! let bytes = [0x23, 0x15, 0x02, 0x00];
//! let header = Header::from_bytes(&bytes);
//!
//! assert_eq!(header.origin, MachineId::Pc84);
//! assert_eq!(header.command, Command::Data);
//! assert_eq!(header.length, 2);
//!
//! // The payload follows, then the 16 bit sum of its bytes, little endian.
//! assert_eq!(checksum(&[0x07, 0x09]).to_le_bytes(), [0x10, 0x00]);
//! ```

pub mod config;
pub mod indicator;
pub mod interface;
pub mod protocol;

#[doc(inline)]
pub use config::LinkConfig;
#[doc(inline)]
pub use interface::*;
#[doc(inline)]
pub use protocol::*;
