use core::ops::Add;

use super::types::CHECKSUM_LEN;
use crate::interface::LinkError;

/// Truncated 16-bit sum of `bytes`.
///
/// This is the checksum carried by every data packet. The peer validates it
/// byte for byte, so it must wrap exactly like a `uint16_t` accumulator.
///
/// ```
/// assert_eq!(ti_link::checksum(&[0x07, 0x09]), 0x0010);
/// assert_eq!(ti_link::checksum(&[]), 0);
/// ```
pub fn checksum(bytes: &[u8]) -> u16 {
    bytes.checksum().0
}

pub trait Checksummable {
    fn checksum(&self) -> Checksum;
}

impl Checksummable for [u8] {
    fn checksum(&self) -> Checksum {
        self.iter().fold(Checksum(0), |acc, b| acc + Checksum::from(*b))
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Checksum(pub u16);

impl Add for Checksum {
    type Output = Checksum;

    fn add(self, other: Checksum) -> Checksum {
        Checksum(self.0.wrapping_add(other.0))
    }
}

impl From<u8> for Checksum {
    fn from(byte: u8) -> Checksum {
        Checksum(byte as u16)
    }
}

impl Checksum {
    /// Compares a checksum read off the wire against this calculated one.
    pub fn verify(self, received: Checksum) -> Result<(), LinkError> {
        if received == self {
            Ok(())
        } else {
            Err(LinkError::ChecksumMismatch {
                received: received.0,
                calculated: self.0,
            })
        }
    }

    pub fn from_le_bytes(bytes: [u8; CHECKSUM_LEN]) -> Self {
        Checksum(u16::from_le_bytes(bytes))
    }

    pub fn to_le_bytes(self) -> [u8; CHECKSUM_LEN] {
        self.0.to_le_bytes()
    }
}
