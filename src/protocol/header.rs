use super::types::{Command, MachineId, HEADER_LEN};

/// The 4 bytes that open every packet:
///
/// ```text
/// [origin][command][length lo][length hi]
/// ```
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Header {
    pub origin: MachineId,
    pub command: Command,
    /// Payload length. Zero for command packets.
    pub length: u16,
}

impl Header {
    pub fn new(origin: MachineId, command: Command, length: u16) -> Self {
        Self { origin, command, length }
    }

    /// A header with no payload behind it.
    pub fn command(origin: MachineId, command: Command) -> Self {
        Self::new(origin, command, 0)
    }

    pub fn from_bytes(bytes: &[u8; HEADER_LEN]) -> Self {
        Self {
            origin: bytes[0].into(),
            command: bytes[1].into(),
            length: u16::from_le_bytes([bytes[2], bytes[3]]),
        }
    }

    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let [lo, hi] = self.length.to_le_bytes();
        [self.origin.into(), self.command.into(), lo, hi]
    }
}
