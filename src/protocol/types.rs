/// Length of every packet header on the wire.
pub const HEADER_LEN: usize = 4;

/// Length of the trailing checksum of a data packet.
pub const CHECKSUM_LEN: usize = 2;

/// Largest payload a data packet may carry.
pub const MAX_PAYLOAD_LEN: usize = 511;

/// Command byte, the second byte of every header.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Command {
    /// Clear to send.
    Cts,
    Data,
    /// Skip/exit, also used to reject a packet that was drained unread.
    Skip,
    Ack,
    /// Checksum error, asks the sender to retransmit.
    Error,
    /// Ready check, the handshake.
    Ready,
    /// End of transmission.
    Eot,
    Unknown(u8),
}

impl From<u8> for Command {
    fn from(byte: u8) -> Self {
        match byte {
            0x09 => Command::Cts,
            0x15 => Command::Data,
            0x36 => Command::Skip,
            0x56 => Command::Ack,
            0x5a => Command::Error,
            0x68 => Command::Ready,
            0x92 => Command::Eot,
            other => Command::Unknown(other),
        }
    }
}

impl From<Command> for u8 {
    fn from(command: Command) -> u8 {
        match command {
            Command::Cts => 0x09,
            Command::Data => 0x15,
            Command::Skip => 0x36,
            Command::Ack => 0x56,
            Command::Error => 0x5a,
            Command::Ready => 0x68,
            Command::Eot => 0x92,
            Command::Unknown(byte) => byte,
        }
    }
}

/// Machine id, the first byte of every header. Identifies the class of the
/// device that sent the packet.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MachineId {
    Pc82,
    Pc83,
    /// Computer talking to a TI-83+/84+. This is what the bridge claims to be.
    Pc84,
    Ti84,
    Ti82,
    Ti83,
    Unknown(u8),
}

impl Default for MachineId {
    fn default() -> Self {
        MachineId::Pc84
    }
}

impl From<u8> for MachineId {
    fn from(byte: u8) -> Self {
        match byte {
            0x02 => MachineId::Pc82,
            0x03 => MachineId::Pc83,
            0x23 => MachineId::Pc84,
            0x73 => MachineId::Ti84,
            0x82 => MachineId::Ti82,
            0x83 => MachineId::Ti83,
            other => MachineId::Unknown(other),
        }
    }
}

impl From<MachineId> for u8 {
    fn from(id: MachineId) -> u8 {
        match id {
            MachineId::Pc82 => 0x02,
            MachineId::Pc83 => 0x03,
            MachineId::Pc84 => 0x23,
            MachineId::Ti84 => 0x73,
            MachineId::Ti82 => 0x82,
            MachineId::Ti83 => 0x83,
            MachineId::Unknown(byte) => byte,
        }
    }
}
