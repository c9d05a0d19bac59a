use heapless::Vec;
use log::{debug, info, warn};

use super::codec;
use super::line::SignalLine;
use super::{ByteLink, LinkError, Maintenance, Transceiver};
use crate::config::LinkConfig;
use crate::protocol::{
    Checksum, Checksummable, Command, Header, CHECKSUM_LEN, HEADER_LEN, MAX_PAYLOAD_LEN,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum State {
    /// No READY seen yet. Data packets are drained and skipped.
    AwaitingHandshake,
    Ready,
}

/// One end of the link: the handshake state and the packet buffers, reused
/// for every packet.
///
/// The header buffer holds whichever header last crossed the link, in either
/// direction. The payload buffer holds the last payload received (or
/// drained), unless the caller has since written into it with
/// [`payload_mut`](Session::payload_mut).
pub struct Session<T> {
    link: T,
    config: LinkConfig,
    state: State,
    header: [u8; HEADER_LEN],
    payload: Vec<u8, MAX_PAYLOAD_LEN>,
    checksum: [u8; CHECKSUM_LEN],
}

impl<L1, L2> Session<Transceiver<L1, L2>>
where
    L1: SignalLine,
    L2: SignalLine,
{
    pub fn from_lines(ring: L1, tip: L2, config: LinkConfig) -> Self {
        Self::new(Transceiver::new(ring, tip, config), config)
    }
}

impl<T> Session<T>
where
    T: ByteLink,
{
    pub fn new(link: T, config: LinkConfig) -> Self {
        Session {
            link,
            config,
            state: State::AwaitingHandshake,
            header: [0; HEADER_LEN],
            payload: Vec::new(),
            checksum: [0; CHECKSUM_LEN],
        }
    }

    /// Blocks until a data packet with a valid checksum arrives, answering
    /// everything else on the way, and returns its first payload byte. The
    /// whole payload is left in [`payload`](Session::payload).
    ///
    /// - READY completes the handshake and is acknowledged.
    /// - DATA after the handshake is acknowledged if its checksum matches and
    ///   answered with ERROR otherwise. An empty DATA packet is ignored.
    /// - A stray ACK is ignored.
    /// - Anything else, including DATA before the handshake, is drained so
    ///   both ends stay in step, and answered with SKIP.
    pub fn await_packet<H>(&mut self, hook: &mut H) -> u8
    where
        H: Maintenance + ?Sized,
    {
        loop {
            self.link.reset_lines();
            codec::recv_exact(&mut self.link, &mut self.header, hook);
            let header = Header::from_bytes(&self.header);
            debug!("received header: {:02x?}", self.header);

            let length = header.length as usize;
            match (self.state, header.command) {
                (_, Command::Ready) => {
                    if self.state == State::AwaitingHandshake {
                        info!("handshake from {:?}", header.origin);
                    }
                    self.state = State::Ready;
                    self.reply(Command::Ack);
                }
                (State::Ready, Command::Data) if length == 0 => {
                    debug!("ignoring empty data packet");
                }
                (State::Ready, Command::Data) if length <= MAX_PAYLOAD_LEN => {
                    match self.receive_payload(length, hook) {
                        Ok(()) => {
                            self.reply(Command::Ack);
                            return self.payload[0];
                        }
                        Err(e) => {
                            warn!("{}", e);
                            self.reply(Command::Error);
                        }
                    }
                }
                (_, Command::Ack) => {
                    debug!("ignoring stray ack");
                    self.drain(length, hook);
                }
                (state, command) => {
                    debug!("skipping {:?} packet of {} bytes in {:?}", command, length, state);
                    self.drain(length, hook);
                    self.reply(Command::Skip);
                }
            }
        }
    }

    /// Sends `data` as a data packet and returns the command the peer
    /// replied with, normally ACK.
    pub fn send_data<H>(&mut self, data: &[u8], hook: &mut H) -> Result<Command, LinkError>
    where
        H: Maintenance + ?Sized,
    {
        codec::send_packet(
            &mut self.link,
            self.config.machine_id,
            data,
            &mut self.header,
            &mut self.checksum,
            hook,
        )
        .map(|reply| reply.command)
    }

    /// Sends the contents of the payload buffer as a data packet.
    pub fn send_payload<H>(&mut self, hook: &mut H) -> Result<Command, LinkError>
    where
        H: Maintenance + ?Sized,
    {
        codec::send_packet(
            &mut self.link,
            self.config.machine_id,
            &self.payload,
            &mut self.header,
            &mut self.checksum,
            hook,
        )
        .map(|reply| reply.command)
    }

    pub fn send_command(&mut self, command: Command) -> Result<(), LinkError> {
        codec::send_command(&mut self.link, self.config.machine_id, command, &mut self.header)
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_handshaken(&self) -> bool {
        self.state == State::Ready
    }

    pub fn header(&self) -> &[u8; HEADER_LEN] {
        &self.header
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn payload_mut(&mut self) -> &mut Vec<u8, MAX_PAYLOAD_LEN> {
        &mut self.payload
    }

    pub fn checksum_bytes(&self) -> &[u8; CHECKSUM_LEN] {
        &self.checksum
    }

    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    pub fn link_mut(&mut self) -> &mut T {
        &mut self.link
    }

    fn reply(&mut self, command: Command) {
        if let Err(e) = self.send_command(command) {
            warn!("error sending {:?}: {}", command, e);
        }
    }

    fn fill_payload<H>(&mut self, len: usize, hook: &mut H)
    where
        H: Maintenance + ?Sized,
    {
        debug_assert!(len <= MAX_PAYLOAD_LEN);
        self.payload.clear();
        self.payload.resize(len, 0).ok();
        codec::recv_exact(&mut self.link, &mut self.payload, hook);
    }

    fn receive_payload<H>(&mut self, len: usize, hook: &mut H) -> Result<(), LinkError>
    where
        H: Maintenance + ?Sized,
    {
        self.fill_payload(len, hook);
        debug!("received data: {:02x?}", &self.payload[..]);
        codec::recv_exact(&mut self.link, &mut self.checksum, hook);

        self.payload.checksum().verify(Checksum::from_le_bytes(self.checksum))
    }

    /// Reads and discards a payload of `len` bytes and its checksum.
    fn drain<H>(&mut self, len: usize, hook: &mut H)
    where
        H: Maintenance + ?Sized,
    {
        if len == 0 {
            return;
        }
        let mut remaining = len;
        while remaining > 0 {
            let chunk = remaining.min(MAX_PAYLOAD_LEN);
            self.fill_payload(chunk, hook);
            remaining -= chunk;
        }
        codec::recv_exact(&mut self.link, &mut self.checksum, hook);
    }
}
