use super::line::{SignalLine, Symbol};
use super::{LinkError, Maintenance, ReadPhase, WritePhase};
use crate::config::LinkConfig;

/// Moves single bytes across the link. The codec and session only talk to
/// the wire through this.
pub trait ByteLink {
    /// Release both lines back to idle.
    fn reset_lines(&mut self);

    fn send_byte(&mut self, value: u8) -> Result<(), LinkError>;

    /// Receive one byte, calling `hook` on every poll while waiting for a
    /// bit to start.
    fn recv_byte<H: Maintenance + ?Sized>(&mut self, hook: &mut H) -> Result<u8, LinkError>;
}

/// Bit-banged transceiver for the two-wire link port.
///
/// There is no clock line. Every bit is a four step handshake: the sender
/// pulls one line low (ring for a 1, tip for a 0), the receiver answers by
/// pulling the other line low, the sender lets go, and the receiver lets go.
/// Bytes travel least significant bit first. Every wait is bounded so an
/// unplugged or frozen peer can't hang the device.
pub struct Transceiver<L1, L2> {
    ring: L1,
    tip: L2,
    config: LinkConfig,
}

impl<L1, L2> Transceiver<L1, L2>
where
    L1: SignalLine,
    L2: SignalLine,
{
    /// `ring` is L1, `tip` is L2. Both lines are released.
    pub fn new(ring: L1, tip: L2, config: LinkConfig) -> Self {
        let mut transceiver = Transceiver { ring, tip, config };
        transceiver.reset_lines();
        transceiver
    }

    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    pub fn release(self) -> (L1, L2) {
        (self.ring, self.tip)
    }

    fn sample(&self) -> Symbol {
        Symbol::sample(&self.ring, &self.tip)
    }

    /// Polls until `done` holds, at most `limit` times after the first look.
    fn wait_for<F>(&self, limit: u32, mut done: F) -> bool
    where
        F: FnMut(Symbol) -> bool,
    {
        let mut polls = 0;
        loop {
            if done(self.sample()) {
                return true;
            }
            if polls >= limit {
                return false;
            }
            polls += 1;
        }
    }

    fn send_bit(&mut self, bit: u8, one: bool) -> Result<(), LinkError> {
        let limit = self.config.write_timeout;
        let timeout = |phase| LinkError::WriteTimeout { bit, phase };

        if !self.wait_for(limit, |s| s == Symbol::Idle) {
            return Err(timeout(WritePhase::Settle));
        }

        if one {
            self.ring.drive_low();
        } else {
            self.tip.drive_low();
        }
        let acknowledged = |s: Symbol| if one { s.tip_low() } else { s.ring_low() };
        if !self.wait_for(limit, acknowledged) {
            return Err(timeout(WritePhase::Acknowledge));
        }

        self.reset_lines();
        if !self.wait_for(limit, |s| !acknowledged(s)) {
            return Err(timeout(WritePhase::Release));
        }
        Ok(())
    }

    fn wait_for_symbol<H>(&self, bit: u8, hook: &mut H) -> Result<bool, LinkError>
    where
        H: Maintenance + ?Sized,
    {
        let mut polls = 0;
        loop {
            if let Some(one) = self.sample().bit() {
                return Ok(one);
            }
            hook.tick();
            if polls >= self.config.enter_timeout {
                return Err(LinkError::ReadTimeout { bit, phase: ReadPhase::Enter });
            }
            polls += 1;
        }
    }

    fn recv_bit<H>(&mut self, bit: u8, hook: &mut H) -> Result<bool, LinkError>
    where
        H: Maintenance + ?Sized,
    {
        let one = self.wait_for_symbol(bit, hook)?;

        if one {
            self.tip.drive_low();
        } else {
            self.ring.drive_low();
        }
        let released = self.wait_for(self.config.release_timeout, |s| {
            if one {
                !s.ring_low()
            } else {
                !s.tip_low()
            }
        });
        self.reset_lines();

        if released {
            Ok(one)
        } else {
            Err(LinkError::ReadTimeout { bit, phase: ReadPhase::Release })
        }
    }
}

impl<L1, L2> ByteLink for Transceiver<L1, L2>
where
    L1: SignalLine,
    L2: SignalLine,
{
    fn reset_lines(&mut self) {
        self.ring.release();
        self.tip.release();
    }

    fn send_byte(&mut self, value: u8) -> Result<(), LinkError> {
        let mut byte = value;
        for bit in 0..8 {
            if let Err(e) = self.send_bit(bit, byte & 1 == 1) {
                self.reset_lines();
                return Err(e);
            }
            byte >>= 1;
        }
        Ok(())
    }

    fn recv_byte<H: Maintenance + ?Sized>(&mut self, hook: &mut H) -> Result<u8, LinkError> {
        let mut byte = 0u8;
        for bit in 0..8 {
            // Shift in at the top; after eight bits the first one is bit 0.
            let one = self.recv_bit(bit, hook)?;
            byte = (byte >> 1) | if one { 0x80 } else { 0 };
        }
        Ok(byte)
    }
}
