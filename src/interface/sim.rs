//! Test doubles: a simulated link cable with a scripted peer on the far end,
//! and a byte-level link for exercising the codec and session without bits.

use core::convert::Infallible;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::digital::v2::{InputPin, OutputPin};

use super::{ByteLink, LinkError, Maintenance, ReadPhase};

pub fn init_logger() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

/// Upper bound on line reads before a test is declared hung.
const RUNAWAY_READS: u64 = 50_000_000;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Wire {
    Ring,
    Tip,
}

#[derive(Debug)]
pub enum Job {
    /// Transmit these bytes, LSB first.
    Send(VecDeque<u8>),
    /// Receive this many bytes into `received`.
    Receive(usize),
    /// Pull a line low and never let go.
    HoldLow(Wire),
    /// Acknowledge the next bit and never release the acknowledgement.
    Stall { acked: bool },
    /// Pull both lines low for this many reads, then let go.
    Collide(u32),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Phase {
    Start,
    Acknowledge,
    Release,
}

#[derive(Default, Debug)]
struct Drivers {
    device: bool,
    peer: bool,
}

#[derive(Debug)]
struct Bus {
    ring: Drivers,
    tip: Drivers,
    jobs: VecDeque<Job>,
    phase: Phase,
    bit: u8,
    one: bool,
    shift: u8,
    received: Vec<u8>,
    reads: u64,
}

impl Bus {
    fn drivers(&mut self, wire: Wire) -> &mut Drivers {
        match wire {
            Wire::Ring => &mut self.ring,
            Wire::Tip => &mut self.tip,
        }
    }

    fn idle(&self, wire: Wire) -> bool {
        let d = match wire {
            Wire::Ring => &self.ring,
            Wire::Tip => &self.tip,
        };
        !(d.device || d.peer)
    }

    fn step(&mut self) {
        self.reads += 1;
        assert!(self.reads < RUNAWAY_READS, "simulated link ran away");

        let mut job = match self.jobs.pop_front() {
            Some(job) => job,
            None => return,
        };
        let done = match &mut job {
            Job::Send(bytes) => self.send_step(bytes),
            Job::Receive(remaining) => self.receive_step(remaining),
            Job::HoldLow(wire) => {
                self.drivers(*wire).peer = true;
                false
            }
            Job::Stall { acked } => {
                if !*acked {
                    match (self.idle(Wire::Ring), self.idle(Wire::Tip)) {
                        (false, true) => {
                            self.tip.peer = true;
                            *acked = true;
                        }
                        (true, false) => {
                            self.ring.peer = true;
                            *acked = true;
                        }
                        _ => {}
                    }
                }
                false
            }
            Job::Collide(reads) => {
                self.ring.peer = true;
                self.tip.peer = true;
                *reads = reads.saturating_sub(1);
                if *reads == 0 {
                    self.ring.peer = false;
                    self.tip.peer = false;
                }
                *reads == 0
            }
        };
        if !done {
            self.jobs.push_front(job);
        }
    }

    fn send_step(&mut self, bytes: &mut VecDeque<u8>) -> bool {
        let value = match bytes.front() {
            Some(value) => *value,
            None => return true,
        };
        let one = (value >> self.bit) & 1 == 1;
        let (own, other) = if one { (Wire::Ring, Wire::Tip) } else { (Wire::Tip, Wire::Ring) };
        match self.phase {
            Phase::Start => {
                if self.idle(Wire::Ring) && self.idle(Wire::Tip) {
                    self.drivers(own).peer = true;
                    self.phase = Phase::Acknowledge;
                }
            }
            Phase::Acknowledge => {
                if !self.idle(other) {
                    self.drivers(own).peer = false;
                    self.phase = Phase::Release;
                }
            }
            Phase::Release => {
                if self.idle(other) {
                    self.phase = Phase::Start;
                    self.bit += 1;
                    if self.bit == 8 {
                        self.bit = 0;
                        bytes.pop_front();
                    }
                }
            }
        }
        bytes.is_empty()
    }

    fn receive_step(&mut self, remaining: &mut usize) -> bool {
        if *remaining == 0 {
            return true;
        }
        match self.phase {
            Phase::Start => match (self.idle(Wire::Ring), self.idle(Wire::Tip)) {
                (false, true) => {
                    self.one = true;
                    self.drivers(Wire::Tip).peer = true;
                    self.phase = Phase::Release;
                }
                (true, false) => {
                    self.one = false;
                    self.drivers(Wire::Ring).peer = true;
                    self.phase = Phase::Release;
                }
                _ => {}
            },
            Phase::Release => {
                let (sender, own) = if self.one { (Wire::Ring, Wire::Tip) } else { (Wire::Tip, Wire::Ring) };
                if self.idle(sender) {
                    self.drivers(own).peer = false;
                    self.shift = (self.shift >> 1) | if self.one { 0x80 } else { 0 };
                    self.phase = Phase::Start;
                    self.bit += 1;
                    if self.bit == 8 {
                        self.bit = 0;
                        self.received.push(self.shift);
                        *remaining -= 1;
                    }
                }
            }
            Phase::Acknowledge => self.phase = Phase::Start,
        }
        *remaining == 0
    }
}

/// A link cable with a scripted calculator plugged into the far end. The
/// peer advances one transition every time the device reads a line or lets
/// go of one, so runs are fully deterministic.
#[derive(Clone)]
pub struct Sim(Rc<RefCell<Bus>>);

impl Sim {
    pub fn new() -> Self {
        Sim(Rc::new(RefCell::new(Bus {
            ring: Drivers::default(),
            tip: Drivers::default(),
            jobs: VecDeque::new(),
            phase: Phase::Start,
            bit: 0,
            one: false,
            shift: 0,
            received: Vec::new(),
            reads: 0,
        })))
    }

    pub fn pins(&self) -> (SimPin, SimPin) {
        (
            SimPin { bus: self.0.clone(), wire: Wire::Ring },
            SimPin { bus: self.0.clone(), wire: Wire::Tip },
        )
    }

    pub fn peer_sends(&self, bytes: &[u8]) -> &Self {
        self.0.borrow_mut().jobs.push_back(Job::Send(bytes.iter().copied().collect()));
        self
    }

    pub fn peer_receives(&self, count: usize) -> &Self {
        self.0.borrow_mut().jobs.push_back(Job::Receive(count));
        self
    }

    pub fn peer_holds_low(&self, wire: Wire) -> &Self {
        self.0.borrow_mut().jobs.push_back(Job::HoldLow(wire));
        self
    }

    pub fn peer_stalls_after_ack(&self) -> &Self {
        self.0.borrow_mut().jobs.push_back(Job::Stall { acked: false });
        self
    }

    pub fn peer_collides(&self, reads: u32) -> &Self {
        self.0.borrow_mut().jobs.push_back(Job::Collide(reads));
        self
    }

    /// Everything the peer has received so far.
    pub fn received(&self) -> Vec<u8> {
        self.0.borrow().received.clone()
    }

    pub fn pending_jobs(&self) -> usize {
        self.0.borrow().jobs.len()
    }

    /// Whether the device is still pulling either line low.
    pub fn device_driving(&self) -> bool {
        let bus = self.0.borrow();
        bus.ring.device || bus.tip.device
    }
}

pub struct SimPin {
    bus: Rc<RefCell<Bus>>,
    wire: Wire,
}

impl InputPin for SimPin {
    type Error = Infallible;

    fn is_high(&self) -> Result<bool, Infallible> {
        let mut bus = self.bus.borrow_mut();
        bus.step();
        Ok(bus.idle(self.wire))
    }

    fn is_low(&self) -> Result<bool, Infallible> {
        self.is_high().map(|high| !high)
    }
}

impl OutputPin for SimPin {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Infallible> {
        self.bus.borrow_mut().drivers(self.wire).device = true;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        let mut bus = self.bus.borrow_mut();
        let drivers = bus.drivers(self.wire);
        let was_driving = drivers.device;
        drivers.device = false;
        // The peer sees the edge, e.g. the device's final acknowledge
        // going away after the last bit of a byte.
        if was_driving {
            bus.step();
        }
        Ok(())
    }
}

/// Byte-level stand-in for the transceiver. Reads come from a script, writes
/// are recorded. Running out of script is a test bug and panics.
#[derive(Default)]
pub struct ScriptedLink {
    pub incoming: VecDeque<Result<u8, LinkError>>,
    pub sent: Vec<u8>,
    /// Fail the write of the byte at this index of `sent`.
    pub fail_send_at: Option<usize>,
    pub resets: usize,
}

impl ScriptedLink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, bytes: &[u8]) -> &mut Self {
        self.incoming.extend(bytes.iter().map(|b| Ok(*b)));
        self
    }

    pub fn feed_timeout(&mut self) -> &mut Self {
        self.incoming.push_back(Err(LinkError::ReadTimeout { bit: 0, phase: ReadPhase::Enter }));
        self
    }
}

impl ByteLink for ScriptedLink {
    fn reset_lines(&mut self) {
        self.resets += 1;
    }

    fn send_byte(&mut self, value: u8) -> Result<(), LinkError> {
        if self.fail_send_at == Some(self.sent.len()) {
            return Err(LinkError::WriteTimeout { bit: 0, phase: super::WritePhase::Settle });
        }
        self.sent.push(value);
        Ok(())
    }

    fn recv_byte<H: Maintenance + ?Sized>(&mut self, _hook: &mut H) -> Result<u8, LinkError> {
        match self.incoming.pop_front() {
            Some(result) => result,
            None => panic!("scripted link ran out of input"),
        }
    }
}
