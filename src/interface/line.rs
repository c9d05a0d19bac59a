use core::convert::Infallible;

use embedded_hal::digital::v2::{InputPin, OutputPin};

/// One wire of the link port. Pulled up to idle (high) when nobody drives
/// it, low as soon as either end does.
pub trait SignalLine {
    fn is_idle(&self) -> bool;
    fn drive_low(&mut self);
    /// Stop driving and let the pull-up take the line back to idle.
    fn release(&mut self);
}

/// Any open-drain pin: `set_high` releases the line, `set_low` drives it.
impl<P> SignalLine for P
where
    P: InputPin<Error = Infallible> + OutputPin<Error = Infallible>,
{
    fn is_idle(&self) -> bool {
        match self.is_high() {
            Ok(high) => high,
            Err(e) => match e {},
        }
    }

    fn drive_low(&mut self) {
        if let Err(e) = self.set_low() {
            match e {}
        }
    }

    fn release(&mut self) {
        if let Err(e) = self.set_high() {
            match e {}
        }
    }
}

/// What the two lines currently say. L1 is the ring contact, L2 the tip.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Symbol {
    Idle,
    /// L1 low.
    One,
    /// L2 low.
    Zero,
    /// Both low. Neither end produces this on purpose; it is read as a 0
    /// the same way calculators read it.
    Collision,
}

impl Symbol {
    pub fn sample<L1: SignalLine, L2: SignalLine>(ring: &L1, tip: &L2) -> Self {
        match (ring.is_idle(), tip.is_idle()) {
            (true, true) => Symbol::Idle,
            (false, true) => Symbol::One,
            (true, false) => Symbol::Zero,
            (false, false) => Symbol::Collision,
        }
    }

    pub fn ring_low(self) -> bool {
        matches!(self, Symbol::One | Symbol::Collision)
    }

    pub fn tip_low(self) -> bool {
        matches!(self, Symbol::Zero | Symbol::Collision)
    }

    /// The bit this symbol carries. Only idle lines carry nothing.
    pub fn bit(self) -> Option<bool> {
        match self {
            Symbol::One => Some(true),
            Symbol::Zero | Symbol::Collision => Some(false),
            Symbol::Idle => None,
        }
    }
}
