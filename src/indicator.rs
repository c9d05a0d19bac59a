//! Status LED driven by blink patterns.
//!
//! The link blocks for long stretches, so the LED is refreshed from the
//! maintenance hook: pass an [`Indicator`] (or a closure that ticks one)
//! into [`Session::await_packet`](crate::Session::await_packet).

use core::convert::Infallible;

use embedded_hal::digital::v2::OutputPin;

use crate::interface::Maintenance;

/// Every pattern bit lasts this long.
pub const STEP_MS: u32 = 100;

/// Up to 32 on/off steps of `STEP_MS` each, least significant bit first,
/// repeated forever.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Pattern {
    bits: u32,
    steps: u8,
}

impl Pattern {
    /// Long on, short off.
    pub const HEARTBEAT: Pattern = Pattern::new(0b000001111111111, 15);
    pub const SOLID: Pattern = Pattern::new(0b1, 1);
    pub const ERROR: Pattern = Pattern::new(0b01, 2);
    pub const SOS: Pattern = Pattern::new(0b00000101010001110111011100010101, 32);
    pub const DEBUG: Pattern = Pattern::new(0b0000000001, 10);

    /// `steps` is clamped to 1..=32.
    pub const fn new(bits: u32, steps: u8) -> Self {
        let steps = if steps == 0 {
            1
        } else if steps > 32 {
            32
        } else {
            steps
        };
        Pattern { bits, steps }
    }

    pub fn is_on(&self, step: u32) -> bool {
        (self.bits >> (step % self.steps as u32)) & 1 == 1
    }
}

/// What the LED is telling the user.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Indication {
    Normal,
    Error,
    ShutdownWarning,
    Debug,
}

impl Indication {
    /// Most urgent first: debug mode, then errors, then a pending shutdown.
    pub fn choose(debug: bool, error: bool, shutdown_warning: bool) -> Self {
        if debug {
            Indication::Debug
        } else if error {
            Indication::Error
        } else if shutdown_warning {
            Indication::ShutdownWarning
        } else {
            Indication::Normal
        }
    }
}

pub struct Indicator<P, C> {
    led: P,
    clock: C,
    normal: Pattern,
    pattern: Pattern,
    last_step: Option<u32>,
}

impl<P, C> Indicator<P, C>
where
    P: OutputPin<Error = Infallible>,
    C: Fn() -> u32,
{
    /// `clock` returns milliseconds since boot; wrapping is fine.
    pub fn new(led: P, clock: C) -> Self {
        Indicator {
            led,
            clock,
            normal: Pattern::HEARTBEAT,
            pattern: Pattern::HEARTBEAT,
            last_step: None,
        }
    }

    /// Pattern shown for [`Indication::Normal`].
    pub fn with_normal_pattern(mut self, pattern: Pattern) -> Self {
        if self.pattern == self.normal {
            self.pattern = pattern;
        }
        self.normal = pattern;
        self
    }

    pub fn show(&mut self, indication: Indication) {
        self.pattern = match indication {
            Indication::Normal => self.normal,
            Indication::Error => Pattern::ERROR,
            Indication::ShutdownWarning => Pattern::SOS,
            Indication::Debug => Pattern::DEBUG,
        };
        self.last_step = None;
    }

    pub fn pattern(&self) -> Pattern {
        self.pattern
    }

    /// Sets the LED for the current step. Cheap when the step hasn't changed.
    pub fn update(&mut self) {
        let step = (self.clock)() / STEP_MS;
        if self.last_step == Some(step) {
            return;
        }
        self.last_step = Some(step);

        let result = if self.pattern.is_on(step) {
            self.led.set_high()
        } else {
            self.led.set_low()
        };
        if let Err(e) = result {
            match e {}
        }
    }

    pub fn release(self) -> (P, C) {
        (self.led, self.clock)
    }
}

impl<P, C> Maintenance for Indicator<P, C>
where
    P: OutputPin<Error = Infallible>,
    C: Fn() -> u32,
{
    fn tick(&mut self) {
        self.update()
    }
}
