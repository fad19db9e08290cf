//! Blink and beep phase generators driven by hardware repeating timers.
//!
//! A generator is armed from the main loop and fired from the timer
//! interrupt. Firing returns a [`Tick`]: the level to apply and whether the
//! timer should fire again. The state lives in atomics written with plain
//! loads and stores; the main loop only arms a generator after canceling its
//! timer, so each field has one writer at a time.

use crate::colors;
use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use palette::Srgb;

/// Hardware repeating timer bound to a generator's fire callback.
pub trait FeedbackTimer {
    /// Starts the timer.
    ///
    /// Implementations fire the callback once right away, then every
    /// `period_ms` for as long as it reports `reschedule`.
    fn arm(&mut self, period_ms: u32);

    /// Stops the timer. Canceling an idle timer does nothing.
    fn cancel(&mut self);
}

/// Output of one timer callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick<O> {
    /// Level to apply to the output.
    pub output: O,
    /// Whether the timer should fire again.
    pub reschedule: bool,
}

/// Anything a [`FeedbackTimer`] callback can fire.
pub trait PhaseGenerator {
    /// Level type produced by the generator.
    type Output;

    /// Advances one phase. Called from the timer interrupt.
    fn fire(&self) -> Tick<Self::Output>;
}

/// Which indicator channels a blink toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlinkPattern {
    /// Blue channel alone.
    Blue,
    /// Red and blue channels together.
    Purple,
}

impl BlinkPattern {
    /// Color of the lit phase.
    pub fn color(&self) -> Srgb {
        match self {
            BlinkPattern::Blue => colors::BLUE,
            BlinkPattern::Purple => colors::PURPLE,
        }
    }

    fn to_bits(self) -> u8 {
        match self {
            BlinkPattern::Blue => 0,
            BlinkPattern::Purple => 1,
        }
    }

    fn from_bits(bits: u8) -> Self {
        match bits {
            1 => BlinkPattern::Purple,
            _ => BlinkPattern::Blue,
        }
    }
}

/// Indicator blink that runs until canceled.
pub struct BlinkGenerator {
    active: AtomicBool,
    lit: AtomicBool,
    pattern: AtomicU8,
}

impl BlinkGenerator {
    /// Creates an idle generator.
    pub const fn new() -> Self {
        Self {
            active: AtomicBool::new(false),
            lit: AtomicBool::new(false),
            pattern: AtomicU8::new(0),
        }
    }

    /// Prepares a blink starting in the lit phase.
    pub fn arm(&self, pattern: BlinkPattern) {
        self.pattern.store(pattern.to_bits(), Ordering::Relaxed);
        self.lit.store(true, Ordering::Relaxed);
        self.active.store(true, Ordering::Release);
    }

    /// Stops the blink; a late fire turns the light off and stops the timer.
    pub fn cancel(&self) {
        self.active.store(false, Ordering::Release);
    }

    /// Returns true between `arm` and `cancel`.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Pattern of the last arm.
    pub fn pattern(&self) -> BlinkPattern {
        BlinkPattern::from_bits(self.pattern.load(Ordering::Relaxed))
    }
}

impl Default for BlinkGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseGenerator for BlinkGenerator {
    type Output = Srgb;

    fn fire(&self) -> Tick<Srgb> {
        if !self.is_active() {
            return Tick {
                output: colors::OFF,
                reschedule: false,
            };
        }

        let lit = self.lit.load(Ordering::Relaxed);
        self.lit.store(!lit, Ordering::Relaxed);

        let output = if lit { self.pattern().color() } else { colors::OFF };
        Tick {
            output,
            reschedule: true,
        }
    }
}

/// Buzzer level requested by a beep tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tone {
    /// PWM running at half duty.
    Sounding,
    /// PWM level zero.
    Silent,
}

/// Counted beep sequence that cancels itself.
///
/// Every beep is one sounding phase followed by one silent phase; the count
/// drops on the silent phase and the timer stops when it reaches zero.
pub struct BeepGenerator {
    remaining: AtomicU8,
    sounding: AtomicBool,
}

impl BeepGenerator {
    /// Creates an idle generator.
    pub const fn new() -> Self {
        Self {
            remaining: AtomicU8::new(0),
            sounding: AtomicBool::new(false),
        }
    }

    /// Prepares `count` beeps starting with a sounding phase.
    pub fn arm(&self, count: u8) {
        self.sounding.store(true, Ordering::Relaxed);
        self.remaining.store(count, Ordering::Release);
    }

    /// Drops whatever beeps are left.
    pub fn cancel(&self) {
        self.remaining.store(0, Ordering::Release);
    }

    /// Beeps not yet completed.
    pub fn remaining(&self) -> u8 {
        self.remaining.load(Ordering::Acquire)
    }

    /// Returns true while beeps are left.
    pub fn is_active(&self) -> bool {
        self.remaining() > 0
    }
}

impl Default for BeepGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseGenerator for BeepGenerator {
    type Output = Tone;

    fn fire(&self) -> Tick<Tone> {
        let remaining = self.remaining();
        if remaining == 0 {
            return Tick {
                output: Tone::Silent,
                reschedule: false,
            };
        }

        let sounding = self.sounding.load(Ordering::Relaxed);
        self.sounding.store(!sounding, Ordering::Relaxed);

        if sounding {
            return Tick {
                output: Tone::Sounding,
                reschedule: true,
            };
        }

        let left = remaining - 1;
        self.remaining.store(left, Ordering::Release);
        Tick {
            output: Tone::Silent,
            reschedule: left > 0,
        }
    }
}

/// Beep generator paired with the timer that fires it.
///
/// Owned by the state machine; the generator itself is shared with the timer
/// interrupt.
pub struct BeepFeedback<'a, T: FeedbackTimer> {
    generator: &'a BeepGenerator,
    timer: T,
    period_ms: u32,
}

impl<'a, T: FeedbackTimer> BeepFeedback<'a, T> {
    /// Binds a generator to its timer.
    pub fn new(generator: &'a BeepGenerator, timer: T, period_ms: u32) -> Self {
        Self {
            generator,
            timer,
            period_ms,
        }
    }

    /// Plays `count` beeps, replacing any sequence still running.
    pub fn play(&mut self, count: u8) {
        self.timer.cancel();
        self.generator.cancel();
        if count == 0 {
            return;
        }
        self.generator.arm(count);
        self.timer.arm(self.period_ms);
    }

    /// Stops any sequence still running.
    pub fn silence(&mut self) {
        self.timer.cancel();
        self.generator.cancel();
    }

    /// Access to the timer, mainly for board glue and tests.
    pub fn timer(&self) -> &T {
        &self.timer
    }
}
