//! Button request flags and the interrupt-side debounce gate.
//!
//! The edge interrupt owns a [`DebounceGate`] and may only raise flags through
//! a [`RequestSetter`]. The main loop consumes them with
//! [`ButtonRequests::take`]. Each flag has one writer and one reader, so plain
//! atomic loads and stores are enough and no read-modify-write is needed.

use crate::time::TimeInstant;
use core::sync::atomic::{AtomicBool, Ordering};

/// The three front-panel buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    /// Start or stop a recording (button A on the reference board).
    RecordToggle,
    /// Dump the log file to the diagnostic sink (joystick press).
    ReadBack,
    /// Unmount storage and restart into the bootloader (button B).
    Exit,
}

impl Button {
    /// Every button, in the order the main loop services them.
    pub const ALL: [Button; 3] = [Button::RecordToggle, Button::ReadBack, Button::Exit];

    fn index(self) -> usize {
        match self {
            Button::RecordToggle => 0,
            Button::ReadBack => 1,
            Button::Exit => 2,
        }
    }
}

/// Sticky request flags shared between interrupt and main-loop context.
///
/// Meant to live in a `static`.
pub struct ButtonRequests {
    flags: [AtomicBool; 3],
}

impl ButtonRequests {
    /// Creates a set with no pending requests.
    pub const fn new() -> Self {
        Self {
            flags: [
                AtomicBool::new(false),
                AtomicBool::new(false),
                AtomicBool::new(false),
            ],
        }
    }

    /// Handle for the interrupt context; it can raise flags but not clear them.
    pub fn setter(&self) -> RequestSetter<'_> {
        RequestSetter { requests: self }
    }

    /// Returns true if a request is pending, without consuming it.
    pub fn is_pending(&self, button: Button) -> bool {
        self.flags[button.index()].load(Ordering::Acquire)
    }

    /// Consumes a pending request.
    ///
    /// Returns true if the flag was set. The flag is clear afterwards.
    pub fn take(&self, button: Button) -> bool {
        let flag = &self.flags[button.index()];
        if flag.load(Ordering::Acquire) {
            flag.store(false, Ordering::Release);
            true
        } else {
            false
        }
    }
}

impl Default for ButtonRequests {
    fn default() -> Self {
        Self::new()
    }
}

/// Restricted, copyable handle that can only raise request flags.
#[derive(Clone, Copy)]
pub struct RequestSetter<'a> {
    requests: &'a ButtonRequests,
}

impl RequestSetter<'_> {
    /// Marks a press of `button` as pending.
    pub fn raise(&self, button: Button) {
        self.requests.flags[button.index()].store(true, Ordering::Release);
    }
}

/// Filters falling edges into logical presses.
///
/// Each button keeps the instant of its last accepted edge. An edge is accepted
/// only if at least `window_ms` passed since then; rejected edges leave the
/// timestamp alone. The first edge on a button is always accepted.
pub struct DebounceGate<'a, I: TimeInstant> {
    requests: RequestSetter<'a>,
    last_accepted: [Option<I>; 3],
    window_ms: u32,
}

impl<'a, I: TimeInstant> DebounceGate<'a, I> {
    /// Creates a gate raising flags through `requests`.
    pub fn new(requests: RequestSetter<'a>, window_ms: u32) -> Self {
        Self {
            requests,
            last_accepted: [None; 3],
            window_ms,
        }
    }

    /// Handles a falling edge on `button` seen at `now`.
    ///
    /// Call from the GPIO interrupt. Returns true if the edge was accepted
    /// and the request flag raised.
    pub fn on_falling_edge(&mut self, button: Button, now: I) -> bool {
        let slot = &mut self.last_accepted[button.index()];
        let accepted = match *slot {
            Some(last) => now.has_elapsed(last, self.window_ms),
            None => true,
        };

        if accepted {
            *slot = Some(now);
            self.requests.raise(button);
        }
        accepted
    }
}
