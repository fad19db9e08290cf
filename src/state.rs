//! System states, the two-slot state history, and their indicator mapping.

use crate::colors;
use crate::feedback::BlinkPattern;
use palette::Srgb;

/// Operating state of the logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SystemState {
    /// Booting; storage not mounted yet.
    Initializing,
    /// Storage mounted, waiting for a button.
    Ready,
    /// Recording samples to the log file.
    Capturing,
    /// Streaming the log file to the diagnostic sink.
    ReadingBack,
    /// Transient fault display.
    Error,
    /// Storage could not be mounted at boot. Terminal.
    StorageUnavailable,
    /// Storage unmounted, restarting into the bootloader. Terminal.
    ShuttingDown,
}

/// What the indicator light shows for a state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Indicator {
    /// Constant color.
    Solid(Srgb),
    /// Color toggled by the blink timer.
    Blinking(BlinkPattern),
    /// All channels off.
    Dark,
}

impl SystemState {
    /// Name shown on the state line of the display.
    pub fn display_name(&self) -> &'static str {
        match self {
            SystemState::Initializing => "INITIALIZING",
            SystemState::Ready => "READY",
            SystemState::Capturing => "RECORDING",
            SystemState::ReadingBack => "READING",
            SystemState::Error => "ERROR",
            SystemState::StorageUnavailable => "SD_NOT_FOUND",
            SystemState::ShuttingDown => "EXITING",
        }
    }

    /// Indicator light treatment for this state.
    pub fn indicator(&self) -> Indicator {
        match self {
            SystemState::Initializing => Indicator::Solid(colors::AMBER),
            SystemState::Ready => Indicator::Solid(colors::GREEN),
            SystemState::Capturing => Indicator::Solid(colors::RED),
            SystemState::ReadingBack | SystemState::StorageUnavailable => {
                Indicator::Blinking(BlinkPattern::Blue)
            }
            SystemState::Error => Indicator::Blinking(BlinkPattern::Purple),
            SystemState::ShuttingDown => Indicator::Dark,
        }
    }

    /// Returns true for states that only a restart leaves.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SystemState::StorageUnavailable | SystemState::ShuttingDown
        )
    }

    /// Returns true for the states entered through an excursion.
    pub fn is_transient(&self) -> bool {
        matches!(self, SystemState::Error | SystemState::ReadingBack)
    }
}

/// Current and previous state.
///
/// Normal transitions go through [`advance`](Self::advance). Error and
/// ReadingBack are visited as excursions: [`begin_excursion`](Self::begin_excursion)
/// saves the current state in the previous slot and
/// [`end_excursion`](Self::end_excursion) restores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StateHistory {
    current: SystemState,
    previous: SystemState,
}

impl StateHistory {
    /// Both slots start at `Initializing`.
    pub const fn new() -> Self {
        Self {
            current: SystemState::Initializing,
            previous: SystemState::Initializing,
        }
    }

    /// The state the system is in.
    pub fn current(&self) -> SystemState {
        self.current
    }

    /// The state before the last transition.
    pub fn previous(&self) -> SystemState {
        self.previous
    }

    /// Records a normal transition.
    pub fn advance(&mut self, next: SystemState) {
        self.previous = self.current;
        self.current = next;
    }

    /// Enters a transient state, saving the current one for restoration.
    pub fn begin_excursion(&mut self, transient: SystemState) {
        debug_assert!(transient.is_transient());
        self.advance(transient);
    }

    /// Leaves the transient state back to the saved one and returns it.
    pub fn end_excursion(&mut self) -> SystemState {
        let saved = self.previous;
        self.end_excursion_into(saved);
        saved
    }

    /// Leaves the transient state into `state` instead of the saved one.
    ///
    /// Used when the failed action invalidated the saved state, e.g. a write
    /// failure while Capturing must land in Ready.
    pub fn end_excursion_into(&mut self, state: SystemState) {
        debug_assert!(self.current.is_transient());
        self.previous = self.current;
        self.current = state;
    }
}

impl Default for StateHistory {
    fn default() -> Self {
        Self::new()
    }
}
