//! Status display and indicator light.
//!
//! The presenter only consumes state; nothing flows back into the state
//! machine. It redraws on request and skips snapshots it already shows.

use crate::colors;
use crate::feedback::{BlinkGenerator, FeedbackTimer};
use crate::state::{Indicator, SystemState};
use core::fmt::Write;
use heapless::String;
use palette::Srgb;

/// Monochrome bitmap display primitives (SSD1306 128x64 on the reference board).
///
/// Drawing calls go to a frame buffer; nothing is visible before `flush`.
pub trait Display {
    /// Clears the frame buffer.
    fn clear(&mut self);

    /// Draws an unfilled rectangle.
    fn rect(&mut self, x: u8, y: u8, width: u8, height: u8);

    /// Draws a line between two points.
    fn line(&mut self, x0: u8, y0: u8, x1: u8, y1: u8);

    /// Draws `text` with its top-left corner at (x, y).
    fn text(&mut self, text: &str, x: u8, y: u8);

    /// Sends the frame buffer to the panel.
    fn flush(&mut self);
}

/// RGB status light.
///
/// Components are 0.0 or 1.0 for the palette in [`colors`]; GPIO boards can
/// use [`colors::channel_on`] to decide pin levels.
pub trait IndicatorLight {
    /// Sets the light to `color`.
    fn set_color(&mut self, color: Srgb);
}

/// Health of the storage medium as shown on the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageHealth {
    /// Mount not attempted yet.
    Loading,
    /// Mounted.
    Ok,
    /// Mount failed.
    Failed,
    /// Unmounted on exit.
    Ejected,
}

impl StorageHealth {
    /// Text of the storage line.
    pub fn label(&self) -> &'static str {
        match self {
            StorageHealth::Loading => "SD: LOADING",
            StorageHealth::Ok => "SD: OK",
            StorageHealth::Failed => "SD: ERROR!",
            StorageHealth::Ejected => "SD: EJECTED",
        }
    }
}

/// Everything the presenter shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusSnapshot {
    /// Current system state.
    pub state: SystemState,
    /// Storage medium status.
    pub storage: StorageHealth,
    /// Samples in the current or last recording.
    pub samples: u32,
}

/// Consumer of status snapshots, implemented by [`StatusPresenter`].
pub trait StatusView {
    /// Shows `snapshot`. Showing the same snapshot twice changes nothing.
    fn render(&mut self, snapshot: StatusSnapshot);

    /// Switches the sample acknowledgement flash on or off.
    fn indicate_sample(&mut self, on: bool);
}

const TITLE: &str = "Datalogger MPU";
const SAMPLES_LABEL: &str = "SAMPLES";
const ERROR_GLYPH: &str = "ERROR!";

/// Renders snapshots to a [`Display`] and an [`IndicatorLight`], driving the
/// blink timer for blinking states.
pub struct StatusPresenter<'a, D: Display, L: IndicatorLight, T: FeedbackTimer> {
    display: D,
    light: L,
    blink: &'a BlinkGenerator,
    blink_timer: T,
    blink_period_ms: u32,
    shown: Option<StatusSnapshot>,
}

impl<'a, D: Display, L: IndicatorLight, T: FeedbackTimer> StatusPresenter<'a, D, L, T> {
    /// Creates a presenter. Nothing is drawn until the first `render`.
    pub fn new(
        display: D,
        light: L,
        blink: &'a BlinkGenerator,
        blink_timer: T,
        blink_period_ms: u32,
    ) -> Self {
        Self {
            display,
            light,
            blink,
            blink_timer,
            blink_period_ms,
            shown: None,
        }
    }

    /// Snapshot currently on screen.
    pub fn shown(&self) -> Option<StatusSnapshot> {
        self.shown
    }

    /// The display driver.
    pub fn display(&self) -> &D {
        &self.display
    }

    /// The indicator light driver.
    pub fn light(&self) -> &L {
        &self.light
    }

    /// The blink timer.
    pub fn blink_timer(&self) -> &T {
        &self.blink_timer
    }

    fn apply_indicator(&mut self, state: SystemState) {
        self.blink_timer.cancel();
        self.blink.cancel();
        self.light.set_color(colors::OFF);

        match state.indicator() {
            Indicator::Solid(color) => self.light.set_color(color),
            Indicator::Blinking(pattern) => {
                self.blink.arm(pattern);
                self.blink_timer.arm(self.blink_period_ms);
            }
            Indicator::Dark => {}
        }
    }

    fn draw(&mut self, snapshot: &StatusSnapshot) {
        self.display.clear();

        if snapshot.state == SystemState::Error {
            self.display.text(ERROR_GLYPH, 48, 24);
            self.display.flush();
            return;
        }

        let mut count: String<12> = String::new();
        // u32 fits in 10 digits
        let _ = write!(count, "{}", snapshot.samples);

        self.display.rect(3, 3, 122, 60);
        self.display.line(3, 16, 123, 16);
        self.display.line(3, 37, 123, 37);
        self.display.text(TITLE, 8, 6);
        self.display.text(snapshot.storage.label(), 8, 18);
        self.display.text(snapshot.state.display_name(), 12, 28);
        self.display.text(SAMPLES_LABEL, 30, 41);
        self.display.text(&count, 42, 52);
        self.display.flush();
    }
}

impl<D: Display, L: IndicatorLight, T: FeedbackTimer> StatusView
    for StatusPresenter<'_, D, L, T>
{
    fn render(&mut self, snapshot: StatusSnapshot) {
        if self.shown == Some(snapshot) {
            return;
        }

        let state_changed = self.shown.map(|s| s.state) != Some(snapshot.state);
        if state_changed {
            self.apply_indicator(snapshot.state);
        }

        self.draw(&snapshot);
        self.shown = Some(snapshot);
    }

    fn indicate_sample(&mut self, on: bool) {
        if on {
            self.light.set_color(colors::BLUE);
        } else if let Some(shown) = self.shown {
            if let Indicator::Solid(color) = shown.state.indicator() {
                self.light.set_color(color);
            }
        }
    }
}
