//! Timing constants and board-level configuration.

/// Period between two samples while recording, in milliseconds.
///
/// The rate is fixed; it is also the unit of the `time_ms` column.
pub const SAMPLE_INTERVAL_MS: u32 = 250;

/// Minimum spacing between two accepted presses of the same button.
pub const DEBOUNCE_WINDOW_MS: u32 = 200;

/// Half-period of the indicator blink.
pub const BLINK_PERIOD_MS: u32 = 200;

/// Half-period of a buzzer beep.
pub const BEEP_PERIOD_MS: u32 = 100;

/// How long the Error (or StorageUnavailable) screen stays up.
pub const ERROR_DISPLAY_MS: u32 = 1000;

/// Sleep at the end of each poll cycle, bounding the loop to ~50 Hz.
pub const POLL_PERIOD_MS: u32 = 20;

/// How long the Initializing screen is held before mounting storage.
pub const STARTUP_HOLD_MS: u32 = 5000;

/// Duration of the blue flash that acknowledges each stored sample.
pub const SAMPLE_FLASH_MS: u32 = 20;

/// Name of the log file on the storage medium.
pub const LOG_FILENAME: &str = "mpu_data.csv";

/// Beeps played when a recording starts.
pub const START_BEEPS: u8 = 1;

/// Beeps played when a recording stops.
pub const STOP_BEEPS: u8 = 2;

/// Board-specific timing knobs.
///
/// Everything except the sample interval can be tuned per board; the defaults
/// are the reference timings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoggerConfig {
    /// See [`DEBOUNCE_WINDOW_MS`].
    pub debounce_window_ms: u32,
    /// See [`BLINK_PERIOD_MS`].
    pub blink_period_ms: u32,
    /// See [`BEEP_PERIOD_MS`].
    pub beep_period_ms: u32,
    /// See [`ERROR_DISPLAY_MS`].
    pub error_display_ms: u32,
    /// See [`POLL_PERIOD_MS`].
    pub poll_period_ms: u32,
    /// See [`STARTUP_HOLD_MS`].
    pub startup_hold_ms: u32,
    /// See [`SAMPLE_FLASH_MS`].
    pub sample_flash_ms: u32,
    /// See [`LOG_FILENAME`].
    pub filename: &'static str,
}

impl LoggerConfig {
    /// Reference configuration.
    pub const fn new() -> Self {
        Self {
            debounce_window_ms: DEBOUNCE_WINDOW_MS,
            blink_period_ms: BLINK_PERIOD_MS,
            beep_period_ms: BEEP_PERIOD_MS,
            error_display_ms: ERROR_DISPLAY_MS,
            poll_period_ms: POLL_PERIOD_MS,
            startup_hold_ms: STARTUP_HOLD_MS,
            sample_flash_ms: SAMPLE_FLASH_MS,
            filename: LOG_FILENAME,
        }
    }

    /// Skips the boot splash hold, useful on boards without a display.
    pub const fn without_startup_hold(mut self) -> Self {
        self.startup_hold_ms = 0;
        self
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self::new()
    }
}
