#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`DataLogger`**: The state machine; call `start` once, then `poll` from the main loop
//! - **`SystemState`** / **`StateHistory`**: Current and previous state, with Error and
//!   ReadingBack visited as save/restore excursions
//! - **`ButtonRequests`** / **`DebounceGate`**: Sticky request flags raised from the edge interrupt
//! - **`BlinkGenerator`** / **`BeepGenerator`**: Phase generators fired by hardware repeating timers
//! - **`StorageSession`**: Mount state, recording file lifecycle and read-back
//! - **`StatusPresenter`**: Display layout and indicator light for each state
//! - **`Storage`**, **`ImuSource`**, **`Display`**, **`IndicatorLight`**, **`FeedbackTimer`**,
//!   **`Platform`**, **`TimeSource`**: Traits to implement for your board
//!
//! Indicator colors are `Srgb<f32>` with channels at 0.0 or 1.0.

#[macro_use]
mod fmt;

pub mod colors;
pub mod config;
pub mod datalogger;
pub mod debounce;
pub mod error;
pub mod feedback;
pub mod presenter;
pub mod record;
pub mod sensor;
pub mod state;
pub mod storage;
pub mod time;

// Re-export Srgb from palette for implementors of IndicatorLight
pub use palette::Srgb;

pub use config::{LoggerConfig, SAMPLE_INTERVAL_MS};
pub use datalogger::{Board, DataLogger, Platform, PollOutcome};
pub use debounce::{Button, ButtonRequests, DebounceGate, RequestSetter};
pub use error::LoggerError;
pub use feedback::{
    BeepFeedback, BeepGenerator, BlinkGenerator, BlinkPattern, FeedbackTimer, PhaseGenerator,
    Tick, Tone,
};
pub use presenter::{
    Display, IndicatorLight, StatusPresenter, StatusSnapshot, StatusView, StorageHealth,
};
pub use record::{HEADER, LogRecord};
pub use sensor::{ImuReading, ImuSource, RawImu, SensorReader};
pub use state::{Indicator, StateHistory, SystemState};
pub use storage::{OpenMode, ReadBack, Storage, StorageSession};
pub use time::{TimeDuration, TimeInstant, TimeSource};
