//! The data logger state machine.
//!
//! [`DataLogger`] owns the state history, the storage session, the sensor and
//! the beep feedback, and is driven by [`DataLogger::poll`] from the main loop.
//! Interrupts never call into it; they only raise [`ButtonRequests`] flags and
//! fire the feedback generators.

use crate::config::{LoggerConfig, SAMPLE_INTERVAL_MS, START_BEEPS, STOP_BEEPS};
use crate::debounce::{Button, ButtonRequests};
use crate::error::LoggerError;
use crate::feedback::{BeepFeedback, FeedbackTimer};
use crate::presenter::{StatusSnapshot, StatusView, StorageHealth};
use crate::record::LogRecord;
use crate::sensor::{ImuSource, SensorReader};
use crate::state::{StateHistory, SystemState};
use crate::storage::{Storage, StorageSession};
use crate::time::{TimeInstant, TimeSource};

/// Chunk size used when streaming the log file to the diagnostic sink.
const READ_CHUNK: usize = 128;

/// Blocking services of the board.
pub trait Platform {
    /// Busy-waits or sleeps for `ms` milliseconds.
    fn delay_ms(&mut self, ms: u32);

    /// Reboots into the USB bootloader (maintenance mode).
    ///
    /// On hardware this does not return.
    fn restart_into_bootloader(&mut self);

    /// Writes raw bytes to the diagnostic console.
    fn write_diagnostic(&mut self, bytes: &[u8]);
}

/// Result of one poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollOutcome {
    /// Keep polling.
    Continue,
    /// A terminal state was reached; the restart has been requested.
    Halt,
}

/// Collaborators handed to [`DataLogger::new`].
pub struct Board<'a, S, M, V, B, P>
where
    S: Storage,
    M: ImuSource,
    V: StatusView,
    B: FeedbackTimer,
{
    /// File-system driver.
    pub storage: S,
    /// Inertial sensor.
    pub imu: M,
    /// Status display and light.
    pub view: V,
    /// Buzzer beeps.
    pub beep: BeepFeedback<'a, B>,
    /// Delay, restart and console.
    pub platform: P,
}

/// Central controller of the logger.
///
/// # Type Parameters
/// * `'a` - Lifetime of the shared clock, request flags and beep generator
/// * `I` - Time instant type
/// * `T` - Time source
/// * `S` - Storage driver
/// * `M` - Sensor source
/// * `V` - Status view
/// * `B` - Beep timer
/// * `P` - Platform services
pub struct DataLogger<'a, I, T, S, M, V, B, P>
where
    I: TimeInstant,
    T: TimeSource<I>,
    S: Storage,
    M: ImuSource,
    V: StatusView,
    B: FeedbackTimer,
    P: Platform,
{
    time_source: &'a T,
    requests: &'a ButtonRequests,
    session: StorageSession<S>,
    sensor: SensorReader<M>,
    view: V,
    beep: BeepFeedback<'a, B>,
    platform: P,
    config: LoggerConfig,
    history: StateHistory,
    samples: u32,
    last_sample: Option<I>,
    restart_requested: bool,
}

impl<'a, I, T, S, M, V, B, P> DataLogger<'a, I, T, S, M, V, B, P>
where
    I: TimeInstant,
    T: TimeSource<I>,
    S: Storage,
    M: ImuSource,
    V: StatusView,
    B: FeedbackTimer,
    P: Platform,
{
    /// Creates a logger in `Initializing`. Call [`start`](Self::start) next.
    pub fn new(
        board: Board<'a, S, M, V, B, P>,
        time_source: &'a T,
        requests: &'a ButtonRequests,
        config: LoggerConfig,
    ) -> Self {
        Self {
            time_source,
            requests,
            session: StorageSession::new(board.storage, config.filename),
            sensor: SensorReader::new(board.imu),
            view: board.view,
            beep: board.beep,
            platform: board.platform,
            config,
            history: StateHistory::new(),
            samples: 0,
            last_sample: None,
            restart_requested: false,
        }
    }

    /// Boots the logger: shows the Initializing screen, then mounts storage.
    ///
    /// On mount failure the StorageUnavailable screen is held for the error
    /// duration and the restart into the bootloader is requested; the error
    /// is returned so the glue can park the core. Call once.
    pub fn start(&mut self) -> Result<(), LoggerError> {
        self.refresh();
        if self.config.startup_hold_ms > 0 {
            self.platform.delay_ms(self.config.startup_hold_ms);
        }

        match self.session.mount() {
            Ok(()) => {
                self.enter(SystemState::Ready);
                Ok(())
            }
            Err(e) => {
                error!("{}: storage medium not found", e);
                self.enter(SystemState::StorageUnavailable);
                self.platform.delay_ms(self.config.error_display_ms);
                self.restart_once();
                Err(e)
            }
        }
    }

    /// Runs one main-loop cycle.
    ///
    /// Consumes button requests in the order record-toggle, read-back, exit,
    /// samples when the interval has elapsed, then sleeps for the poll period.
    pub fn poll(&mut self) -> PollOutcome {
        match self.state() {
            state if state.is_terminal() => {
                self.restart_once();
                return PollOutcome::Halt;
            }
            SystemState::Initializing => {
                self.platform.delay_ms(self.config.poll_period_ms);
                return PollOutcome::Continue;
            }
            _ => {}
        }

        self.handle_record_toggle();
        self.handle_read_back();
        self.handle_exit();

        match self.state() {
            SystemState::Capturing => self.service_sampling(),
            SystemState::ShuttingDown => {
                self.restart_once();
                return PollOutcome::Halt;
            }
            _ => {}
        }

        self.platform.delay_ms(self.config.poll_period_ms);
        PollOutcome::Continue
    }

    /// Current state.
    pub fn state(&self) -> SystemState {
        self.history.current()
    }

    /// State before the last transition.
    pub fn previous_state(&self) -> SystemState {
        self.history.previous()
    }

    /// Samples stored in the current (or last) recording.
    pub fn samples(&self) -> u32 {
        self.samples
    }

    /// What the status view should currently show.
    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            state: self.state(),
            storage: self.storage_health(),
            samples: self.samples,
        }
    }

    /// The storage session.
    pub fn session(&self) -> &StorageSession<S> {
        &self.session
    }

    /// The status view.
    pub fn view(&self) -> &V {
        &self.view
    }

    /// The beep feedback.
    pub fn beep(&self) -> &BeepFeedback<'a, B> {
        &self.beep
    }

    /// The platform services.
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// The active configuration.
    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    fn storage_health(&self) -> StorageHealth {
        match self.state() {
            SystemState::Initializing => StorageHealth::Loading,
            SystemState::StorageUnavailable => StorageHealth::Failed,
            _ if self.session.is_mounted() => StorageHealth::Ok,
            _ => StorageHealth::Ejected,
        }
    }

    fn refresh(&mut self) {
        let snapshot = self.snapshot();
        self.view.render(snapshot);
    }

    fn enter(&mut self, next: SystemState) {
        info!("{} -> {}", self.state(), next);
        self.history.advance(next);
        self.refresh();
    }

    /// Shows Error for the configured duration, then leaves it into `resume`
    /// or, if `None`, the state held before the failing action.
    fn raise_transient(&mut self, error: LoggerError, resume: Option<SystemState>) {
        warn!("{} in {}", error, self.state());
        self.history.begin_excursion(SystemState::Error);
        self.refresh();

        self.platform.delay_ms(self.config.error_display_ms);

        match resume {
            Some(state) => self.history.end_excursion_into(state),
            None => {
                self.history.end_excursion();
            }
        }
        self.refresh();
    }

    fn restart_once(&mut self) {
        if !self.restart_requested {
            self.restart_requested = true;
            info!("restarting into bootloader");
            self.platform.restart_into_bootloader();
        }
    }

    fn handle_record_toggle(&mut self) {
        if !self.requests.take(Button::RecordToggle) {
            return;
        }

        match self.state() {
            SystemState::Ready => self.start_recording(),
            SystemState::Capturing => self.stop_recording(),
            other => debug!("record toggle ignored in {}", other),
        }
    }

    fn start_recording(&mut self) {
        if let Err(e) = self.session.begin_recording() {
            self.raise_transient(e, None);
            return;
        }

        self.samples = 0;
        self.last_sample = Some(self.time_source.now());
        self.beep.play(START_BEEPS);
        self.enter(SystemState::Capturing);
    }

    fn stop_recording(&mut self) {
        self.beep.play(STOP_BEEPS);
        self.session.end_recording();
        info!("recording stopped after {} samples", self.samples);
        self.enter(SystemState::Ready);
    }

    fn service_sampling(&mut self) {
        let now = self.time_source.now();
        let due = match self.last_sample {
            Some(last) => now.has_elapsed(last, SAMPLE_INTERVAL_MS),
            None => true,
        };
        if !due {
            return;
        }
        // Re-anchor on now so a late cycle never leaves a backlog.
        self.last_sample = Some(now);

        match self.capture() {
            Ok(()) => {
                if self.config.sample_flash_ms > 0 {
                    self.view.indicate_sample(true);
                    self.platform.delay_ms(self.config.sample_flash_ms);
                    self.view.indicate_sample(false);
                }
                self.refresh();
            }
            Err(e) => {
                self.session.end_recording();
                self.raise_transient(e, Some(SystemState::Ready));
            }
        }
    }

    fn capture(&mut self) -> Result<(), LoggerError> {
        let reading = self.sensor.read()?;
        let sample = self.samples.wrapping_add(1);
        let record = LogRecord::new(sample, SAMPLE_INTERVAL_MS, reading);

        self.session.append(&record)?;
        self.samples = sample;
        debug!("sample {} stored", sample);
        Ok(())
    }

    fn handle_read_back(&mut self) {
        if !self.requests.take(Button::ReadBack) {
            return;
        }
        if self.state() != SystemState::Ready {
            debug!("read-back ignored in {}", self.state());
            return;
        }

        self.history.begin_excursion(SystemState::ReadingBack);
        self.refresh();

        let result = self.stream_log();
        self.history.end_excursion();

        match result {
            Ok(bytes) => {
                info!("read back {} bytes", bytes);
                self.refresh();
            }
            Err(e) => self.raise_transient(e, None),
        }
    }

    fn stream_log(&mut self) -> Result<usize, LoggerError> {
        let filename = self.session.filename();
        let mut reader = self.session.read_all()?;

        self.platform.write_diagnostic(b"Contents of ");
        self.platform.write_diagnostic(filename.as_bytes());
        self.platform.write_diagnostic(b":\n");

        let mut buf = [0u8; READ_CHUNK];
        let mut total = 0;
        loop {
            let n = reader.read(&mut buf)?;
            if n == 0 {
                break;
            }
            self.platform.write_diagnostic(&buf[..n]);
            total += n;
        }
        reader.close();

        self.platform.write_diagnostic(b"\nFinished reading ");
        self.platform.write_diagnostic(filename.as_bytes());
        self.platform.write_diagnostic(b".\n\n");
        Ok(total)
    }

    fn handle_exit(&mut self) {
        if !self.requests.take(Button::Exit) {
            return;
        }
        if self.state() != SystemState::Ready {
            debug!("exit ignored in {}", self.state());
            return;
        }

        match self.session.unmount() {
            Ok(()) => self.enter(SystemState::ShuttingDown),
            Err(e) => self.raise_transient(e, None),
        }
    }
}
