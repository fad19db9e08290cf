//! Shared test infrastructure for imu-datalogger integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use core::cell::{Cell, RefCell};
use imu_datalogger::{
    BeepFeedback, BeepGenerator, BlinkGenerator, Board, Button, ButtonRequests, DataLogger,
    Display, FeedbackTimer, ImuSource, IndicatorLight, LoggerConfig, OpenMode, PhaseGenerator,
    Platform, RawImu, Srgb, StatusPresenter, Storage, TimeDuration, TimeInstant, TimeSource,
};

// ============================================================================
// Mock Time Types
// ============================================================================

/// Mock duration type for testing (wraps milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestDuration(pub u64);

impl TimeDuration for TestDuration {
    const ZERO: Self = TestDuration(0);

    fn as_millis(&self) -> u64 {
        self.0
    }

    fn from_millis(millis: u64) -> Self {
        TestDuration(millis)
    }
}

/// Mock instant type for testing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestInstant(pub u64);

impl TimeInstant for TestInstant {
    type Duration = TestDuration;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        TestDuration(self.0 - earlier.0)
    }
}

/// Mock time source with controllable time advancement
pub struct MockTimeSource {
    current_time: Cell<TestInstant>,
}

impl MockTimeSource {
    pub fn new() -> Self {
        Self {
            current_time: Cell::new(TestInstant(0)),
        }
    }

    /// Advance time by the given number of milliseconds
    pub fn advance(&self, millis: u64) {
        let current = self.current_time.get();
        self.current_time.set(TestInstant(current.0 + millis));
    }

    pub fn millis(&self) -> u64 {
        self.current_time.get().0
    }
}

impl TimeSource<TestInstant> for MockTimeSource {
    fn now(&self) -> TestInstant {
        self.current_time.get()
    }
}

// ============================================================================
// Mock Storage
// ============================================================================

/// Handle returned by `MockStorage::open`
#[derive(Debug)]
pub struct MockFile {
    pub mode: OpenMode,
    pos: usize,
}

/// In-memory volume holding a single file
#[derive(Default)]
pub struct MockStorage {
    pub fail_mount: bool,
    pub fail_unmount: bool,
    pub fail_open: bool,
    pub fail_read: bool,
    /// Number of writes that succeed before every further write fails
    pub fail_write_after: Option<usize>,

    pub mounted: bool,
    pub file_exists: bool,
    pub contents: Vec<u8>,
    pub opens: Vec<OpenMode>,
    pub writes: usize,
    pub closes: usize,
    pub open_files: usize,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(contents: &str) -> Self {
        Self {
            file_exists: true,
            contents: contents.as_bytes().to_vec(),
            ..Self::default()
        }
    }

    pub fn contents_str(&self) -> &str {
        core::str::from_utf8(&self.contents).unwrap()
    }

    pub fn lines(&self) -> Vec<&str> {
        self.contents_str().lines().collect()
    }
}

impl Storage for MockStorage {
    type File = MockFile;
    type Error = ();

    fn mount(&mut self) -> Result<(), ()> {
        if self.fail_mount {
            return Err(());
        }
        self.mounted = true;
        Ok(())
    }

    fn unmount(&mut self) -> Result<(), ()> {
        if self.fail_unmount {
            return Err(());
        }
        self.mounted = false;
        Ok(())
    }

    fn open(&mut self, _name: &str, mode: OpenMode) -> Result<MockFile, ()> {
        if self.fail_open || !self.mounted {
            return Err(());
        }
        match mode {
            OpenMode::CreateTruncate => {
                self.contents.clear();
                self.file_exists = true;
            }
            OpenMode::ReadOnly if !self.file_exists => return Err(()),
            OpenMode::ReadOnly => {}
        }
        self.opens.push(mode);
        self.open_files += 1;
        Ok(MockFile { mode, pos: 0 })
    }

    fn write(&mut self, file: &mut MockFile, data: &[u8]) -> Result<(), ()> {
        assert_eq!(file.mode, OpenMode::CreateTruncate);
        if let Some(limit) = self.fail_write_after {
            if self.writes >= limit {
                return Err(());
            }
        }
        self.contents.extend_from_slice(data);
        self.writes += 1;
        Ok(())
    }

    fn read(&mut self, file: &mut MockFile, buf: &mut [u8]) -> Result<usize, ()> {
        if self.fail_read {
            return Err(());
        }
        let remaining = &self.contents[file.pos..];
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        file.pos += n;
        Ok(n)
    }

    fn close(&mut self, _file: MockFile) -> Result<(), ()> {
        self.open_files -= 1;
        self.closes += 1;
        Ok(())
    }
}

// ============================================================================
// Mock Sensor
// ============================================================================

pub struct MockImu {
    pub raw: RawImu,
    pub fail: bool,
    pub reads: usize,
}

impl MockImu {
    /// Sensor lying flat: 1 g on z, no rotation
    pub fn level() -> Self {
        Self {
            raw: RawImu {
                accel: [0, 0, 16384],
                gyro: [0, 0, 0],
            },
            fail: false,
            reads: 0,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::level()
        }
    }
}

impl ImuSource for MockImu {
    type Error = ();

    fn read_raw(&mut self) -> Result<RawImu, ()> {
        self.reads += 1;
        if self.fail { Err(()) } else { Ok(self.raw) }
    }
}

// ============================================================================
// Mock Display / Light
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Rect(u8, u8, u8, u8),
    Line(u8, u8, u8, u8),
    Text(String, u8, u8),
}

/// Display recording every flushed frame
#[derive(Default)]
pub struct MockDisplay {
    pending: Vec<DrawOp>,
    pub frames: Vec<Vec<DrawOp>>,
}

impl MockDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_frame(&self) -> &[DrawOp] {
        self.frames.last().map(|f| f.as_slice()).unwrap_or(&[])
    }

    pub fn last_texts(&self) -> Vec<&str> {
        texts(self.last_frame())
    }

    pub fn any_frame_shows(&self, text: &str) -> bool {
        self.frames.iter().any(|f| texts(f).contains(&text))
    }
}

fn texts(frame: &[DrawOp]) -> Vec<&str> {
    frame
        .iter()
        .filter_map(|op| match op {
            DrawOp::Text(t, _, _) => Some(t.as_str()),
            _ => None,
        })
        .collect()
}

impl Display for MockDisplay {
    fn clear(&mut self) {
        self.pending.clear();
    }

    fn rect(&mut self, x: u8, y: u8, width: u8, height: u8) {
        self.pending.push(DrawOp::Rect(x, y, width, height));
    }

    fn line(&mut self, x0: u8, y0: u8, x1: u8, y1: u8) {
        self.pending.push(DrawOp::Line(x0, y0, x1, y1));
    }

    fn text(&mut self, text: &str, x: u8, y: u8) {
        self.pending.push(DrawOp::Text(text.to_string(), x, y));
    }

    fn flush(&mut self) {
        self.frames.push(core::mem::take(&mut self.pending));
    }
}

/// Light recording every color change
pub struct MockLight {
    current_color: Srgb,
    color_history: heapless::Vec<Srgb, 64>,
}

impl MockLight {
    pub fn new() -> Self {
        Self {
            current_color: Srgb::new(0.0, 0.0, 0.0),
            color_history: heapless::Vec::new(),
        }
    }

    pub fn get_last_color(&self) -> Srgb {
        self.current_color
    }

    pub fn color_history(&self) -> &[Srgb] {
        &self.color_history
    }
}

impl IndicatorLight for MockLight {
    fn set_color(&mut self, color: Srgb) {
        self.current_color = color;
        let _ = self.color_history.push(color);
    }
}

// ============================================================================
// Mock Feedback Timer
// ============================================================================

struct TimerLog<O> {
    armed: bool,
    periods: Vec<u32>,
    cancels: usize,
    outputs: Vec<O>,
}

/// Repeating timer bound to a generator; fires on `arm` and on each `tick`
pub struct MockTimer<'g, G: PhaseGenerator> {
    generator: &'g G,
    log: RefCell<TimerLog<G::Output>>,
}

impl<'g, G> MockTimer<'g, G>
where
    G: PhaseGenerator,
    G::Output: Copy,
{
    pub fn new(generator: &'g G) -> Self {
        Self {
            generator,
            log: RefCell::new(TimerLog {
                armed: false,
                periods: Vec::new(),
                cancels: 0,
                outputs: Vec::new(),
            }),
        }
    }

    fn fire(&self) -> G::Output {
        let tick = self.generator.fire();
        let mut log = self.log.borrow_mut();
        log.outputs.push(tick.output);
        if !tick.reschedule {
            log.armed = false;
        }
        tick.output
    }

    /// Simulate one period elapsing; returns the output if the timer was armed
    pub fn tick(&self) -> Option<G::Output> {
        if !self.is_armed() {
            return None;
        }
        Some(self.fire())
    }

    /// Tick until the timer stops or `limit` periods pass
    pub fn run_out(&self, limit: usize) -> Vec<G::Output> {
        let mut outputs = Vec::new();
        for _ in 0..limit {
            match self.tick() {
                Some(output) => outputs.push(output),
                None => break,
            }
        }
        outputs
    }

    pub fn is_armed(&self) -> bool {
        self.log.borrow().armed
    }

    pub fn periods(&self) -> Vec<u32> {
        self.log.borrow().periods.clone()
    }

    pub fn arm_count(&self) -> usize {
        self.log.borrow().periods.len()
    }

    pub fn cancels(&self) -> usize {
        self.log.borrow().cancels
    }

    pub fn outputs(&self) -> Vec<G::Output> {
        self.log.borrow().outputs.clone()
    }
}

impl<G> FeedbackTimer for MockTimer<'_, G>
where
    G: PhaseGenerator,
    G::Output: Copy,
{
    fn arm(&mut self, period_ms: u32) {
        {
            let mut log = self.log.borrow_mut();
            log.armed = true;
            log.periods.push(period_ms);
        }
        self.fire();
    }

    fn cancel(&mut self) {
        let mut log = self.log.borrow_mut();
        log.armed = false;
        log.cancels += 1;
    }
}

// ============================================================================
// Mock Platform
// ============================================================================

/// Platform whose delay advances the mock clock
pub struct MockPlatform<'t> {
    clock: &'t MockTimeSource,
    pub delays: Vec<u32>,
    pub restarts: usize,
    pub diagnostic: Vec<u8>,
}

impl<'t> MockPlatform<'t> {
    pub fn new(clock: &'t MockTimeSource) -> Self {
        Self {
            clock,
            delays: Vec::new(),
            restarts: 0,
            diagnostic: Vec::new(),
        }
    }

    pub fn diagnostic_str(&self) -> &str {
        core::str::from_utf8(&self.diagnostic).unwrap()
    }
}

impl Platform for MockPlatform<'_> {
    fn delay_ms(&mut self, ms: u32) {
        self.delays.push(ms);
        self.clock.advance(u64::from(ms));
    }

    fn restart_into_bootloader(&mut self) {
        self.restarts += 1;
    }

    fn write_diagnostic(&mut self, bytes: &[u8]) {
        self.diagnostic.extend_from_slice(bytes);
    }
}

// ============================================================================
// Test Rig
// ============================================================================

pub type BlinkTimer<'a> = MockTimer<'a, BlinkGenerator>;
pub type BeepTimer<'a> = MockTimer<'a, BeepGenerator>;
pub type TestPresenter<'a> = StatusPresenter<'a, MockDisplay, MockLight, BlinkTimer<'a>>;
pub type TestLogger<'a> = DataLogger<
    'a,
    TestInstant,
    MockTimeSource,
    MockStorage,
    MockImu,
    TestPresenter<'a>,
    BeepTimer<'a>,
    MockPlatform<'a>,
>;

/// Statics a board would declare, owned here so loggers can borrow them
pub struct Rig {
    pub clock: MockTimeSource,
    pub requests: ButtonRequests,
    pub blink: BlinkGenerator,
    pub beep: BeepGenerator,
}

impl Rig {
    pub fn new() -> Self {
        Self {
            clock: MockTimeSource::new(),
            requests: ButtonRequests::new(),
            blink: BlinkGenerator::new(),
            beep: BeepGenerator::new(),
        }
    }

    pub fn presenter(&self, config: &LoggerConfig) -> TestPresenter<'_> {
        StatusPresenter::new(
            MockDisplay::new(),
            MockLight::new(),
            &self.blink,
            MockTimer::new(&self.blink),
            config.blink_period_ms,
        )
    }

    pub fn logger_with(
        &self,
        storage: MockStorage,
        imu: MockImu,
        config: LoggerConfig,
    ) -> TestLogger<'_> {
        let board = Board {
            storage,
            imu,
            view: self.presenter(&config),
            beep: BeepFeedback::new(&self.beep, MockTimer::new(&self.beep), config.beep_period_ms),
            platform: MockPlatform::new(&self.clock),
        };
        DataLogger::new(board, &self.clock, &self.requests, config)
    }

    pub fn logger(&self, storage: MockStorage) -> TestLogger<'_> {
        self.logger_with(storage, MockImu::level(), LoggerConfig::default())
    }

    /// Logger that already mounted storage and sits in Ready
    pub fn ready_logger(&self) -> TestLogger<'_> {
        let mut logger = self.logger(MockStorage::new());
        logger.start().unwrap();
        logger
    }

    /// Debounced press as the edge interrupt would report it
    pub fn press(&self, button: Button) {
        self.requests.setter().raise(button);
    }
}

// ============================================================================
// Logger Accessors
// ============================================================================

pub fn display<'l>(logger: &'l TestLogger<'_>) -> &'l MockDisplay {
    logger.view().display()
}

pub fn light<'l>(logger: &'l TestLogger<'_>) -> &'l MockLight {
    logger.view().light()
}

pub fn storage<'l>(logger: &'l TestLogger<'_>) -> &'l MockStorage {
    logger.session().storage()
}

pub fn platform<'l>(logger: &'l TestLogger<'_>) -> &'l MockPlatform<'l> {
    logger.platform()
}

pub fn beep_timer<'l>(logger: &'l TestLogger<'_>) -> &'l BeepTimer<'l> {
    logger.beep().timer()
}

pub fn blink_timer<'l>(logger: &'l TestLogger<'_>) -> &'l BlinkTimer<'l> {
    logger.view().blink_timer()
}

/// Let one sample interval pass and run a poll cycle
pub fn sample_once(rig: &Rig, logger: &mut TestLogger<'_>) {
    rig.clock.advance(u64::from(imu_datalogger::SAMPLE_INTERVAL_MS));
    logger.poll();
}
