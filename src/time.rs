//! Time abstraction traits so the board can supply its own monotonic clock.

/// Source of the current instant (SysTick counter, embassy clock, mock clock).
pub trait TimeSource<I: TimeInstant> {
    /// Returns the current time instant.
    fn now(&self) -> I;
}

/// Trait abstraction for duration types.
pub trait TimeDuration: Copy + PartialEq {
    /// Zero duration constant.
    const ZERO: Self;

    /// Converts duration to milliseconds.
    fn as_millis(&self) -> u64;

    /// Creates duration from milliseconds.
    fn from_millis(millis: u64) -> Self;
}

/// Trait abstraction for instant types.
pub trait TimeInstant: Copy {
    /// Duration type for this instant.
    type Duration: TimeDuration;

    /// Calculates duration since an earlier instant.
    ///
    /// Implementations backed by a wrapping hardware counter should use
    /// wrapping subtraction.
    fn duration_since(&self, earlier: Self) -> Self::Duration;

    /// Returns true once at least `millis` have passed since `earlier`.
    #[inline]
    fn has_elapsed(&self, earlier: Self, millis: u32) -> bool {
        self.duration_since(earlier).as_millis() >= u64::from(millis)
    }
}
