//! CSV layout of the log file.

use crate::sensor::ImuReading;
use core::fmt::Write;
use heapless::String;

/// First line of every log file.
pub const HEADER: &str = "time_ms,accel_x,accel_y,accel_z,giro_x,giro_y,giro_z\n";

/// Capacity of a formatted record line.
///
/// Seven fields of at most 11 characters each (a `u32` or an `f32` at ±2 g /
/// ±250 °/s with two decimals) plus separators and newline.
pub const LINE_CAPACITY: usize = 96;

/// One sample as written to the log.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogRecord {
    /// Milliseconds since recording started.
    pub elapsed_ms: u32,
    /// Converted sensor values.
    pub reading: ImuReading,
}

impl LogRecord {
    /// Builds the record for sample number `sample` (1-based) taken every
    /// `interval_ms`.
    pub fn new(sample: u32, interval_ms: u32, reading: ImuReading) -> Self {
        Self {
            elapsed_ms: sample.wrapping_mul(interval_ms),
            reading,
        }
    }

    /// Writes `elapsed,ax,ay,az,gx,gy,gz\n` with two decimals per float.
    pub fn write_to<W: Write>(&self, out: &mut W) -> core::fmt::Result {
        let [ax, ay, az] = self.reading.accel;
        let [gx, gy, gz] = self.reading.gyro;
        writeln!(
            out,
            "{},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2}",
            self.elapsed_ms, ax, ay, az, gx, gy, gz
        )
    }

    /// Formats the record into a fixed-capacity line.
    pub fn to_line(&self) -> Result<String<LINE_CAPACITY>, core::fmt::Error> {
        let mut line = String::new();
        self.write_to(&mut line)?;
        Ok(line)
    }
}
