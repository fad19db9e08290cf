//! Raw inertial sensor access and unit conversion.

use crate::error::LoggerError;

/// Accelerometer counts per g at the ±2 g range.
pub const ACCEL_COUNTS_PER_G: f32 = 16384.0;

/// Gyroscope counts per °/s at the ±250 °/s range.
pub const GYRO_COUNTS_PER_DPS: f32 = 131.0;

/// One raw register read: accelerometer then gyroscope, x/y/z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawImu {
    /// Accelerometer counts.
    pub accel: [i16; 3],
    /// Gyroscope counts.
    pub gyro: [i16; 3],
}

/// Bus-level sensor primitive supplied by the board (MPU-6050 over I2C on the
/// reference hardware).
pub trait ImuSource {
    /// Bus error type.
    type Error;

    /// Reads both 3-axis vectors.
    fn read_raw(&mut self) -> Result<RawImu, Self::Error>;
}

/// A reading in physical units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ImuReading {
    /// Acceleration in g.
    pub accel: [f32; 3],
    /// Angular rate in °/s.
    pub gyro: [f32; 3],
}

impl From<RawImu> for ImuReading {
    fn from(raw: RawImu) -> Self {
        Self {
            accel: raw.accel.map(|c| f32::from(c) / ACCEL_COUNTS_PER_G),
            gyro: raw.gyro.map(|c| f32::from(c) / GYRO_COUNTS_PER_DPS),
        }
    }
}

/// Reads the sensor and converts to physical units.
pub struct SensorReader<S: ImuSource> {
    source: S,
}

impl<S: ImuSource> SensorReader<S> {
    /// Wraps a raw sensor source.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Takes one reading.
    pub fn read(&mut self) -> Result<ImuReading, LoggerError> {
        self.source
            .read_raw()
            .map(ImuReading::from)
            .map_err(|_| LoggerError::SensorRead)
    }

    /// The wrapped source.
    pub fn source(&self) -> &S {
        &self.source
    }
}
