//! Fault kinds raised by storage and sensor collaborators.

/// Errors surfaced by the storage session and sensor reader.
///
/// All of them are caught by [`DataLogger`](crate::DataLogger) and turned into a
/// state transition; only [`LoggerError::StorageMount`] is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoggerError {
    /// Storage medium could not be mounted at boot.
    StorageMount,
    /// Storage medium could not be unmounted on exit.
    StorageUnmount,
    /// Log file could not be created or opened.
    StorageOpen,
    /// Header or record write failed.
    StorageWrite,
    /// Read-back failed mid-stream.
    StorageRead,
    /// Append requested without an open recording.
    NotRecording,
    /// Inertial sensor did not answer.
    SensorRead,
}

impl LoggerError {
    /// Returns true for faults with no recovery other than a restart.
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoggerError::StorageMount)
    }
}

impl core::fmt::Display for LoggerError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LoggerError::StorageMount => write!(f, "storage medium not found"),
            LoggerError::StorageUnmount => write!(f, "failed to unmount storage"),
            LoggerError::StorageOpen => write!(f, "failed to open log file"),
            LoggerError::StorageWrite => write!(f, "failed to write log file"),
            LoggerError::StorageRead => write!(f, "failed to read log file"),
            LoggerError::NotRecording => write!(f, "no recording in progress"),
            LoggerError::SensorRead => write!(f, "failed to read inertial sensor"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LoggerError {}
