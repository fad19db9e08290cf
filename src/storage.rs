//! Storage session: mount state, the recording file lifecycle and read-back.
//!
//! The file-system driver is supplied by the board through [`Storage`]; the
//! session only sequences calls and maps failures to [`LoggerError`].

use crate::error::LoggerError;
use crate::record::{HEADER, LogRecord};

/// How a file is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OpenMode {
    /// Write access; creates the file or truncates an existing one.
    CreateTruncate,
    /// Read access; the file must exist.
    ReadOnly,
}

/// File-system primitives of the storage medium (FatFs on an SD card on the
/// reference hardware).
pub trait Storage {
    /// Open file handle.
    type File;
    /// Driver result code.
    type Error;

    /// Mounts the default volume.
    fn mount(&mut self) -> Result<(), Self::Error>;

    /// Unmounts the default volume.
    fn unmount(&mut self) -> Result<(), Self::Error>;

    /// Opens `name` on the mounted volume.
    fn open(&mut self, name: &str, mode: OpenMode) -> Result<Self::File, Self::Error>;

    /// Writes all of `data` at the end of `file`.
    fn write(&mut self, file: &mut Self::File, data: &[u8]) -> Result<(), Self::Error>;

    /// Reads up to `buf.len()` bytes; returns 0 at end of file.
    fn read(&mut self, file: &mut Self::File, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Closes `file`, flushing pending data.
    fn close(&mut self, file: Self::File) -> Result<(), Self::Error>;
}

/// Owns the storage medium and the log file of the current recording.
pub struct StorageSession<S: Storage> {
    storage: S,
    filename: &'static str,
    file: Option<S::File>,
    mounted: bool,
    header_written: bool,
}

impl<S: Storage> StorageSession<S> {
    /// Creates a session for `filename` on an unmounted medium.
    pub fn new(storage: S, filename: &'static str) -> Self {
        Self {
            storage,
            filename,
            file: None,
            mounted: false,
            header_written: false,
        }
    }

    /// Mounts the medium.
    pub fn mount(&mut self) -> Result<(), LoggerError> {
        self.storage.mount().map_err(|_| LoggerError::StorageMount)?;
        self.mounted = true;
        info!("storage mounted");
        Ok(())
    }

    /// Unmounts the medium. Closes a recording left open.
    pub fn unmount(&mut self) -> Result<(), LoggerError> {
        self.end_recording();
        self.storage
            .unmount()
            .map_err(|_| LoggerError::StorageUnmount)?;
        self.mounted = false;
        info!("storage unmounted");
        Ok(())
    }

    /// Creates or truncates the log file and writes the header.
    ///
    /// On header failure the file is closed again.
    pub fn begin_recording(&mut self) -> Result<(), LoggerError> {
        self.end_recording();

        let mut file = self
            .storage
            .open(self.filename, OpenMode::CreateTruncate)
            .map_err(|_| LoggerError::StorageOpen)?;

        if self.storage.write(&mut file, HEADER.as_bytes()).is_err() {
            let _ = self.storage.close(file);
            return Err(LoggerError::StorageWrite);
        }

        self.file = Some(file);
        self.header_written = true;
        info!("recording to {}", self.filename);
        Ok(())
    }

    /// Appends one record line.
    ///
    /// A failed write closes the file; the recording is over.
    pub fn append(&mut self, record: &LogRecord) -> Result<(), LoggerError> {
        let line = record.to_line().map_err(|_| LoggerError::StorageWrite)?;
        let file = self.file.as_mut().ok_or(LoggerError::NotRecording)?;

        if self.storage.write(file, line.as_bytes()).is_err() {
            self.end_recording();
            return Err(LoggerError::StorageWrite);
        }
        Ok(())
    }

    /// Closes the recording file, if any.
    pub fn end_recording(&mut self) {
        if let Some(file) = self.file.take() {
            if self.storage.close(file).is_err() {
                warn!("closing {} failed", self.filename);
            }
        }
        self.header_written = false;
    }

    /// Opens the log file for streaming.
    pub fn read_all(&mut self) -> Result<ReadBack<'_, S>, LoggerError> {
        if !self.mounted {
            return Err(LoggerError::StorageOpen);
        }
        let file = self
            .storage
            .open(self.filename, OpenMode::ReadOnly)
            .map_err(|_| LoggerError::StorageOpen)?;

        Ok(ReadBack {
            storage: &mut self.storage,
            file: Some(file),
        })
    }

    /// Returns true while the medium is mounted.
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Returns true while a recording file is open.
    pub fn is_recording(&self) -> bool {
        self.file.is_some()
    }

    /// Returns true once the header of the open recording is on the medium.
    pub fn header_written(&self) -> bool {
        self.header_written
    }

    /// Log file name.
    pub fn filename(&self) -> &'static str {
        self.filename
    }

    /// The storage driver.
    pub fn storage(&self) -> &S {
        &self.storage
    }
}

/// Streaming reader over the log file; closes the file when dropped.
pub struct ReadBack<'s, S: Storage> {
    storage: &'s mut S,
    file: Option<S::File>,
}

impl<S: Storage> ReadBack<'_, S> {
    /// Reads the next chunk into `buf`; returns 0 at end of file.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize, LoggerError> {
        match self.file.as_mut() {
            Some(file) => self
                .storage
                .read(file, buf)
                .map_err(|_| LoggerError::StorageRead),
            None => Ok(0),
        }
    }

    /// Closes the file now.
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(file) = self.file.take() {
            let _ = self.storage.close(file);
        }
    }
}

impl<S: Storage> Drop for ReadBack<'_, S> {
    fn drop(&mut self) {
        self.release();
    }
}
