// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `backlight` crate.
//!
//! This module provides the error hierarchy for every failure a run can hit:
//! reading and writing the brightness files, pacing a fade, holding the run
//! lock, loading configuration and constructing constrained values.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// The main error type for this crate.
///
/// Every variant is fatal for the current run. The binary reports it and
/// exits with a non-zero status.
#[derive(Debug, Error)]
pub enum Error {
    /// A brightness value could not be read.
    #[error("read error: {0}")]
    Read(#[from] ReadError),

    /// A brightness value could not be written.
    #[error("write error: {0}")]
    Write(#[from] WriteError),

    /// A fade transition was aborted.
    #[error("fade error: {0}")]
    Fade(#[from] FadeError),

    /// The run lock could not be taken or released.
    #[error("lock error: {0}")]
    Lock(#[from] LockError),

    /// Configuration could not be loaded or resolved.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// A constrained value was rejected.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// The current brightness reported by the device exceeds its maximum.
    #[error("current brightness {current} exceeds maximum {max}")]
    CurrentAboveMax {
        /// Value read from the brightness file.
        current: u32,
        /// Value read from the maximum brightness file.
        max: u32,
    },

    /// The brightness file cannot be written by this process.
    #[error("unable to set brightness, check permissions on {}", path.display())]
    NotWritable {
        /// The brightness file that failed the write probe.
        path: PathBuf,
        /// Why the probe failed.
        #[source]
        source: ProbeError,
    },
}

/// Errors raised while reading an integer from a brightness file.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The file could not be opened.
    #[error("could not open {}: {source}", path.display())]
    Open {
        /// The file that failed to open.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The file was opened but reading its first line failed.
    #[error("could not read {}: {source}", path.display())]
    Io {
        /// The file that failed to read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The first line is not a base-10 unsigned integer.
    #[error("{} does not hold an integer: {content:?}", path.display())]
    Parse {
        /// The file that was read.
        path: PathBuf,
        /// The trimmed first line.
        content: String,
    },
}

/// Errors raised while writing an integer to a brightness file.
#[derive(Debug, Error)]
pub enum WriteError {
    /// The file could not be opened for writing.
    #[error("could not open {} for writing: {source}", path.display())]
    Open {
        /// The file that failed to open.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The medium rejected the value.
    #[error("writing {value} to {} was rejected: {source}", path.display())]
    Rejected {
        /// The file that rejected the write.
        path: PathBuf,
        /// The value that was being written.
        value: u32,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Errors raised by the write-permission probe.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The current value could not be read.
    #[error(transparent)]
    Read(#[from] ReadError),

    /// The current value could not be written back.
    #[error(transparent)]
    Write(#[from] WriteError),
}

/// A pause between fade steps failed for a reason other than interruption.
#[derive(Debug, Error)]
#[error("timer failed: {source}")]
pub struct TimerError {
    /// The underlying timer error.
    #[from]
    pub source: io::Error,
}

/// Errors that abort a fade transition.
///
/// No retry or rollback happens: the brightness file keeps the last value
/// that was written successfully.
#[derive(Debug, Error)]
pub enum FadeError {
    /// A step could not be written.
    #[error(transparent)]
    Write(#[from] WriteError),

    /// A pause between steps failed.
    #[error(transparent)]
    Timer(#[from] TimerError),
}

impl FadeError {
    /// Returns the numeric outcome code for this failure.
    ///
    /// `-1` means the value could not be written, `-2` means the timer
    /// failed.
    #[must_use]
    pub const fn code(&self) -> i32 {
        match self {
            Self::Write(_) => -1,
            Self::Timer(_) => -2,
        }
    }
}

/// Errors related to the exclusive run lock.
#[derive(Debug, Error)]
pub enum LockError {
    /// The lock file could not be opened or created.
    #[error("could not open lock file {}: {source}", path.display())]
    Open {
        /// The lock file path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The lock could not be acquired.
    #[error("could not lock {}: {source}", path.display())]
    Acquire {
        /// The lock file path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The kernel detected that waiting for the lock would deadlock.
    #[error("deadlock detected while locking {}", path.display())]
    Deadlock {
        /// The lock file path.
        path: PathBuf,
    },

    /// The lock could not be released.
    #[error("could not unlock {}: {source}", path.display())]
    Release {
        /// The lock file path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Errors related to loading configuration and discovering paths.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("could not read config {}: {source}", path.display())]
    Io {
        /// The configuration file path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The configuration file is not valid JSON for [`Config`](crate::Config).
    #[error("invalid config {}: {source}", path.display())]
    Json {
        /// The configuration file path.
        path: PathBuf,
        /// The JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// No backlight device directory exists.
    #[error("no backlight device found under {}", .0.display())]
    NoDevice(PathBuf),

    /// The directory holding the running executable could not be determined.
    #[error("could not determine program directory: {0}")]
    ProgramDir(#[source] io::Error),
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: u32,
        /// Maximum allowed value.
        max: u32,
        /// The actual value that was provided.
        actual: u32,
    },

    /// The lower limit of a range is above its maximum.
    #[error("lower limit {lower} is above maximum {max}")]
    InvertedRange {
        /// The requested lower limit.
        lower: u32,
        /// The requested maximum.
        max: u32,
    },

    /// A maximum brightness of zero cannot express any level.
    #[error("maximum brightness must be positive")]
    ZeroMaximum,
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
