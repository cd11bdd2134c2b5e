// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Process-wide run lock.
//!
//! Two invocations racing on the same backlight would interleave their fade
//! steps. Each run holds an advisory exclusive lock on a well-known file for
//! its whole duration, so concurrent runs execute one after the other.

use std::fs::{File, OpenOptions, TryLockError};
use std::io;
use std::path::{Path, PathBuf};

use crate::error::LockError;

/// An exclusive advisory lock held for the duration of a run.
///
/// The lock is released by [`release`](RunLock::release) or, on any other
/// exit path, when the guard is dropped.
///
/// # Examples
///
/// ```no_run
/// use backlight::lock::RunLock;
///
/// let lock = RunLock::acquire_exclusive("/tmp/brightLOCK")?;
/// // ... read, fade, write ...
/// lock.release()?;
/// # Ok::<(), backlight::error::LockError>(())
/// ```
#[derive(Debug)]
pub struct RunLock {
    path: PathBuf,
    file: Option<File>,
}

impl RunLock {
    /// Blocks until the exclusive lock on `path` is held.
    ///
    /// The lock file is created if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `LockError::Open` if the file cannot be opened,
    /// `LockError::Deadlock` if the kernel reports a deadlock, or
    /// `LockError::Acquire` for any other locking failure.
    pub fn acquire_exclusive(path: impl Into<PathBuf>) -> Result<Self, LockError> {
        let path = path.into();
        let file = Self::open(&path)?;

        if let Err(source) = file.lock() {
            return Err(if source.kind() == io::ErrorKind::Deadlock {
                LockError::Deadlock { path }
            } else {
                LockError::Acquire { path, source }
            });
        }

        tracing::debug!(path = %path.display(), "Acquired run lock");
        Ok(Self {
            path,
            file: Some(file),
        })
    }

    /// Takes the exclusive lock on `path` if nobody else holds it.
    ///
    /// Returns `Ok(None)` when another holder has the lock.
    ///
    /// # Errors
    ///
    /// Returns `LockError::Open` if the file cannot be opened, or
    /// `LockError::Acquire` if locking fails for another reason.
    pub fn try_acquire_exclusive(path: impl Into<PathBuf>) -> Result<Option<Self>, LockError> {
        let path = path.into();
        let file = Self::open(&path)?;

        match file.try_lock() {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Acquired run lock");
                Ok(Some(Self {
                    path,
                    file: Some(file),
                }))
            }
            Err(TryLockError::WouldBlock) => Ok(None),
            Err(TryLockError::Error(source)) => Err(LockError::Acquire { path, source }),
        }
    }

    /// Returns the lock file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Releases the lock.
    ///
    /// # Errors
    ///
    /// Returns `LockError::Release` if unlocking fails.
    pub fn release(mut self) -> Result<(), LockError> {
        if let Some(file) = self.file.take() {
            file.unlock().map_err(|source| LockError::Release {
                path: self.path.clone(),
                source,
            })?;
            tracing::debug!(path = %self.path.display(), "Released run lock");
        }
        Ok(())
    }

    fn open(path: &Path) -> Result<File, LockError> {
        OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|source| LockError::Open {
                path: path.to_path_buf(),
                source,
            })
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        if let Some(file) = self.file.take()
            && let Err(e) = file.unlock()
        {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to release run lock");
        }
    }
}
