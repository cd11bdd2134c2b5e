// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Brightness stores.
//!
//! A store is one persistent location holding a single decimal integer: the
//! sysfs `brightness` node, the `max_brightness` node, or the toggle cache
//! file next to the executable.
//!
//! # Implementations
//!
//! - [`SysfsFile`]: a file holding the value as text with a trailing newline
//! - [`MemoryStore`]: an in-memory store recording every write

mod memory;
mod sysfs;

pub use memory::MemoryStore;
pub use sysfs::SysfsFile;

use crate::error::{ProbeError, ReadError, WriteError};

/// A persistent location holding one brightness value.
///
/// Every successful [`write`](Store::write) must be visible to readers of
/// the location before it returns; a fade relies on hardware observing each
/// intermediate value.
pub trait Store {
    /// Reads the stored value.
    ///
    /// # Errors
    ///
    /// Returns `ReadError` if the location cannot be opened or does not hold
    /// an integer.
    fn read(&self) -> Result<u32, ReadError>;

    /// Replaces the stored value, returning the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns `WriteError` if the location cannot be opened for writing or
    /// the medium rejects the value.
    fn write(&self, value: u32) -> Result<usize, WriteError>;

    /// Probes write permission by writing the current value back unchanged.
    ///
    /// # Errors
    ///
    /// Returns `ProbeError::Read` if the current value cannot be read, or
    /// `ProbeError::Write` if writing it back fails.
    fn check_writable(&self) -> Result<(), ProbeError> {
        let value = self.read()?;
        self.write(value)?;
        Ok(())
    }
}

impl<S: Store + ?Sized> Store for &S {
    fn read(&self) -> Result<u32, ReadError> {
        (**self).read()
    }

    fn write(&self, value: u32) -> Result<usize, WriteError> {
        (**self).write(value)
    }

    fn check_writable(&self) -> Result<(), ProbeError> {
        (**self).check_writable()
    }
}
