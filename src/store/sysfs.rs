// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! File-backed store for sysfs nodes and the toggle cache.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::error::{ReadError, WriteError};
use crate::store::Store;

/// A file holding a brightness value as decimal text.
///
/// Reads parse the first line. Writes truncate the file and write the value
/// followed by a newline in a single unbuffered call, so sysfs sees exactly
/// one value per write.
///
/// # Examples
///
/// ```no_run
/// use backlight::store::{Store, SysfsFile};
///
/// let max = SysfsFile::new("/sys/class/backlight/intel_backlight/max_brightness");
/// println!("max = {}", max.read()?);
/// # Ok::<(), backlight::error::ReadError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SysfsFile {
    path: PathBuf,
}

impl SysfsFile {
    /// Creates a store for the file at `path`.
    ///
    /// The file is not touched until the first read or write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Store for SysfsFile {
    fn read(&self) -> Result<u32, ReadError> {
        let file = File::open(&self.path).map_err(|source| ReadError::Open {
            path: self.path.clone(),
            source,
        })?;

        let mut line = String::new();
        BufReader::new(file)
            .read_line(&mut line)
            .map_err(|source| ReadError::Io {
                path: self.path.clone(),
                source,
            })?;

        let content = line.trim();
        let value = content.parse::<u32>().map_err(|_| ReadError::Parse {
            path: self.path.clone(),
            content: content.to_string(),
        })?;

        tracing::debug!(path = %self.path.display(), value, "Read brightness value");
        Ok(value)
    }

    fn write(&self, value: u32) -> Result<usize, WriteError> {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .map_err(|source| WriteError::Open {
                path: self.path.clone(),
                source,
            })?;

        let text = format!("{value}\n");
        file.write_all(text.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|source| WriteError::Rejected {
                path: self.path.clone(),
                value,
                source,
            })?;

        tracing::trace!(path = %self.path.display(), value, "Wrote brightness value");
        Ok(text.len())
    }
}
