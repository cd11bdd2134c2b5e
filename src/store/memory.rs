// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory store.

use std::cell::RefCell;
use std::io;
use std::path::PathBuf;

use crate::error::{ReadError, WriteError};
use crate::store::Store;

/// A store kept in memory that records every successful write.
///
/// Writes can be made to fail from a given write onwards, which mimics a
/// permission being revoked in the middle of a fade.
///
/// # Examples
///
/// ```
/// use backlight::store::{MemoryStore, Store};
///
/// let store = MemoryStore::new(100);
/// store.write(120).unwrap();
/// assert_eq!(store.read().unwrap(), 120);
/// assert_eq!(store.writes(), vec![120]);
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RefCell<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    value: Option<u32>,
    writes: Vec<u32>,
    attempts: usize,
    fail_from: Option<usize>,
}

impl MemoryStore {
    /// Creates a store holding `value`.
    #[must_use]
    pub fn new(value: u32) -> Self {
        Self {
            inner: RefCell::new(Inner {
                value: Some(value),
                ..Inner::default()
            }),
        }
    }

    /// Creates a store that holds no value; reads fail until a write succeeds.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Makes the `attempt`-th write (1-based) and every later write fail.
    #[must_use]
    pub fn failing_from(self, attempt: usize) -> Self {
        self.inner.borrow_mut().fail_from = Some(attempt);
        self
    }

    /// Returns the values written successfully, in order.
    #[must_use]
    pub fn writes(&self) -> Vec<u32> {
        self.inner.borrow().writes.clone()
    }

    /// Returns the current value, if any.
    #[must_use]
    pub fn value(&self) -> Option<u32> {
        self.inner.borrow().value
    }

    fn path() -> PathBuf {
        PathBuf::from("<memory>")
    }
}

impl Store for MemoryStore {
    fn read(&self) -> Result<u32, ReadError> {
        self.inner.borrow().value.ok_or_else(|| ReadError::Open {
            path: Self::path(),
            source: io::Error::from(io::ErrorKind::NotFound),
        })
    }

    fn write(&self, value: u32) -> Result<usize, WriteError> {
        let mut inner = self.inner.borrow_mut();
        inner.attempts += 1;
        if inner.fail_from.is_some_and(|n| inner.attempts >= n) {
            return Err(WriteError::Open {
                path: Self::path(),
                source: io::Error::from(io::ErrorKind::PermissionDenied),
            });
        }
        inner.value = Some(value);
        inner.writes.push(value);
        Ok(format!("{value}\n").len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProbeError;

    #[test]
    fn empty_store_cannot_be_read() {
        assert!(MemoryStore::empty().read().is_err());
    }

    #[test]
    fn failing_store_keeps_last_good_value() {
        let store = MemoryStore::new(10).failing_from(2);
        assert_eq!(store.write(11).unwrap(), 3);
        assert!(store.write(12).is_err());
        assert!(store.write(13).is_err());
        assert_eq!(store.value(), Some(11));
        assert_eq!(store.writes(), vec![11]);
    }

    #[test]
    fn check_writable_does_not_change_value() {
        let store = MemoryStore::new(42);
        assert!(store.check_writable().is_ok());
        assert_eq!(store.value(), Some(42));

        let locked = MemoryStore::new(42).failing_from(1);
        assert!(matches!(
            locked.check_writable(),
            Err(ProbeError::Write(WriteError::Open { .. }))
        ));
        assert!(matches!(
            MemoryStore::empty().check_writable(),
            Err(ProbeError::Read(_))
        ));
        assert_eq!(locked.value(), Some(42));
    }
}
