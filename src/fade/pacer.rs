// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pacing between fade steps.

use std::io;
use std::time::Duration;

/// Why a pause ended early.
#[derive(Debug)]
pub enum PauseError {
    /// The pause was interrupted and `remaining` time is still owed.
    Interrupted {
        /// Time left until the pause would have ended.
        remaining: Duration,
    },
    /// The timer failed.
    Failed(io::Error),
}

/// Waits between the writes of a fade.
#[allow(async_fn_in_trait)]
pub trait Pacer {
    /// Pauses for `duration`.
    ///
    /// # Errors
    ///
    /// Returns `PauseError::Interrupted` if the pause ended early but may be
    /// resumed, or `PauseError::Failed` if the timer itself failed.
    async fn pause(&mut self, duration: Duration) -> Result<(), PauseError>;
}

impl<P: Pacer> Pacer for &mut P {
    async fn pause(&mut self, duration: Duration) -> Result<(), PauseError> {
        (**self).pause(duration).await
    }
}

/// Pacer backed by the tokio timer.
///
/// On a current-thread runtime the run is blocked for the whole pause, the
/// same as a thread sleep.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPacer;

impl Pacer for TokioPacer {
    async fn pause(&mut self, duration: Duration) -> Result<(), PauseError> {
        tokio::time::sleep(duration).await;
        Ok(())
    }
}
