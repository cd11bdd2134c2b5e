// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fade engine.
//!
//! Moves a [`Store`] from its current value to `current + delta`, either in
//! one write or as a linear sequence of intermediate writes paced over the
//! duration of a [`FadePolicy`].
//!
//! # Algorithm
//!
//! 1. `step = round(delta * step_fraction)`, or `sign(delta)` when that is
//!    zero.
//! 2. `delay = duration / (delta / step)`.
//! 3. Repeat `position += step`. Once `position` reaches or passes the
//!    target, the target itself is written and the fade ends. Otherwise
//!    `position` is written and the engine pauses for `delay`.
//!
//! The final write always lands on the exact target, whatever rounding did
//! to the intermediate steps.

mod pacer;

pub use pacer::{Pacer, PauseError, TokioPacer};

use std::time::Duration;

use crate::error::{FadeError, TimerError};
use crate::store::Store;
use crate::types::{BrightnessRange, FadePolicy};

/// Result of a successful [`FadeEngine::fade_to`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeOutcome {
    /// The change was zero; the store was not touched.
    Unchanged,
    /// The target lies outside the valid range; the store was not touched.
    OutOfRange {
        /// The rejected target.
        target: i64,
    },
    /// The store now holds `target`.
    Written {
        /// The value of the final write.
        target: u32,
        /// Bytes written by the final write.
        bytes: usize,
        /// Number of writes performed, the final one included.
        writes: usize,
    },
}

impl FadeOutcome {
    /// Returns the bytes written by the final write, or zero when nothing
    /// was written.
    #[must_use]
    pub const fn bytes_written(&self) -> usize {
        match self {
            Self::Written { bytes, .. } => *bytes,
            Self::Unchanged | Self::OutOfRange { .. } => 0,
        }
    }

    /// Returns whether the store was changed.
    #[must_use]
    pub const fn is_written(&self) -> bool {
        matches!(self, Self::Written { .. })
    }
}

/// Drives brightness transitions through a [`Store`].
///
/// # Examples
///
/// ```
/// use backlight::fade::{FadeEngine, FadeOutcome};
/// use backlight::store::MemoryStore;
/// use backlight::types::{BrightnessRange, FadePolicy};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let store = MemoryStore::new(10);
/// let range = BrightnessRange::new(1, 100).unwrap();
/// let mut engine = FadeEngine::new(FadePolicy::new(0.0, 10));
///
/// let outcome = engine.fade_to(&store, 10, -5, range).await.unwrap();
/// assert!(matches!(outcome, FadeOutcome::Written { target: 5, .. }));
/// assert_eq!(store.writes(), vec![9, 8, 7, 6, 5]);
/// # }
/// ```
#[derive(Debug)]
pub struct FadeEngine<P = TokioPacer> {
    policy: FadePolicy,
    pacer: P,
}

impl FadeEngine<TokioPacer> {
    /// Creates an engine paced by the tokio timer.
    #[must_use]
    pub fn new(policy: FadePolicy) -> Self {
        Self::with_pacer(policy, TokioPacer)
    }
}

impl<P: Pacer> FadeEngine<P> {
    /// Creates an engine with a custom pacer.
    #[must_use]
    pub fn with_pacer(policy: FadePolicy, pacer: P) -> Self {
        Self { policy, pacer }
    }

    /// Returns the policy used by this engine.
    #[must_use]
    pub fn policy(&self) -> FadePolicy {
        self.policy
    }

    /// Returns the pacer.
    #[must_use]
    pub fn pacer(&self) -> &P {
        &self.pacer
    }

    /// Transitions `store` from `current` to `current + delta`.
    ///
    /// `delta` must already be clamped by the caller. A target outside
    /// `range` is reported as [`FadeOutcome::OutOfRange`] without any write.
    /// A policy outside its valid ranges disables fading and the target is
    /// written once.
    ///
    /// # Errors
    ///
    /// Returns `FadeError::Write` as soon as any write fails, leaving the
    /// store at the last value written, or `FadeError::Timer` if a pause
    /// fails for a reason other than interruption.
    pub async fn fade_to<S: Store + ?Sized>(
        &mut self,
        store: &S,
        current: u32,
        delta: i32,
        range: BrightnessRange,
    ) -> Result<FadeOutcome, FadeError> {
        if delta == 0 {
            return Ok(FadeOutcome::Unchanged);
        }

        let target = i64::from(current) + i64::from(delta);
        if !range.contains(target) {
            tracing::debug!(current, delta, %range, "Target out of range, nothing to do");
            return Ok(FadeOutcome::OutOfRange { target });
        }
        let target = range.clamp(target);

        if !self.policy.is_enabled() {
            tracing::debug!(policy = %self.policy, "Fading disabled, writing target directly");
            let bytes = store
                .write(target)
                .inspect_err(|e| tracing::warn!(to = target, error = %e, "Write failed"))?;
            return Ok(FadeOutcome::Written {
                target,
                bytes,
                writes: 1,
            });
        }

        self.run(store, current, delta, target, range).await
    }

    async fn run<S: Store + ?Sized>(
        &mut self,
        store: &S,
        current: u32,
        delta: i32,
        target: u32,
        range: BrightnessRange,
    ) -> Result<FadeOutcome, FadeError> {
        let step = self.policy.step(delta);
        let delay = self.policy.inter_step_delay(delta, step);
        tracing::debug!(current, to = target, step, ?delay, "Starting fade");

        let end = i64::from(target);
        let mut position = i64::from(current);
        let mut writes = 0;

        loop {
            position += i64::from(step);
            writes += 1;

            let reached = if step > 0 {
                position >= end
            } else {
                position <= end
            };
            if reached {
                let bytes = store.write(target).inspect_err(|e| {
                    tracing::warn!(to = target, error = %e, "Final fade write failed");
                })?;
                tracing::info!(to = target, writes, "Fade complete");
                return Ok(FadeOutcome::Written {
                    target,
                    bytes,
                    writes,
                });
            }

            // Strictly between current and target, so always inside range
            let value = range.clamp(position);
            store
                .write(value)
                .inspect_err(|e| tracing::warn!(value, error = %e, "Fade step write failed"))?;
            tracing::trace!(value, "Fade step");

            self.pause(delay).await?;
        }
    }

    /// Pauses for `duration`, resuming after interruptions.
    async fn pause(&mut self, duration: Duration) -> Result<(), TimerError> {
        let mut remaining = duration;
        loop {
            match self.pacer.pause(remaining).await {
                Ok(()) => return Ok(()),
                Err(PauseError::Interrupted { remaining: left }) => {
                    tracing::warn!(remaining = ?left, "Pause interrupted, resuming");
                    remaining = left;
                }
                Err(PauseError::Failed(source)) => return Err(TimerError { source }),
            }
        }
    }
}
