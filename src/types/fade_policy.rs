// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fade policy type for brightness transitions.
//!
//! A policy outside its valid ranges is not an error: it disables fading and
//! the transition becomes a single write.

use std::fmt;
use std::ops::RangeInclusive;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How a brightness change is spread over time.
///
/// - `step_fraction` is the share of the total change applied per step.
///   `0.0` means one native unit per step (the smoothest fade), `0.5` means
///   two steps.
/// - `duration_ms` is the wall-clock budget of the whole transition. The
///   real transition takes a little longer because of I/O.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use backlight::types::FadePolicy;
///
/// let policy = FadePolicy::new(0.1, 170);
/// assert!(policy.is_enabled());
///
/// let step = policy.step(50);
/// assert_eq!(step, 5);
/// assert_eq!(policy.inter_step_delay(50, step), Duration::from_millis(17));
///
/// assert!(!FadePolicy::new(0.6, 170).is_enabled());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FadePolicy {
    /// Share of the change applied per step.
    pub step_fraction: f64,
    /// Total duration of the transition in milliseconds.
    pub duration_ms: u32,
}

impl FadePolicy {
    /// Step fractions that enable fading.
    pub const STEP_FRACTION_RANGE: RangeInclusive<f64> = 0.0..=0.5;

    /// Durations (milliseconds) that enable fading.
    pub const DURATION_RANGE: RangeInclusive<u32> = 1..=999;

    /// Ten steps over 170 ms.
    pub const DEFAULT: Self = Self {
        step_fraction: 0.1,
        duration_ms: 170,
    };

    /// A policy that always writes the target in one step.
    pub const DISABLED: Self = Self {
        step_fraction: 0.0,
        duration_ms: 0,
    };

    /// Creates a new fade policy.
    ///
    /// Values are not validated; see [`is_enabled`](Self::is_enabled).
    #[must_use]
    pub const fn new(step_fraction: f64, duration_ms: u32) -> Self {
        Self {
            step_fraction,
            duration_ms,
        }
    }

    /// Returns whether both parameters are inside their valid ranges.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        Self::DURATION_RANGE.contains(&self.duration_ms)
            && Self::STEP_FRACTION_RANGE.contains(&self.step_fraction)
    }

    /// Returns the signed step for a change of `delta` units.
    ///
    /// A zero step fraction, or a fraction that rounds to no movement,
    /// falls back to one unit in the direction of travel.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn step(&self, delta: i32) -> i32 {
        let unit = delta.signum();
        if self.step_fraction > 0.0 {
            // Safe: |delta * fraction| <= |delta| for fractions in [0, 0.5]
            let step = (f64::from(delta) * self.step_fraction).round() as i32;
            if step != 0 {
                return step;
            }
        }
        unit
    }

    /// Returns the pause between two steps.
    ///
    /// The duration is amortized over `delta / step` steps, so the sum of
    /// all pauses approximates `duration_ms`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn inter_step_delay(&self, delta: i32, step: i32) -> Duration {
        if delta == 0 || step == 0 {
            return Duration::ZERO;
        }
        let steps = f64::from(delta) / f64::from(step);
        let nanos = f64::from(self.duration_ms) * 1_000_000.0 / steps;
        // Safe: delta and step share a sign, so nanos is non-negative
        Duration::from_nanos(nanos as u64)
    }
}

impl Default for FadePolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for FadePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} per step over {} ms", self.step_fraction, self.duration_ms)
    }
}
