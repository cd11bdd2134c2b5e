// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Brightness range type.
//!
//! Backlight hardware reports brightness in native units between zero and a
//! device-specific maximum. A configured lower limit keeps `--dec` and
//! `--set` from switching the panel off.

use std::fmt;

use crate::error::ValueError;

/// The window `[lower, max]` of brightness values a request may produce.
///
/// # Examples
///
/// ```
/// use backlight::types::BrightnessRange;
///
/// let range = BrightnessRange::new(1, 852).unwrap();
/// assert_eq!(range.clamp(900), 852);
/// assert_eq!(range.clamp(-20), 1);
///
/// // The toggle-off path may reach zero
/// assert_eq!(range.with_floor(0).clamp(-20), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BrightnessRange {
    lower: u32,
    max: u32,
}

impl BrightnessRange {
    /// Largest supported hardware maximum, so any change fits an `i32`.
    pub const MAX_SUPPORTED: u32 = i32::MAX.unsigned_abs();

    /// Creates a new range.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::ZeroMaximum` if `max` is zero,
    /// `ValueError::OutOfRange` if `max` exceeds [`MAX_SUPPORTED`](Self::MAX_SUPPORTED),
    /// or `ValueError::InvertedRange` if `lower` exceeds `max`.
    pub fn new(lower: u32, max: u32) -> Result<Self, ValueError> {
        if max == 0 {
            return Err(ValueError::ZeroMaximum);
        }
        if max > Self::MAX_SUPPORTED {
            return Err(ValueError::OutOfRange {
                min: 1,
                max: Self::MAX_SUPPORTED,
                actual: max,
            });
        }
        if lower > max {
            return Err(ValueError::InvertedRange { lower, max });
        }
        Ok(Self { lower, max })
    }

    /// Returns the lowest value a request may produce.
    #[must_use]
    pub const fn lower(&self) -> u32 {
        self.lower
    }

    /// Returns the hardware maximum.
    #[must_use]
    pub const fn max(&self) -> u32 {
        self.max
    }

    /// Returns a copy of this range with a different lower bound.
    ///
    /// Values above `max` are capped to `max`.
    #[must_use]
    pub const fn with_floor(&self, floor: u32) -> Self {
        let lower = if floor > self.max { self.max } else { floor };
        Self {
            lower,
            max: self.max,
        }
    }

    /// Returns whether `value` lies inside the range.
    #[must_use]
    pub fn contains(&self, value: i64) -> bool {
        (i64::from(self.lower)..=i64::from(self.max)).contains(&value)
    }

    /// Clamps a signed target into the range.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn clamp(&self, target: i64) -> u32 {
        // Safe: the clamped value lies within [lower, max], both u32
        target.clamp(i64::from(self.lower), i64::from(self.max)) as u32
    }

    /// Converts a percentage of the maximum into native units.
    ///
    /// The result is rounded to the nearest unit and is not clamped, so
    /// percentages above 100 produce values above `max`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn units_from_percent(&self, percent: u32) -> i64 {
        (f64::from(percent) * f64::from(self.max) / 100.0).round() as i64
    }

    /// Returns `value` as a percentage of the maximum.
    #[must_use]
    pub fn percent_of(&self, value: u32) -> f64 {
        f64::from(value) * 100.0 / f64::from(self.max)
    }
}

impl fmt::Display for BrightnessRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lower, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_valid() {
        let range = BrightnessRange::new(1, 852).unwrap();
        assert_eq!(range.lower(), 1);
        assert_eq!(range.max(), 852);
    }

    #[test]
    fn range_rejects_zero_maximum() {
        assert_eq!(BrightnessRange::new(0, 0), Err(ValueError::ZeroMaximum));
    }

    #[test]
    fn range_rejects_huge_maximum() {
        assert!(BrightnessRange::new(0, u32::MAX).is_err());
        assert!(BrightnessRange::new(0, BrightnessRange::MAX_SUPPORTED).is_ok());
    }

    #[test]
    fn range_rejects_inverted_bounds() {
        assert_eq!(
            BrightnessRange::new(10, 5),
            Err(ValueError::InvertedRange { lower: 10, max: 5 })
        );
    }

    #[test]
    fn range_contains() {
        let range = BrightnessRange::new(1, 100).unwrap();
        assert!(range.contains(1));
        assert!(range.contains(100));
        assert!(!range.contains(0));
        assert!(!range.contains(101));
        assert!(range.with_floor(0).contains(0));
    }

    #[test]
    fn range_with_floor_is_capped() {
        let range = BrightnessRange::new(1, 100).unwrap();
        assert_eq!(range.with_floor(500).lower(), 100);
    }

    #[test]
    fn range_percent_conversions() {
        let range = BrightnessRange::new(1, 852).unwrap();
        assert_eq!(range.units_from_percent(50), 426);
        assert_eq!(range.units_from_percent(10), 85);
        assert_eq!(range.units_from_percent(0), 0);
        assert!((range.percent_of(426) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn range_display() {
        assert_eq!(BrightnessRange::new(1, 852).unwrap().to_string(), "[1, 852]");
    }
}
