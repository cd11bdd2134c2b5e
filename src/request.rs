// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Request resolution.
//!
//! Turns one command-line directive into the clamped `(current, delta)`
//! pair handed to the [`FadeEngine`](crate::fade::FadeEngine), together with
//! the range the engine must respect and a human-readable description.

use std::fmt;

use crate::error::ValueError;
use crate::store::Store;
use crate::types::BrightnessRange;

/// One brightness directive. At most one is given per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// Raise brightness by this many units (or percent).
    Increment(u32),
    /// Lower brightness by this many units (or percent).
    Decrement(u32),
    /// Set brightness to this many units (or percent).
    Set(u32),
    /// Switch off, remembering the current value, or restore it.
    Toggle,
}

/// A directive and how to interpret its value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Request {
    /// The requested change, if any.
    pub directive: Option<Directive>,
    /// Interpret the directive value as a percentage of the maximum.
    pub percent: bool,
}

impl Request {
    /// Creates a request for `directive` in native units.
    #[must_use]
    pub const fn new(directive: Directive) -> Self {
        Self {
            directive: Some(directive),
            percent: false,
        }
    }

    /// Interprets the directive value as a percentage.
    #[must_use]
    pub const fn in_percent(mut self) -> Self {
        self.percent = true;
        self
    }
}

/// What a resolved request does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// No directive was given.
    None,
    /// Brightness goes up.
    Incremented,
    /// Brightness goes down.
    Decremented,
    /// Brightness goes to an absolute value.
    Set,
    /// The cached value is restored.
    ToggledOn,
    /// The current value is cached and brightness goes to zero.
    ToggledOff,
    /// The current value could not be cached, so nothing changes.
    ToggleAborted,
}

impl Action {
    /// Returns the prefix of the description for this action.
    #[must_use]
    pub const fn prefix(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::Incremented => "Incremented by ",
            Self::Decremented => "Decremented by ",
            Self::Set => "Set to ",
            Self::ToggledOn => "Toggled on, set to ",
            Self::ToggledOff => "Toggled off, saved previous brightness as ",
            Self::ToggleAborted => "Couldn't store current brightness, aborting toggle",
        }
    }
}

/// Why a directive produced no change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    /// Brightness is already at the maximum.
    Maximum,
    /// Brightness is already at the lower limit.
    Minimum,
    /// The requested value equals the current one.
    NoChange,
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Maximum => write!(f, "Reached maximum brightness"),
            Self::Minimum => write!(f, "Reached minimum brightness"),
            Self::NoChange => write!(f, "No change in brightness"),
        }
    }
}

/// A request resolved against the device state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Brightness before the change.
    pub current: u32,
    /// Brightness after the change, clamped into `range`.
    pub target: u32,
    /// `target - current`.
    pub delta: i32,
    /// What the request does.
    pub action: Action,
    /// The range the fade engine must respect. Its floor is zero on the
    /// toggle-off path.
    pub range: BrightnessRange,
    /// Whether values are shown as percentages.
    pub percent: bool,
    directive: Option<Directive>,
}

impl Resolution {
    /// Returns whether the resolution changes brightness.
    #[must_use]
    pub const fn is_change(&self) -> bool {
        self.delta != 0
    }

    /// Returns the directive this resolution came from.
    #[must_use]
    pub const fn directive(&self) -> Option<Directive> {
        self.directive
    }

    /// Describes the change, e.g. `"Incremented by 85 (10%)"`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn description(&self) -> String {
        match self.action {
            Action::None => return String::new(),
            Action::ToggleAborted => return self.action.prefix().to_string(),
            _ => {}
        }

        let amount = match self.action {
            Action::Set => self.target,
            _ => self.delta.unsigned_abs(),
        };
        let mut text = format!("{}{amount}", self.action.prefix());
        if self.percent {
            // Safe: amount <= max, so the percentage is within [0, 100]
            let percent = self.range.percent_of(amount).ceil() as u32;
            text.push_str(&format!(" ({percent}%)"));
        }
        text
    }

    /// Returns why a directive produced no change, or `None` when the
    /// brightness changes or no directive was given.
    ///
    /// A set above the maximum, in units or percent, counts as reaching the
    /// maximum. An aborted toggle counts as reaching the minimum.
    #[must_use]
    pub fn limit(&self) -> Option<Limit> {
        if self.is_change() {
            return None;
        }
        let limit = match self.directive? {
            Directive::Increment(_) => Limit::Maximum,
            Directive::Set(value) if value > self.range.max() || (self.percent && value > 100) => {
                Limit::Maximum
            }
            Directive::Decrement(_) | Directive::Set(0) | Directive::Toggle => Limit::Minimum,
            Directive::Set(_) => Limit::NoChange,
        };
        Some(limit)
    }
}

/// Resolves `request` against the current brightness.
///
/// Toggling off writes `current` to `cache`; toggling on reads it back,
/// treating a missing or zero cache as `1`. The resulting target is clamped
/// into `range`, except that toggling off may reach zero.
///
/// # Errors
///
/// Returns `ValueError::OutOfRange` if `current` exceeds the range maximum.
///
/// # Examples
///
/// ```
/// use backlight::request::{resolve, Directive, Request};
/// use backlight::store::MemoryStore;
/// use backlight::types::BrightnessRange;
///
/// let range = BrightnessRange::new(1, 852).unwrap();
/// let cache = MemoryStore::empty();
///
/// let request = Request::new(Directive::Increment(10)).in_percent();
/// let resolution = resolve(request, 400, range, &cache).unwrap();
/// assert_eq!(resolution.target, 485);
/// assert_eq!(resolution.description(), "Incremented by 85 (10%)");
/// ```
pub fn resolve<S: Store + ?Sized>(
    request: Request,
    current: u32,
    range: BrightnessRange,
    cache: &S,
) -> Result<Resolution, ValueError> {
    if current > range.max() {
        return Err(ValueError::OutOfRange {
            min: 0,
            max: range.max(),
            actual: current,
        });
    }

    let units = |value: u32| {
        if request.percent {
            range.units_from_percent(value)
        } else {
            i64::from(value)
        }
    };
    let now = i64::from(current);

    let (requested, action) = match request.directive {
        None => (now, Action::None),
        Some(Directive::Increment(value)) => (now + units(value), Action::Incremented),
        Some(Directive::Decrement(value)) => (now - units(value), Action::Decremented),
        Some(Directive::Set(value)) => (units(value), Action::Set),
        Some(Directive::Toggle) if current == 0 => {
            let cached = cache.read().map_or_else(
                |e| {
                    tracing::debug!(error = %e, "No cached brightness, restoring to 1");
                    1
                },
                |value| value.max(1),
            );
            (i64::from(cached), Action::ToggledOn)
        }
        Some(Directive::Toggle) => match cache.write(current) {
            Ok(_) => (0, Action::ToggledOff),
            Err(e) => {
                tracing::warn!(error = %e, "Could not cache brightness, aborting toggle");
                (now, Action::ToggleAborted)
            }
        },
    };

    let range = if action == Action::ToggledOff {
        range.with_floor(0)
    } else {
        range
    };
    let target = range.clamp(requested);
    let delta = i32::try_from(i64::from(target) - now).map_err(|_| ValueError::OutOfRange {
        min: 0,
        max: range.max(),
        actual: target,
    })?;

    tracing::debug!(current, target, delta, ?action, "Resolved request");
    Ok(Resolution {
        current,
        target,
        delta,
        action,
        range,
        percent: request.percent,
        directive: request.directive,
    })
}
