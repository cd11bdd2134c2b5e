// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for brightness control.
//!
//! # Types
//!
//! - [`BrightnessRange`] - The valid `[lower, max]` window for a device
//! - [`FadePolicy`] - Step fraction and duration of a fade transition

mod fade_policy;
mod range;

pub use fade_policy::FadePolicy;
pub use range::BrightnessRange;
