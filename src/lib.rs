// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Backlight - read, set and fade the Linux display backlight.
//!
//! The library drives one sysfs backlight device
//! (`/sys/class/backlight/<device>/brightness`), moving it towards a target
//! in small timed steps so the change looks smooth.
//!
//! # Supported Operations
//!
//! - **Status**: Print the maximum and current brightness
//! - **Relative change**: Increment or decrement in native units or percent
//! - **Absolute change**: Set a native or percentage value
//! - **Toggle**: Switch off remembering the current value, then restore it
//! - **Notifications**: Desktop notification with a level icon
//!
//! # Quick Start
//!
//! ```no_run
//! use backlight::app::{App, Options};
//! use backlight::request::{Directive, Request};
//! use backlight::Config;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> backlight::Result<()> {
//!     let config = Config::load();
//!     let paths = config.resolve_paths()?;
//!     let app = App::new(config, paths);
//!
//!     let options = Options {
//!         request: Request::new(Directive::Increment(10)).in_percent(),
//!         ..Options::default()
//!     };
//!     let summary = app.run(&options).await?;
//!     println!("success: {}", summary.is_success());
//!     Ok(())
//! }
//! ```
//!
//! ## Fading a store directly
//!
//! ```no_run
//! use backlight::fade::FadeEngine;
//! use backlight::store::SysfsFile;
//! use backlight::types::{BrightnessRange, FadePolicy};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let file = SysfsFile::new("/sys/class/backlight/intel_backlight/brightness");
//! let range = BrightnessRange::new(1, 852)?;
//!
//! let mut engine = FadeEngine::new(FadePolicy::DEFAULT);
//! engine.fade_to(&file, 100, 50, range).await?;
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod fade;
pub mod lock;
pub mod notify;
pub mod report;
pub mod request;
pub mod store;
pub mod types;

pub use app::{App, Options, Summary, Verbosity};
pub use config::{Config, NotificationConfig, Paths};
pub use error::{
    ConfigError, Error, FadeError, LockError, ProbeError, ReadError, Result, TimerError,
    ValueError, WriteError,
};
pub use fade::{FadeEngine, FadeOutcome};
pub use request::{Directive, Request};
pub use types::{BrightnessRange, FadePolicy};
