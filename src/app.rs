// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! One program run.
//!
//! A run holds the run lock from start to finish: it reads the maximum and
//! current brightness, probes write permission, resolves the request,
//! optionally notifies, then hands the change to the fade engine.

use std::path::PathBuf;

use crate::config::{Config, Paths};
use crate::error::{Error, FadeError, Result};
use crate::fade::{FadeEngine, FadeOutcome, Pacer};
use crate::lock::RunLock;
use crate::notify::{Icon, Notifier};
use crate::request::{self, Request, Resolution};
use crate::store::{Store, SysfsFile};
use crate::types::BrightnessRange;

/// How much the run prints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Verbosity {
    /// Nothing is printed.
    Quiet,
    /// Results are printed.
    #[default]
    Normal,
    /// Results and diagnostics are printed.
    Verbose,
}

/// Everything the command line asks of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    /// The brightness request.
    pub request: Request,
    /// Output level.
    pub verbosity: Verbosity,
    /// Send a desktop notification on change.
    pub notify: bool,
    /// Print only the icon path.
    pub icon_path: bool,
}

impl Options {
    /// Returns whether the run only reports the current state.
    ///
    /// That is the case when no directive and no flag at all was given.
    #[must_use]
    pub fn is_status_query(&self) -> bool {
        self.request == Request::default()
            && self.verbosity == Verbosity::Normal
            && !self.notify
            && !self.icon_path
    }

    /// Returns whether diagnostics are requested.
    #[must_use]
    pub fn is_verbose(&self) -> bool {
        self.verbosity == Verbosity::Verbose
    }
}

/// What happened to the brightness file.
#[derive(Debug)]
pub enum WriteStatus {
    /// Nothing needed writing.
    Skipped,
    /// The write probe failed, so nothing was attempted.
    Unwritable,
    /// The fade engine ran.
    Done(FadeOutcome),
    /// The fade engine aborted.
    Failed(FadeError),
}

/// Result of a run that considered a change.
#[derive(Debug)]
pub struct ChangeSummary {
    /// Hardware maximum.
    pub max: u32,
    /// The resolved request.
    pub resolution: Resolution,
    /// Icon matching the target brightness, when it was needed.
    pub icon_path: Option<PathBuf>,
    /// Whether a notification was shown.
    pub notified: bool,
    /// What happened to the brightness file.
    pub status: WriteStatus,
}

impl ChangeSummary {
    /// Returns the brightness the device ends the run with, as far as this
    /// run knows.
    #[must_use]
    pub fn brightness(&self) -> u32 {
        match self.status {
            WriteStatus::Done(FadeOutcome::Written { target, .. }) => target,
            _ => self.resolution.current,
        }
    }

    /// Returns whether the run succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        !matches!(self.status, WriteStatus::Unwritable | WriteStatus::Failed(_))
    }
}

/// Result of a run.
#[derive(Debug)]
pub enum Summary {
    /// Only the state was queried.
    Status {
        /// Hardware maximum.
        max: u32,
        /// Current brightness.
        current: u32,
    },
    /// A change was considered.
    Change(ChangeSummary),
}

impl Summary {
    /// Returns whether the run succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        match self {
            Self::Status { .. } => true,
            Self::Change(change) => change.is_success(),
        }
    }
}

/// Runs brightness requests against one backlight device.
#[derive(Debug, Clone)]
pub struct App {
    config: Config,
    paths: Paths,
}

impl App {
    /// Creates an app from a configuration and its resolved paths.
    #[must_use]
    pub fn new(config: Config, paths: Paths) -> Self {
        Self { config, paths }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the resolved paths.
    #[must_use]
    pub fn paths(&self) -> &Paths {
        &self.paths
    }

    /// Performs one run with the configured fade policy.
    ///
    /// # Errors
    ///
    /// See [`run_with`](Self::run_with).
    pub async fn run(&self, options: &Options) -> Result<Summary> {
        self.run_with(options, FadeEngine::new(self.config.fade)).await
    }

    /// Performs one run with a given fade engine.
    ///
    /// Write failures during the fade are not errors; they are reported in
    /// the summary.
    ///
    /// # Errors
    ///
    /// Returns an error if the run lock cannot be taken, the maximum or
    /// current brightness cannot be read, the current value exceeds the
    /// maximum, or the brightness file is not writable while neither
    /// verbose output nor the icon path was requested.
    pub async fn run_with<P: Pacer>(
        &self,
        options: &Options,
        mut engine: FadeEngine<P>,
    ) -> Result<Summary> {
        let lock = RunLock::acquire_exclusive(&self.paths.lock)?;
        let summary = self.run_locked(options, &mut engine).await?;
        lock.release()?;
        Ok(summary)
    }

    async fn run_locked<P: Pacer>(
        &self,
        options: &Options,
        engine: &mut FadeEngine<P>,
    ) -> Result<Summary> {
        let brightness = SysfsFile::new(&self.paths.brightness);
        let max = SysfsFile::new(&self.paths.max_brightness).read()?;
        let current = brightness.read()?;
        if current > max {
            return Err(Error::CurrentAboveMax { current, max });
        }

        if options.is_status_query() {
            return Ok(Summary::Status { max, current });
        }

        let range = BrightnessRange::new(self.config.lower_limit.min(max), max)?;

        let writable = match brightness.check_writable() {
            Ok(()) => true,
            Err(source) if !options.is_verbose() && !options.icon_path => {
                return Err(Error::NotWritable {
                    path: self.paths.brightness.clone(),
                    source,
                });
            }
            Err(e) => {
                tracing::debug!(error = %e, "Write probe failed");
                false
            }
        };

        let cache = SysfsFile::new(&self.paths.cache);
        let resolution = request::resolve(options.request, current, range, &cache)?;

        let icon_path = (options.is_verbose() || options.notify || options.icon_path)
            .then(|| Icon::for_level(resolution.target, max).path_in(&self.paths.icon_dir));

        let mut notified = false;
        if let Some(icon) = &icon_path
            && options.notify
            && writable
            && resolution.is_change()
        {
            let notifier = Notifier::new(self.config.notification.clone());
            notified = notifier
                .send(icon, rounded_percent(range, resolution.target), &resolution.description())
                .await;
        }

        let status = if !writable {
            WriteStatus::Unwritable
        } else if resolution.is_change() || options.is_verbose() {
            match engine
                .fade_to(&brightness, current, resolution.delta, resolution.range)
                .await
            {
                Ok(outcome) => WriteStatus::Done(outcome),
                Err(e) => {
                    tracing::warn!(error = %e, code = e.code(), "Brightness change aborted");
                    WriteStatus::Failed(e)
                }
            }
        } else {
            WriteStatus::Skipped
        };

        Ok(Summary::Change(ChangeSummary {
            max,
            resolution,
            icon_path,
            notified,
            status,
        }))
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn rounded_percent(range: BrightnessRange, value: u32) -> u32 {
    // Safe: value <= max, so the percentage is within [0, 100]
    range.percent_of(value).round() as u32
}
