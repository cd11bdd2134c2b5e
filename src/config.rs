// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Configuration and path discovery.
//!
//! Every field has a default, so an absent or partial configuration file is
//! valid. The file lives at `$XDG_CONFIG_HOME/backlight/config.json`.
//!
//! ```json
//! {
//!   "device": "intel_backlight",
//!   "lower_limit": 1,
//!   "fade": { "step_fraction": 0.1, "duration_ms": 170 },
//!   "notification": { "program": "notify-send", "timeout_ms": 500 }
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::FadePolicy;

/// File name of the toggle cache kept next to the executable.
pub const CACHE_FILE_NAME: &str = "prev_brightness";

/// Resolved configuration for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding one subdirectory per backlight device.
    pub backlight_dir: PathBuf,
    /// Device directory name. The first device in sorted order when unset.
    pub device: Option<String>,
    /// Name of the current brightness file inside the device directory.
    pub brightness_file: String,
    /// Name of the maximum brightness file inside the device directory.
    pub max_brightness_file: String,
    /// Lock file serializing concurrent runs.
    pub lock_path: PathBuf,
    /// Toggle cache. Next to the executable when unset.
    pub cache_path: Option<PathBuf>,
    /// Directory holding notification icons. The executable's directory
    /// when unset.
    pub icon_dir: Option<PathBuf>,
    /// Lowest brightness reachable without `--toggle`, in native units.
    pub lower_limit: u32,
    /// Fade transition policy.
    pub fade: FadePolicy,
    /// Desktop notification settings.
    pub notification: NotificationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backlight_dir: PathBuf::from("/sys/class/backlight"),
            device: None,
            brightness_file: "brightness".to_string(),
            max_brightness_file: "max_brightness".to_string(),
            lock_path: PathBuf::from("/tmp/brightLOCK"),
            cache_path: None,
            icon_dir: None,
            lower_limit: 1,
            fade: FadePolicy::DEFAULT,
            notification: NotificationConfig::default(),
        }
    }
}

/// Desktop notification settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Notification program, invoked with `notify-send` arguments.
    pub program: String,
    /// How long the notification stays visible, in milliseconds.
    pub timeout_ms: u32,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            program: "notify-send".to_string(),
            timeout_ms: 500,
        }
    }
}

/// Concrete file locations used by a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    /// Current brightness file.
    pub brightness: PathBuf,
    /// Maximum brightness file.
    pub max_brightness: PathBuf,
    /// Toggle cache file.
    pub cache: PathBuf,
    /// Directory holding notification icons.
    pub icon_dir: PathBuf,
    /// Lock file.
    pub lock: PathBuf,
    /// Directory holding the executable.
    pub program_dir: PathBuf,
}

impl Config {
    /// Returns the default configuration file path.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut path| {
            path.push("backlight");
            path.push("config.json");
            path
        })
    }

    /// Loads the configuration from the default path.
    ///
    /// Returns the default configuration if the file doesn't exist or can't
    /// be parsed.
    #[must_use]
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            tracing::debug!("Could not determine config directory, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring config file");
                Self::default()
            }
        }
    }

    /// Loads the configuration from `path`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be read, or
    /// `ConfigError::Json` if it is not a valid configuration.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&contents).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Resolves file locations relative to the running executable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ProgramDir` if the executable's directory is
    /// unknown, or `ConfigError::NoDevice` if no backlight device exists.
    pub fn resolve_paths(&self) -> Result<Paths, ConfigError> {
        self.resolve_paths_in(&program_dir()?)
    }

    /// Resolves file locations with `program_dir` standing in for the
    /// executable's directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoDevice` if no backlight device exists.
    pub fn resolve_paths_in(&self, program_dir: &Path) -> Result<Paths, ConfigError> {
        let device_dir = match &self.device {
            Some(name) => self.backlight_dir.join(name),
            None => self.first_device()?,
        };

        Ok(Paths {
            brightness: device_dir.join(&self.brightness_file),
            max_brightness: device_dir.join(&self.max_brightness_file),
            cache: self
                .cache_path
                .clone()
                .unwrap_or_else(|| program_dir.join(CACHE_FILE_NAME)),
            icon_dir: self
                .icon_dir
                .clone()
                .unwrap_or_else(|| program_dir.to_path_buf()),
            lock: self.lock_path.clone(),
            program_dir: program_dir.to_path_buf(),
        })
    }

    fn first_device(&self) -> Result<PathBuf, ConfigError> {
        let entries = fs::read_dir(&self.backlight_dir)
            .map_err(|_| ConfigError::NoDevice(self.backlight_dir.clone()))?;

        let mut devices: Vec<PathBuf> = entries
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .collect();
        devices.sort();

        let device = devices
            .into_iter()
            .next()
            .ok_or_else(|| ConfigError::NoDevice(self.backlight_dir.clone()))?;
        tracing::debug!(device = %device.display(), "Discovered backlight device");
        Ok(device)
    }
}

/// Returns the directory holding the running executable.
///
/// # Errors
///
/// Returns `ConfigError::ProgramDir` if the path of the executable cannot be
/// determined.
pub fn program_dir() -> Result<PathBuf, ConfigError> {
    let exe = std::env::current_exe().map_err(ConfigError::ProgramDir)?;
    let exe = exe.canonicalize().unwrap_or(exe);
    exe.parent().map(Path::to_path_buf).ok_or_else(|| {
        ConfigError::ProgramDir(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "executable has no parent directory",
        ))
    })
}
