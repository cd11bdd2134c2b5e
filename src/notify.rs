// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Icons and desktop notifications.

use std::fmt;
use std::path::{Path, PathBuf};

use tokio::process::Command;

use crate::config::NotificationConfig;

/// Brightness icon, one of five bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Icon {
    /// Band 0.
    Off,
    /// Band 1.
    Low,
    /// Band 2.
    Medium,
    /// Band 3.
    High,
    /// Band 4.
    Full,
}

impl Icon {
    /// Picks the band for `brightness` out of `max`, as
    /// `round(4.4 * brightness / max)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use backlight::notify::Icon;
    ///
    /// assert_eq!(Icon::for_level(0, 852), Icon::Off);
    /// assert_eq!(Icon::for_level(426, 852), Icon::Medium);
    /// assert_eq!(Icon::for_level(852, 852), Icon::Full);
    /// ```
    #[must_use]
    pub fn for_level(brightness: u32, max: u32) -> Self {
        if max == 0 {
            return Self::Off;
        }
        let band = (4.4 * f64::from(brightness) / f64::from(max)).round();
        match band {
            b if b < 0.5 => Self::Off,
            b if b < 1.5 => Self::Low,
            b if b < 2.5 => Self::Medium,
            b if b < 3.5 => Self::High,
            _ => Self::Full,
        }
    }

    /// Returns the band name used in icon file names.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Full => "full",
        }
    }

    /// Returns the icon file inside `dir`.
    #[must_use]
    pub fn path_in(&self, dir: &Path) -> PathBuf {
        dir.join(format!("notification-display-brightness-{}.png", self.name()))
    }
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sends brightness notifications through an external program.
///
/// Failures are logged and swallowed; a notification never affects the
/// outcome of a brightness change.
#[derive(Debug, Clone)]
pub struct Notifier {
    config: NotificationConfig,
}

impl Notifier {
    /// Creates a notifier from its configuration.
    #[must_use]
    pub fn new(config: NotificationConfig) -> Self {
        Self { config }
    }

    /// Returns the program arguments for a notification.
    #[must_use]
    pub fn arguments(&self, icon: &Path, percent: u32, description: &str) -> Vec<String> {
        vec![
            "-t".to_string(),
            self.config.timeout_ms.to_string(),
            "-i".to_string(),
            icon.display().to_string(),
            "-h".to_string(),
            "int:transient:1".to_string(),
            "-h".to_string(),
            format!("int:value:{percent}"),
            "-h".to_string(),
            "string:synchronous:brightness".to_string(),
            format!("Brightness {description}"),
        ]
    }

    /// Shows a notification. Returns whether the program ran successfully.
    pub async fn send(&self, icon: &Path, percent: u32, description: &str) -> bool {
        let result = Command::new(&self.config.program)
            .args(self.arguments(icon, percent, description))
            .kill_on_drop(true)
            .status()
            .await;

        match result {
            Ok(status) if status.success() => {
                tracing::debug!(program = %self.config.program, "Notification sent");
                true
            }
            Ok(status) => {
                tracing::warn!(
                    program = %self.config.program,
                    %status,
                    "Notification program failed"
                );
                false
            }
            Err(e) => {
                tracing::warn!(
                    program = %self.config.program,
                    error = %e,
                    "Could not run notification program"
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icon_bands() {
        assert_eq!(Icon::for_level(0, 100), Icon::Off);
        assert_eq!(Icon::for_level(11, 100), Icon::Off);
        assert_eq!(Icon::for_level(12, 100), Icon::Low);
        assert_eq!(Icon::for_level(50, 100), Icon::Medium);
        assert_eq!(Icon::for_level(70, 100), Icon::High);
        assert_eq!(Icon::for_level(80, 100), Icon::Full);
        assert_eq!(Icon::for_level(100, 100), Icon::Full);
    }

    #[test]
    fn icon_path() {
        let path = Icon::High.path_in(Path::new("/usr/share/backlight"));
        assert_eq!(
            path,
            PathBuf::from("/usr/share/backlight/notification-display-brightness-high.png")
        );
    }

    #[test]
    fn notification_arguments() {
        let notifier = Notifier::new(NotificationConfig::default());
        let args = notifier.arguments(Path::new("/i.png"), 50, "Set to 426 (50%)");
        assert_eq!(
            args,
            vec![
                "-t",
                "500",
                "-i",
                "/i.png",
                "-h",
                "int:transient:1",
                "-h",
                "int:value:50",
                "-h",
                "string:synchronous:brightness",
                "Brightness Set to 426 (50%)",
            ]
        );
    }

    #[tokio::test]
    async fn missing_program_is_not_fatal() {
        let notifier = Notifier::new(NotificationConfig {
            program: "/nonexistent/notify-send".to_string(),
            timeout_ms: 500,
        });
        assert!(!notifier.send(Path::new("/i.png"), 10, "Set to 1").await);
    }
}
