// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Text printed at the end of a run.

use crate::app::{ChangeSummary, Options, Summary, Verbosity, WriteStatus};
use crate::config::Paths;
use crate::error::{Error, FadeError};
use crate::fade::FadeOutcome;
use crate::request::{Action, Limit};

/// Renders the lines printed for `summary`.
///
/// `--iconpath` prints only the icon path and `--quiet` prints nothing.
#[must_use]
pub fn render(summary: &Summary, options: &Options, paths: &Paths) -> Vec<String> {
    match summary {
        Summary::Status { max, current } => vec![
            format!("Max brightness = {max}"),
            format!("Current brightness = {current}"),
        ],
        Summary::Change(change) => {
            if options.icon_path {
                return change
                    .icon_path
                    .iter()
                    .map(|path| path.display().to_string())
                    .collect();
            }
            match options.verbosity {
                Verbosity::Quiet => Vec::new(),
                Verbosity::Normal => render_normal(change),
                Verbosity::Verbose => render_verbose(change, options, paths),
            }
        }
    }
}

/// Renders the lines printed to stderr when a run fails.
///
/// Everything but a failed permission probe is already logged, so only that
/// case prints a hint.
#[must_use]
pub fn render_error(error: &Error, options: &Options) -> Vec<String> {
    match error {
        Error::NotWritable { .. } if options.verbosity != Verbosity::Quiet => vec![
            "Unable to set brightness, check permissions. -v for more info. Exiting..."
                .to_string(),
        ],
        _ => Vec::new(),
    }
}

fn render_normal(change: &ChangeSummary) -> Vec<String> {
    let mut lines = Vec::new();
    if change.resolution.action == Action::ToggleAborted {
        lines.push(change.resolution.description());
    }

    match &change.status {
        WriteStatus::Unwritable | WriteStatus::Failed(_) => {
            lines.push("Unable to set brightness, -v for more info. Exiting...".to_string());
        }
        WriteStatus::Done(FadeOutcome::Written { .. }) => {
            lines.push(format!("Max brightness = {}", change.max));
            lines.push(current_line(change));
            lines.push(change.resolution.description());
        }
        WriteStatus::Done(_) | WriteStatus::Skipped => match change.resolution.limit() {
            Some(Limit::Maximum) => {
                lines.push(format!("{}: {}", Limit::Maximum, change.max));
            }
            Some(Limit::Minimum) => lines.push(minimum_line(change)),
            Some(Limit::NoChange) | None => {}
        },
    }
    lines
}

fn render_verbose(change: &ChangeSummary, options: &Options, paths: &Paths) -> Vec<String> {
    let (passive, non_passive) = argument_counts(options);
    let mut lines = vec![
        format!("Arguments parsed = {passive} Passive, {non_passive} NonPassive"),
        format!("Path = {}", paths.program_dir.display()),
        format!(
            "Icon path = {}",
            change
                .icon_path
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_default()
        ),
    ];
    if change.resolution.action == Action::ToggleAborted {
        lines.push(change.resolution.description());
    }
    lines.push(format!("Max brightness = {}", change.max));
    lines.push(current_line(change));

    match &change.status {
        WriteStatus::Done(FadeOutcome::Written { bytes, .. }) => {
            lines.push(format!("Characters written = {bytes}"));
            lines.push(change.resolution.description());
        }
        WriteStatus::Done(_) | WriteStatus::Skipped => {
            let line = match change.resolution.limit() {
                Some(Limit::Maximum) => Limit::Maximum.to_string(),
                Some(Limit::Minimum) => minimum_line(change),
                Some(Limit::NoChange) | None => Limit::NoChange.to_string(),
            };
            lines.push(line);
        }
        WriteStatus::Unwritable | WriteStatus::Failed(FadeError::Write(_)) => {
            let program = paths.program_dir.join(env!("CARGO_PKG_NAME"));
            lines.push(format!("Cannot write to {}", paths.brightness.display()));
            lines.push(format!("Make sure {} is owned by root.", program.display()));
            lines.push(format!(
                "If so, try \"sudo chmod u+s {}\"",
                program.display()
            ));
        }
        WriteStatus::Failed(FadeError::Timer(e)) => {
            lines.push(format!("Timer error: {e}"));
        }
    }
    lines
}

/// Counts flags that only shape output, and directives that change brightness.
fn argument_counts(options: &Options) -> (usize, usize) {
    let passive = [
        options.is_verbose(),
        options.notify,
        options.request.percent,
        options.icon_path,
        options.verbosity == Verbosity::Quiet,
    ]
    .into_iter()
    .filter(|set| *set)
    .count();
    (passive, usize::from(options.request.directive.is_some()))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn current_line(change: &ChangeSummary) -> String {
    let brightness = change.brightness();
    if change.resolution.percent {
        // Safe: brightness <= max, so the percentage is within [0, 100]
        let percent = change.resolution.range.percent_of(brightness).ceil() as u32;
        format!("Current brightness = {brightness} ({percent}%)")
    } else {
        format!("Current brightness = {brightness}")
    }
}

fn minimum_line(change: &ChangeSummary) -> String {
    if change.resolution.range.lower() > 0 {
        format!("{}, -t to turn off", Limit::Minimum)
    } else {
        Limit::Minimum.to_string()
    }
}
