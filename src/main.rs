// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Backlight command line.
//!
//! Usage:
//!   backlight [OPTIONS]
//!
//! Without options, prints the maximum and current brightness.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgGroup, Parser};
use tracing_subscriber::EnvFilter;

use backlight::app::{App, Options, Verbosity};
use backlight::request::{Directive, Request};
use backlight::{Config, report};

#[derive(Debug, Parser)]
#[command(name = "backlight")]
#[command(version, about = "Read, set and fade the display backlight", long_about = None)]
#[command(group(ArgGroup::new("directive").args(["toggle", "inc", "dec", "set"])))]
struct Cli {
    /// Print diagnostics
    #[arg(short, long, conflicts_with_all = ["quiet", "iconpath"])]
    verbose: bool,

    /// Print nothing
    #[arg(short, long)]
    quiet: bool,

    /// Show a desktop notification
    #[arg(short, long)]
    notify: bool,

    /// Print only the notification icon path
    #[arg(short = 'I', long)]
    iconpath: bool,

    /// Interpret values as a percentage of the maximum
    #[arg(short, long)]
    percent: bool,

    /// Switch off, or restore the brightness saved when switching off
    #[arg(short, long)]
    toggle: bool,

    /// Increment brightness
    #[arg(short, long, value_name = "INT")]
    inc: Option<u32>,

    /// Decrement brightness
    #[arg(short, long, value_name = "INT")]
    dec: Option<u32>,

    /// Set brightness
    #[arg(short, long, value_name = "INT")]
    set: Option<u32>,

    /// Configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log level (overrides `RUST_LOG`)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

impl Cli {
    fn directive(&self) -> Option<Directive> {
        if self.toggle {
            Some(Directive::Toggle)
        } else if let Some(value) = self.inc {
            Some(Directive::Increment(value))
        } else if let Some(value) = self.dec {
            Some(Directive::Decrement(value))
        } else {
            self.set.map(Directive::Set)
        }
    }

    fn options(&self) -> Options {
        let verbosity = if self.verbose {
            Verbosity::Verbose
        } else if self.quiet || self.iconpath {
            Verbosity::Quiet
        } else {
            Verbosity::Normal
        };

        Options {
            request: Request {
                directive: self.directive(),
                percent: self.percent,
            },
            verbosity,
            notify: self.notify,
            icon_path: self.iconpath,
        }
    }
}

fn setup_logging(cli: &Cli) {
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = match &cli.log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run(cli: &Cli, options: &Options) -> backlight::Result<bool> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };
    let paths = config.resolve_paths()?;
    let app = App::new(config, paths);

    let summary = app.run(options).await?;
    for line in report::render(&summary, options, app.paths()) {
        println!("{line}");
    }
    Ok(summary.is_success())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(&cli);
    let options = cli.options();

    match run(&cli, &options).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!(error = %e, "Run failed");
            for line in report::render_error(&e, &options) {
                eprintln!("{line}");
            }
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("backlight").chain(args.iter().copied()))
    }

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_arguments_is_status_query() {
        assert!(parse(&[]).unwrap().options().is_status_query());
    }

    #[test]
    fn percent_increment() {
        let options = parse(&["-p", "-i", "10"]).unwrap().options();
        assert_eq!(
            options.request,
            Request::new(Directive::Increment(10)).in_percent()
        );
        assert_eq!(options.verbosity, Verbosity::Normal);
    }

    #[test]
    fn long_flags() {
        let options = parse(&["--dec", "5", "--notify", "--quiet"]).unwrap().options();
        assert_eq!(options.request, Request::new(Directive::Decrement(5)));
        assert!(options.notify);
        assert_eq!(options.verbosity, Verbosity::Quiet);
    }

    #[test]
    fn iconpath_implies_quiet() {
        let options = parse(&["-I", "-s", "400"]).unwrap().options();
        assert!(options.icon_path);
        assert_eq!(options.verbosity, Verbosity::Quiet);
    }

    #[test]
    fn directives_are_exclusive() {
        assert!(parse(&["-t", "-i", "5"]).is_err());
        assert!(parse(&["-s", "5", "-d", "5"]).is_err());
    }

    #[test]
    fn verbose_conflicts() {
        assert!(parse(&["-v", "-q"]).is_err());
        assert!(parse(&["-v", "-I"]).is_err());
        assert!(parse(&["-v", "-t"]).is_ok());
    }

    #[test]
    fn non_decimal_value_is_rejected() {
        assert!(parse(&["-i", "ten"]).is_err());
        assert!(parse(&["-s", "0x10"]).is_err());
    }
}
