// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests running whole brightness changes against a fake sysfs
//! device directory.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use backlight::app::{App, ChangeSummary, Options, Summary, Verbosity, WriteStatus};
use backlight::fade::{FadeEngine, FadeOutcome, Pacer, PauseError};
use backlight::lock::RunLock;
use backlight::request::{Action, Directive, Limit, Request};
use backlight::store::{Store, SysfsFile};
use backlight::{Config, Error, FadePolicy, LockError, NotificationConfig, ReadError, report};
use uuid::Uuid;

// ============================================================================
// Fixture
// ============================================================================

struct Device {
    root: PathBuf,
}

impl Device {
    fn new(current: u32, max: u32) -> Self {
        let root = std::env::temp_dir().join(format!("backlight-run-{}", Uuid::new_v4()));
        let dir = root.join("class").join("acpi_video0");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("brightness"), format!("{current}\n")).unwrap();
        fs::write(dir.join("max_brightness"), format!("{max}\n")).unwrap();
        Self { root }
    }

    fn config(&self) -> Config {
        Config {
            backlight_dir: self.root.join("class"),
            lock_path: self.root.join("brightLOCK"),
            cache_path: Some(self.root.join("prev_brightness")),
            notification: NotificationConfig {
                program: self.root.join("no-such-notifier").display().to_string(),
                ..NotificationConfig::default()
            },
            ..Config::default()
        }
    }

    fn app_with(&self, config: Config) -> App {
        let paths = config.resolve_paths_in(&self.root).unwrap();
        App::new(config, paths)
    }

    fn app(&self) -> App {
        self.app_with(self.config())
    }

    fn device_file(&self, name: &str) -> PathBuf {
        self.root.join("class").join("acpi_video0").join(name)
    }

    fn brightness(&self) -> u32 {
        SysfsFile::new(self.device_file("brightness")).read().unwrap()
    }

    fn brightness_text(&self) -> String {
        fs::read_to_string(self.device_file("brightness")).unwrap()
    }

    fn cached(&self) -> u32 {
        SysfsFile::new(self.root.join("prev_brightness")).read().unwrap()
    }
}

impl Drop for Device {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

fn options(request: Request) -> Options {
    Options {
        request,
        ..Options::default()
    }
}

fn change(summary: Summary) -> ChangeSummary {
    match summary {
        Summary::Change(change) => change,
        Summary::Status { .. } => panic!("expected a change summary"),
    }
}

/// Pacer that returns immediately and counts pauses.
#[derive(Default)]
struct CountingPacer {
    pauses: Vec<Duration>,
}

impl Pacer for CountingPacer {
    async fn pause(&mut self, duration: Duration) -> Result<(), PauseError> {
        self.pauses.push(duration);
        Ok(())
    }
}

/// Pacer that records the brightness file contents at every pause.
struct FileReadingPacer {
    path: PathBuf,
    seen: Vec<String>,
}

impl Pacer for FileReadingPacer {
    async fn pause(&mut self, _duration: Duration) -> Result<(), PauseError> {
        let text = fs::read_to_string(&self.path).map_err(PauseError::Failed)?;
        self.seen.push(text);
        Ok(())
    }
}

// ============================================================================
// Runs
// ============================================================================

mod runs {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn bare_run_reports_status() {
        let device = Device::new(400, 852);
        let summary = device.app().run(&Options::default()).await.unwrap();

        assert!(matches!(
            summary,
            Summary::Status {
                max: 852,
                current: 400
            }
        ));
        assert_eq!(device.brightness(), 400);
    }

    #[tokio::test(start_paused = true)]
    async fn percent_increment_fades_to_target() {
        let device = Device::new(400, 852);
        let request = Request::new(Directive::Increment(10)).in_percent();
        let summary = change(device.app().run(&options(request)).await.unwrap());

        assert!(summary.is_success());
        assert_eq!(summary.resolution.target, 485);
        assert!(matches!(
            summary.status,
            WriteStatus::Done(FadeOutcome::Written { target: 485, .. })
        ));
        assert_eq!(device.brightness(), 485);
    }

    #[tokio::test(start_paused = true)]
    async fn fade_takes_configured_duration() {
        let device = Device::new(100, 852);
        let start = tokio::time::Instant::now();

        device
            .app()
            .run(&options(Request::new(Directive::Set(150))))
            .await
            .unwrap();

        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(150), "elapsed {elapsed:?}");
        assert!(elapsed < Duration::from_millis(200), "elapsed {elapsed:?}");
        assert_eq!(device.brightness(), 150);
    }

    #[tokio::test]
    async fn engine_pauses_between_steps() {
        let device = Device::new(100, 852);
        let mut pacer = CountingPacer::default();

        let summary = device
            .app()
            .run_with(
                &options(Request::new(Directive::Increment(50))),
                FadeEngine::with_pacer(FadePolicy::DEFAULT, &mut pacer),
            )
            .await
            .unwrap();

        assert!(change(summary).is_success());
        assert_eq!(pacer.pauses, vec![Duration::from_millis(17); 9]);
        assert_eq!(device.brightness(), 150);
    }

    #[tokio::test]
    async fn every_fade_step_reaches_the_file() {
        let device = Device::new(100, 852);
        let mut pacer = FileReadingPacer {
            path: device.device_file("brightness"),
            seen: Vec::new(),
        };

        device
            .app()
            .run_with(
                &options(Request::new(Directive::Increment(50))),
                FadeEngine::with_pacer(FadePolicy::DEFAULT, &mut pacer),
            )
            .await
            .unwrap();

        let expected: Vec<String> = (105..=145).step_by(5).map(|v| format!("{v}\n")).collect();
        assert_eq!(pacer.seen, expected);
        assert_eq!(device.brightness_text(), "150\n");
    }

    #[tokio::test(start_paused = true)]
    async fn disabled_fade_writes_once() {
        let device = Device::new(100, 852);
        let config = Config {
            fade: FadePolicy::DISABLED,
            ..device.config()
        };
        let start = tokio::time::Instant::now();

        let summary = change(
            device
                .app_with(config)
                .run(&options(Request::new(Directive::Set(600))))
                .await
                .unwrap(),
        );

        assert!(matches!(
            summary.status,
            WriteStatus::Done(FadeOutcome::Written { writes: 1, .. })
        ));
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(device.brightness(), 600);
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_off_then_on() {
        let device = Device::new(300, 852);
        let app = device.app();
        let toggle = options(Request::new(Directive::Toggle));

        let off = change(app.run(&toggle).await.unwrap());
        assert_eq!(off.resolution.action, Action::ToggledOff);
        assert_eq!(device.brightness(), 0);
        assert_eq!(device.cached(), 300);

        let on = change(app.run(&toggle).await.unwrap());
        assert_eq!(on.resolution.action, Action::ToggledOn);
        assert_eq!(device.brightness(), 300);
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_on_without_cache_restores_one() {
        let device = Device::new(0, 852);
        let on = change(
            device
                .app()
                .run(&options(Request::new(Directive::Toggle)))
                .await
                .unwrap(),
        );

        assert_eq!(on.resolution.target, 1);
        assert_eq!(device.brightness(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn decrement_at_lower_limit_changes_nothing() {
        let device = Device::new(1, 852);
        let summary = change(
            device
                .app()
                .run(&options(Request::new(Directive::Decrement(10))))
                .await
                .unwrap(),
        );

        assert!(summary.is_success());
        assert!(matches!(summary.status, WriteStatus::Skipped));
        assert_eq!(summary.resolution.limit(), Some(Limit::Minimum));
        assert_eq!(device.brightness(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn current_above_maximum_is_fatal() {
        let device = Device::new(900, 852);
        let result = device
            .app()
            .run(&options(Request::new(Directive::Increment(1))))
            .await;

        assert!(matches!(
            result,
            Err(Error::CurrentAboveMax {
                current: 900,
                max: 852
            })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn missing_maximum_is_fatal_before_any_write() {
        let device = Device::new(100, 852);
        fs::remove_file(device.device_file("max_brightness")).unwrap();

        let result = device
            .app()
            .run(&options(Request::new(Directive::Set(400))))
            .await;

        assert!(matches!(result, Err(Error::Read(ReadError::Open { .. }))));
        assert_eq!(device.brightness_text(), "100\n");
    }

    #[tokio::test(start_paused = true)]
    async fn garbled_maximum_is_fatal_before_any_write() {
        let device = Device::new(100, 852);
        fs::write(device.device_file("max_brightness"), "lots\n").unwrap();

        let result = device
            .app()
            .run(&options(Request::new(Directive::Toggle)))
            .await;

        match result {
            Err(Error::Read(ReadError::Parse { content, .. })) => assert_eq!(content, "lots"),
            other => panic!("expected a parse error, got {other:?}"),
        }
        assert_eq!(device.brightness_text(), "100\n");
        assert!(!device.root.join("prev_brightness").exists());
    }

    #[tokio::test(start_paused = true)]
    async fn lock_failure_aborts_before_any_write() {
        let device = Device::new(100, 852);
        let config = Config {
            lock_path: device.root.join("nodir").join("brightLOCK"),
            ..device.config()
        };

        let result = device
            .app_with(config)
            .run(&options(Request::new(Directive::Toggle)))
            .await;

        assert!(matches!(result, Err(Error::Lock(LockError::Open { .. }))));
        assert_eq!(device.brightness_text(), "100\n");
        assert!(!device.root.join("prev_brightness").exists());
    }

    #[tokio::test(start_paused = true)]
    async fn failed_notification_does_not_fail_run() {
        let device = Device::new(100, 852);
        let request = Options {
            notify: true,
            ..options(Request::new(Directive::Set(200)))
        };

        let summary = change(device.app().run(&request).await.unwrap());
        assert!(!summary.notified);
        assert!(summary.is_success());
        assert!(summary.icon_path.is_some());
        assert_eq!(device.brightness(), 200);
    }

    #[tokio::test(start_paused = true)]
    async fn lock_is_released_after_run() {
        let device = Device::new(100, 852);
        let app = device.app();
        app.run(&options(Request::new(Directive::Increment(5))))
            .await
            .unwrap();

        let lock = RunLock::try_acquire_exclusive(&app.paths().lock).unwrap();
        assert!(lock.is_some());
    }
}

// ============================================================================
// Reports
// ============================================================================

mod reports {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn normal_report_after_change() {
        let device = Device::new(100, 852);
        let app = device.app();
        let request = options(Request::new(Directive::Increment(50)));

        let summary = app.run(&request).await.unwrap();
        assert_eq!(
            report::render(&summary, &request, app.paths()),
            vec![
                "Max brightness = 852",
                "Current brightness = 150",
                "Incremented by 50"
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn icon_path_report() {
        let device = Device::new(100, 852);
        let app = device.app();
        let request = Options {
            icon_path: true,
            verbosity: Verbosity::Quiet,
            ..options(Request::new(Directive::Set(852)))
        };

        let summary = app.run(&request).await.unwrap();
        let expected = device
            .root
            .join("notification-display-brightness-full.png")
            .display()
            .to_string();
        assert_eq!(report::render(&summary, &request, app.paths()), vec![expected]);
    }

    #[tokio::test(start_paused = true)]
    async fn verbose_report_at_maximum() {
        let device = Device::new(852, 852);
        let app = device.app();
        let request = Options {
            verbosity: Verbosity::Verbose,
            ..options(Request::new(Directive::Increment(5)))
        };

        let summary = app.run(&request).await.unwrap();
        let lines = report::render(&summary, &request, app.paths());
        assert_eq!(lines.last().map(String::as_str), Some("Reached maximum brightness"));
        assert!(lines.contains(&"Current brightness = 852".to_string()));
    }
}
