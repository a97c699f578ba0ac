//! Configuration loading tests

use pocket_player::{CliConfig, CliError, DurationOverride};
use std::io::Write;
use tempfile::NamedTempFile;

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(contents.as_bytes())
        .expect("Failed to write config");
    file
}

#[test]
fn test_partial_file_keeps_defaults() {
    let file = config_file(
        r#"
[playback]
volume_step = 0.25
autoplay = true

[simulation]
default_duration_secs = 12
"#,
    );

    let config = CliConfig::load(Some(file.path())).unwrap();
    assert_eq!(config.playback.volume_step, 0.25);
    assert!(config.playback.autoplay);
    assert_eq!(config.playback.seek_step_secs, 10.0);
    assert_eq!(config.playback.poll_interval_ms, Some(200));
    assert_eq!(config.simulation.default_duration_secs, 12);
    assert_eq!(config.simulation.clock_tick_ms, 250);
    assert!(config.validate().is_ok());
}

#[test]
fn test_duration_overrides() {
    let file = config_file(
        r#"
[[simulation.durations]]
url = "/samples/sample1.mp4"
secs = 5
"#,
    );

    let config = CliConfig::load(Some(file.path())).unwrap();
    assert_eq!(
        config.simulation.durations,
        [DurationOverride {
            url: "/samples/sample1.mp4".to_string(),
            secs: 5
        }]
    );
}

#[test]
fn test_missing_explicit_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");

    let err = CliConfig::load(Some(&missing)).unwrap_err();
    assert!(matches!(err, CliError::Config(_)));
}

#[test]
fn test_invalid_values_fail_validation() {
    let file = config_file(
        r#"
[playback]
volume_step = 2.0
"#,
    );

    let config = CliConfig::load(Some(file.path())).unwrap();
    assert!(matches!(config.validate(), Err(CliError::Config(_))));
}
