use serial_test::serial;
use temp_env::with_vars;

use super::*;
use crate::Error;

fn cleanup_all_alarm_env_vars() {
    for (key, _) in std::env::vars() {
        if key.starts_with("ALARM__") || key == "CONFIG_PATH" {
            std::env::remove_var(&key);
        }
    }
}

#[test]
#[serial]
fn default_config_should_initialize_with_hardcoded_values() {
    let config = AlarmConfig::default();

    assert_eq!(config.scheduler.coordinator_tick_in_ms, 1000);
    assert_eq!(config.scheduler.monitor_tick_in_ms, 1000);
    assert_eq!(config.scheduler.max_message_len, 128);
    assert!(!config.events.emit_snapshots);
    assert!(config.monitoring.metrics_enabled);
    assert_eq!(config.monitoring.metrics_namespace, "alarm");
}

#[test]
#[serial]
fn new_should_merge_environment_overrides() {
    cleanup_all_alarm_env_vars();
    with_vars(
        vec![
            ("ALARM__SCHEDULER__COORDINATOR_TICK_IN_MS", Some("250")),
            ("ALARM__EVENTS__EMIT_SNAPSHOTS", Some("true")),
        ],
        || {
            let config = AlarmConfig::new().unwrap();

            assert_eq!(config.scheduler.coordinator_tick_in_ms, 250);
            assert_eq!(config.scheduler.monitor_tick_in_ms, 1000);
            assert!(config.events.emit_snapshots);
        },
    );
}

#[test]
#[serial]
fn new_should_load_file_from_config_path() {
    cleanup_all_alarm_env_vars();
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("alarm.toml");
    std::fs::write(
        &config_path,
        r#"
        [scheduler]
        monitor_tick_in_ms = 500

        [monitoring]
        metrics_namespace = "alarm_test"
        "#,
    )
    .unwrap();

    with_vars(
        vec![("CONFIG_PATH", Some(config_path.to_str().unwrap()))],
        || {
            let config = AlarmConfig::new().unwrap().validate().unwrap();

            assert_eq!(config.scheduler.monitor_tick_in_ms, 500);
            assert_eq!(config.scheduler.coordinator_tick_in_ms, 1000);
            assert_eq!(config.monitoring.metrics_namespace, "alarm_test");
        },
    );
}

#[test]
#[serial]
fn with_override_config_should_merge_file_settings() {
    cleanup_all_alarm_env_vars();
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("override.toml");
    std::fs::write(
        &config_path,
        r#"
        [scheduler]
        coordinator_tick_in_ms = 20
        max_message_len = 64
        "#,
    )
    .unwrap();

    let empty_vars: Vec<(&str, Option<&str>)> = vec![];
    with_vars(empty_vars, || {
        let base_config = AlarmConfig::new().expect("success");
        let config = base_config
            .with_override_config(config_path.to_str().unwrap())
            .unwrap();

        assert_eq!(config.scheduler.coordinator_tick_in_ms, 20);
        assert_eq!(config.scheduler.max_message_len, 64);
        assert_eq!(config.scheduler.monitor_tick_in_ms, 1000);
    });
}

#[test]
#[serial]
fn environment_should_win_over_override_file() {
    cleanup_all_alarm_env_vars();
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("override.toml");
    std::fs::write(&config_path, "[scheduler]\nmonitor_tick_in_ms = 20\n").unwrap();

    with_vars(
        vec![("ALARM__SCHEDULER__MONITOR_TICK_IN_MS", Some("30"))],
        || {
            let config = AlarmConfig::default()
                .with_override_config(config_path.to_str().unwrap())
                .unwrap();
            assert_eq!(config.scheduler.monitor_tick_in_ms, 30);
        },
    );
}

#[test]
#[serial]
fn missing_config_path_file_is_an_error() {
    cleanup_all_alarm_env_vars();
    with_vars(vec![("CONFIG_PATH", Some("/nonexistent/alarm.toml"))], || {
        assert!(matches!(AlarmConfig::new(), Err(Error::Config(_))));
    });
}

#[test]
fn validation_should_reject_zero_ticks() {
    let mut config = AlarmConfig::default();
    config.scheduler.coordinator_tick_in_ms = 0;
    assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

    let mut config = AlarmConfig::default();
    config.scheduler.monitor_tick_in_ms = 0;
    assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
}

#[test]
fn validation_should_reject_zero_message_len() {
    let mut config = AlarmConfig::default();
    config.scheduler.max_message_len = 0;
    assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
}

#[test]
fn validation_should_check_namespace_only_when_metrics_enabled() {
    let mut config = AlarmConfig::default();
    config.monitoring.metrics_namespace = "Bad-Name".to_string();
    assert!(matches!(
        config.clone().validate(),
        Err(Error::InvalidConfig(_))
    ));

    config.monitoring.metrics_enabled = false;
    assert!(config.validate().is_ok());
}

#[test]
fn tick_accessors_convert_to_durations() {
    let config = SchedulerConfig {
        coordinator_tick_in_ms: 250,
        monitor_tick_in_ms: 1500,
        max_message_len: 8,
    };
    assert_eq!(config.coordinator_tick().as_millis(), 250);
    assert_eq!(config.monitor_tick().as_millis(), 1500);
}
