use std::time::{Duration, UNIX_EPOCH};

use rate_guard_counter::config::DEFAULT_WINDOW_SIZE;
use rate_guard_counter::windows::LocalWindow;
use rate_guard_counter::{Counter, CounterConfig, CounterError};

#[test]
fn test_default_config() {
    let config = CounterConfig::default();

    assert_eq!(config.size, DEFAULT_WINDOW_SIZE);
    assert_eq!(config.sync_interval, Duration::ZERO);
    assert!(!config.syncs_in_background());
    assert!(config.validate().is_ok());
}

#[test]
fn test_builder_sets_sync_interval() {
    let config =
        CounterConfig::new(Duration::from_secs(1)).sync_interval(Duration::from_millis(100));

    assert_eq!(config.size, Duration::from_secs(1));
    assert_eq!(config.sync_interval, Duration::from_millis(100));
    assert!(config.syncs_in_background());
}

#[test]
fn test_zero_size_fails_validation() {
    let err = CounterConfig::new(Duration::ZERO).validate().unwrap_err();

    assert!(matches!(err, CounterError::ZeroSize));
    assert_eq!(err.to_string(), "window size must be greater than zero");
}

#[test]
fn test_counter_from_config() {
    let config =
        CounterConfig::new(Duration::from_secs(10)).sync_interval(Duration::from_millis(50));
    let (counter, stop) = Counter::with_config(config, LocalWindow::new).unwrap();

    assert_eq!(counter.size(), Duration::from_secs(10));
    assert_eq!(counter.sync_interval(), Duration::from_millis(50));

    let t = UNIX_EPOCH + Duration::from_secs(1_000);
    counter.add_n(t, 3);
    assert_eq!(counter.count(t), 3);

    counter.stop();
    stop();
}

#[test]
fn test_counter_from_invalid_config() {
    let result = Counter::with_config(CounterConfig::new(Duration::ZERO), LocalWindow::new);
    assert!(matches!(result, Err(CounterError::ZeroSize)));
}
