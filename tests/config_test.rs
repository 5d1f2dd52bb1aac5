// ==========================================
// configuration manager integration tests
// ==========================================

mod test_helpers;

use pipetrak_progress::config::{config_keys, ConfigManager};
use pipetrak_progress::engine::weight::WeightConfig;

use test_helpers::create_test_db;

#[test]
fn test_defaults_when_config_kv_empty() {
    let (_temp, db_path) = create_test_db().expect("test db");
    let manager = ConfigManager::new(&db_path).unwrap();

    let config = manager.load_weight_config().unwrap();
    let defaults = WeightConfig::default();
    assert_eq!(config.exponent, defaults.exponent);
    assert_eq!(config.no_size_weight, defaults.no_size_weight);
    assert_eq!(config.threaded_linear_factor, defaults.threaded_linear_factor);
}

#[test]
fn test_overrides_read_from_config_kv() {
    let (_temp, db_path) = create_test_db().expect("test db");
    let manager = ConfigManager::new(&db_path).unwrap();

    manager
        .set_config_value(config_keys::WEIGHT_EXPONENT, "2.0")
        .unwrap();
    manager
        .set_config_value(config_keys::NO_SIZE_FALLBACK_WEIGHT, "0.25")
        .unwrap();

    let config = manager.load_weight_config().unwrap();
    assert_eq!(config.exponent, 2.0);
    assert_eq!(config.no_size_weight, 0.25);
    // untouched key keeps its default
    assert_eq!(config.threaded_linear_factor, 0.1);
}

#[test]
fn test_malformed_value_falls_back_to_default() {
    let (_temp, db_path) = create_test_db().expect("test db");
    let manager = ConfigManager::new(&db_path).unwrap();

    manager
        .set_config_value(config_keys::WEIGHT_EXPONENT, "not-a-number")
        .unwrap();

    let config = manager.load_weight_config().unwrap();
    assert_eq!(config.exponent, WeightConfig::default().exponent);
}

#[test]
fn test_config_snapshot_lists_all_global_keys() {
    let (_temp, db_path) = create_test_db().expect("test db");
    let manager = ConfigManager::new(&db_path).unwrap();

    manager
        .set_config_value(config_keys::WEIGHT_EXPONENT, "1.5")
        .unwrap();
    manager
        .set_config_value(config_keys::THREADED_LINEAR_FACTOR, "0.2")
        .unwrap();

    let snapshot = manager.get_config_snapshot().unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&snapshot).unwrap();
    assert_eq!(parsed[config_keys::WEIGHT_EXPONENT], "1.5");
    assert_eq!(parsed[config_keys::THREADED_LINEAR_FACTOR], "0.2");
}
