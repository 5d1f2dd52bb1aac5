// ==========================================
// PipeTrak Progress Engine - configuration layer
// ==========================================
// Responsibility: weight-formula configuration with database overrides
// Storage: config_kv table
// ==========================================

pub mod config_manager;

pub use config_manager::{config_keys, ConfigManager};
