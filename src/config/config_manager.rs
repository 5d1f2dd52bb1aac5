// ==========================================
// PipeTrak Progress Engine - configuration manager
// ==========================================
// Responsibility: load and query weight-formula configuration
// Storage: config_kv table (key-value + scope)
// ==========================================

use crate::db::open_sqlite_connection;
use crate::engine::weight::WeightConfig;
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// Open a new connection against `db_path`
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Reuse an existing shared connection
    ///
    /// Re-applies the standard PRAGMA set on the passed connection so
    /// behavior stays uniform (idempotent).
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("lock acquisition failed: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// Read one value from config_kv (scope_id='global')
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("lock acquisition failed: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self.get_config_value(key)?.unwrap_or_else(|| default.to_string()))
    }

    fn get_f64_or(&self, key: &str, default: f64) -> Result<f64, Box<dyn Error>> {
        let raw = self.get_config_or_default(key, &default.to_string())?;
        let value = raw.parse::<f64>().unwrap_or_else(|_| {
            tracing::warn!(config_key = key, raw_value = %raw, "malformed numeric config, using default");
            default
        });
        Ok(value)
    }

    /// Weight-formula parameters, falling back to the built-in defaults
    /// for any key not present in config_kv
    ///
    /// # Keys
    /// - weight_exponent (default 1.5)
    /// - no_size_fallback_weight (default 0.5)
    /// - threaded_linear_factor (default 0.1)
    pub fn load_weight_config(&self) -> Result<WeightConfig, Box<dyn Error>> {
        let defaults = WeightConfig::default();
        Ok(WeightConfig {
            exponent: self.get_f64_or(config_keys::WEIGHT_EXPONENT, defaults.exponent)?,
            no_size_weight: self
                .get_f64_or(config_keys::NO_SIZE_FALLBACK_WEIGHT, defaults.no_size_weight)?,
            threaded_linear_factor: self.get_f64_or(
                config_keys::THREADED_LINEAR_FACTOR,
                defaults.threaded_linear_factor,
            )?,
        })
    }

    /// Snapshot of all global-scope configuration as JSON
    ///
    /// Recorded on each distribution so an allocation can be reproduced
    /// even after the formula parameters are tuned later.
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("lock acquisition failed: {}", e))?;

        let mut stmt = conn.prepare(
            "SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key",
        )?;

        let mut config_map: HashMap<String, String> = HashMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&config_map)?)
    }

    /// Upsert one global configuration value
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("lock acquisition failed: {}", e))?;

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;

        Ok(())
    }
}

// ==========================================
// Configuration key constants
// ==========================================
pub mod config_keys {
    // weight formula
    pub const WEIGHT_EXPONENT: &str = "weight_exponent";
    pub const NO_SIZE_FALLBACK_WEIGHT: &str = "no_size_fallback_weight";
    pub const THREADED_LINEAR_FACTOR: &str = "threaded_linear_factor";
}
