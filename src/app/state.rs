// ==========================================
// PipeTrak Progress Engine - application state
// ==========================================
// Responsibility: application-level shared state and API wiring
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::{AuditApi, BudgetApi, ComponentApi, ProgressApi, TemplateApi};
use crate::config::ConfigManager;
use crate::db::{self, CURRENT_SCHEMA_VERSION};
use crate::engine::distributor::DistributionEngine;
use crate::engine::weight::WeightCalculator;
use crate::repository::{
    audit_repo::AuditLogRepository, budget_repo::BudgetRepository,
    component_repo::ComponentRepository, progress_repo::ProgressRepository,
    template_repo::TemplateRepository,
};

/// Application state
///
/// Holds every API instance over one shared connection. Managed as Tauri
/// global state when the desktop shell is enabled.
pub struct AppState {
    pub db_path: String,
    pub budget_api: Arc<BudgetApi>,
    pub template_api: Arc<TemplateApi>,
    pub progress_api: Arc<ProgressApi>,
    pub component_api: Arc<ComponentApi>,
    pub audit_api: Arc<AuditApi>,
    pub config_manager: Arc<ConfigManager>,
}

impl AppState {
    /// Build the full repository / engine / API stack against `db_path`
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!(db_path = %db_path, "initializing AppState");

        let conn = db::open_sqlite_connection(&db_path)
            .map_err(|e| format!("failed to open database: {}", e))?;

        // warn, don't abort: the schema is provisioned externally and an
        // empty dev database is still useful for the first import
        match db::read_schema_version(&conn) {
            Ok(Some(v)) if v == CURRENT_SCHEMA_VERSION => {}
            Ok(Some(v)) => {
                tracing::warn!(
                    found = v,
                    expected = CURRENT_SCHEMA_VERSION,
                    "database schema version mismatch"
                );
            }
            Ok(None) => {
                tracing::warn!("database has no schema_version table");
            }
            Err(e) => {
                tracing::warn!("could not read schema version: {}", e);
            }
        }

        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // repository layer
        // ==========================================
        let component_repo = Arc::new(ComponentRepository::new(conn.clone()));
        let budget_repo = Arc::new(BudgetRepository::new(conn.clone()));
        let template_repo = Arc::new(TemplateRepository::new(conn.clone()));
        let progress_repo = Arc::new(ProgressRepository::new(conn.clone()));
        let audit_repo = Arc::new(AuditLogRepository::new(conn.clone()));

        // ==========================================
        // engine layer
        // ==========================================
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("failed to create ConfigManager: {}", e))?,
        );

        let weight_config = config_manager
            .load_weight_config()
            .map_err(|e| format!("failed to load weight configuration: {}", e))?;
        let distribution_engine = DistributionEngine::new(WeightCalculator::new(weight_config));

        // ==========================================
        // API layer
        // ==========================================
        let budget_api = Arc::new(BudgetApi::new(
            distribution_engine,
            budget_repo,
            component_repo.clone(),
        ));
        let template_api = Arc::new(TemplateApi::new(template_repo));
        let progress_api = Arc::new(ProgressApi::new(progress_repo));
        let component_api = Arc::new(ComponentApi::new(component_repo));
        let audit_api = Arc::new(AuditApi::new(audit_repo));

        tracing::info!("AppState initialized");

        Ok(Self {
            db_path,
            budget_api,
            template_api,
            progress_api,
            component_api,
            audit_api,
            config_manager,
        })
    }

    pub fn get_db_path(&self) -> &str {
        &self.db_path
    }
}

// ==========================================
// default database path helper
// ==========================================

/// Resolve the database path
///
/// Order: PIPETRAK_PROGRESS_DB_PATH env var, then the user data directory
/// (a -dev suffixed directory in debug builds), then ./pipetrak_progress.db.
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("PIPETRAK_PROGRESS_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./pipetrak_progress.db");

    if let Some(data_dir) = dirs::data_dir() {
        // separate dev directory so development never touches production data
        #[cfg(debug_assertions)]
        {
            path = data_dir.join("pipetrak-progress-dev");
        }

        #[cfg(not(debug_assertions))]
        {
            path = data_dir.join("pipetrak-progress");
        }

        std::fs::create_dir_all(&path).ok();
        path = path.join("pipetrak_progress.db");
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_default_db_path() {
        let path = get_default_db_path();
        assert!(!path.is_empty());
        assert!(path.ends_with(".db"));
    }
}
