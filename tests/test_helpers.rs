// ==========================================
// test helpers
// ==========================================
// Responsibility: temp database creation, schema init and fixtures shared
// by the integration tests
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;
use std::error::Error;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

use pipetrak_progress::domain::component::Component;
use pipetrak_progress::domain::types::ComponentType;

/// Create a temp database file with the full schema applied
///
/// Returns the NamedTempFile (keep it alive) and the path.
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().unwrap().to_string();

    let conn = Connection::open(&db_path)?;
    init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// Open a configured shared connection against a test database
pub fn open_test_connection(db_path: &str) -> Arc<Mutex<Connection>> {
    let conn = pipetrak_progress::db::open_sqlite_connection(db_path)
        .expect("failed to open test database");
    Arc::new(Mutex::new(conn))
}

fn init_schema(conn: &Connection) -> Result<(), Box<dyn Error>> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        INSERT OR IGNORE INTO schema_version (version) VALUES (1);

        CREATE TABLE IF NOT EXISTS config_scope (
            scope_id TEXT PRIMARY KEY,
            scope_type TEXT NOT NULL,
            scope_key TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(scope_type, scope_key)
        );
        INSERT OR IGNORE INTO config_scope (scope_id, scope_type, scope_key)
        VALUES ('global', 'GLOBAL', 'global');

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL REFERENCES config_scope(scope_id) ON DELETE CASCADE,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS component (
            component_id TEXT PRIMARY KEY,
            project_id TEXT NOT NULL,
            component_type TEXT NOT NULL,
            size_text TEXT,
            linear_feet REAL,
            area TEXT,
            system_code TEXT,
            test_package TEXT,
            drawing TEXT,
            welder TEXT,
            budgeted_effort REAL NOT NULL DEFAULT 0,
            effort_weight REAL NOT NULL DEFAULT 0,
            percent_complete REAL NOT NULL DEFAULT 0,
            retired INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_component_project ON component(project_id, retired);

        CREATE TABLE IF NOT EXISTS budget (
            budget_id TEXT PRIMARY KEY,
            project_id TEXT NOT NULL,
            total_effort REAL NOT NULL,
            reason TEXT NOT NULL,
            effective_date TEXT NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 0,
            version_number INTEGER NOT NULL,
            created_by TEXT NOT NULL,
            created_at TEXT NOT NULL,
            UNIQUE(project_id, version_number)
        );
        CREATE INDEX IF NOT EXISTS idx_budget_active ON budget(project_id, is_active);

        CREATE TABLE IF NOT EXISTS milestone_template (
            project_id TEXT NOT NULL,
            component_type TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            PRIMARY KEY (project_id, component_type)
        );

        CREATE TABLE IF NOT EXISTS milestone_template_entry (
            project_id TEXT NOT NULL,
            component_type TEXT NOT NULL,
            milestone_name TEXT NOT NULL,
            weight REAL NOT NULL,
            sort_order INTEGER NOT NULL,
            PRIMARY KEY (project_id, component_type, milestone_name)
        );

        CREATE TABLE IF NOT EXISTS component_milestone (
            component_id TEXT NOT NULL,
            milestone_name TEXT NOT NULL,
            completed INTEGER NOT NULL DEFAULT 0,
            completed_at TEXT,
            PRIMARY KEY (component_id, milestone_name)
        );

        CREATE TABLE IF NOT EXISTS audit_log (
            audit_id TEXT PRIMARY KEY,
            project_id TEXT NOT NULL,
            action_type TEXT NOT NULL,
            actor TEXT NOT NULL,
            action_ts TEXT NOT NULL,
            payload_json TEXT,
            detail TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_audit_project_ts ON audit_log(project_id, action_ts);
        "#,
    )?;
    Ok(())
}

// ==========================================
// fixtures
// ==========================================

/// Component fixture with sensible defaults; tweak fields after the call
pub fn component_fixture(component_id: &str, project_id: &str, size: &str) -> Component {
    Component {
        component_id: component_id.to_string(),
        project_id: project_id.to_string(),
        component_type: ComponentType::Spool,
        size_text: Some(size.to_string()),
        linear_feet: None,
        area: None,
        system_code: None,
        test_package: None,
        drawing: None,
        welder: None,
        budgeted_effort: 0.0,
        effort_weight: 0.0,
        percent_complete: 0.0,
        retired: false,
        created_at: ts("2025-01-01 08:00:00"),
    }
}

pub fn typed_fixture(
    component_id: &str,
    project_id: &str,
    kind: &str,
    size: &str,
) -> Component {
    let mut c = component_fixture(component_id, project_id, size);
    c.component_type = ComponentType::from_str(kind).expect("bad fixture type");
    c
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("bad fixture date")
}

pub fn ts(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").expect("bad fixture timestamp")
}
