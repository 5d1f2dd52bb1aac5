// ==========================================
// PipeTrak Progress Engine - audit log repository
// ==========================================
// Rule: append-only. There is deliberately no update or delete here;
// allocation and template history must survive every later operation.
// ==========================================

use crate::domain::audit::{AuditAction, AuditLog};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection};
use std::str::FromStr;
use std::sync::{Arc, Mutex};

const TIMESTAMP_FMT: &str = "%Y-%m-%d %H:%M:%S";

// ==========================================
// AuditLogRepository
// ==========================================
pub struct AuditLogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl AuditLogRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Append one audit record
    pub fn append(&self, record: &AuditLog) -> RepositoryResult<String> {
        let conn = self.get_conn()?;
        append_tx(&conn, record)?;
        Ok(record.audit_id.clone())
    }

    /// All audit records of a project, newest first
    pub fn list_by_project(&self, project_id: &str) -> RepositoryResult<Vec<AuditLog>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT audit_id, project_id, action_type, actor, action_ts,
                      payload_json, detail
               FROM audit_log
               WHERE project_id = ?
               ORDER BY action_ts DESC, audit_id DESC"#,
        )?;

        let records = stmt
            .query_map(params![project_id], map_row)?
            .collect::<Result<Vec<AuditLog>, _>>()?;

        Ok(records)
    }

    /// Audit records of a project filtered by action type, newest first
    pub fn list_by_action(
        &self,
        project_id: &str,
        action: AuditAction,
    ) -> RepositoryResult<Vec<AuditLog>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT audit_id, project_id, action_type, actor, action_ts,
                      payload_json, detail
               FROM audit_log
               WHERE project_id = ? AND action_type = ?
               ORDER BY action_ts DESC, audit_id DESC"#,
        )?;

        let records = stmt
            .query_map(params![project_id, action.as_str()], map_row)?
            .collect::<Result<Vec<AuditLog>, _>>()?;

        Ok(records)
    }
}

/// Insert within an already-open connection/transaction, so mutating
/// repositories can append their audit record atomically with the mutation.
pub(crate) fn append_tx(conn: &Connection, record: &AuditLog) -> rusqlite::Result<usize> {
    conn.execute(
        r#"INSERT INTO audit_log (
            audit_id, project_id, action_type, actor, action_ts,
            payload_json, detail
        ) VALUES (?, ?, ?, ?, ?, ?, ?)"#,
        params![
            &record.audit_id,
            &record.project_id,
            record.action_type.as_str(),
            &record.actor,
            &record.action_ts.format(TIMESTAMP_FMT).to_string(),
            &record
                .payload_json
                .as_ref()
                .map(|v| v.to_string()),
            &record.detail,
        ],
    )
}

/// Map a database row to an AuditLog
fn map_row(row: &rusqlite::Row) -> rusqlite::Result<AuditLog> {
    let action_text: String = row.get(2)?;
    let action_type = AuditAction::from_str(&action_text).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            rusqlite::types::Type::Text,
            Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, e)),
        )
    })?;

    let payload_json = row
        .get::<_, Option<String>>(5)?
        .and_then(|s| serde_json::from_str(&s).ok());

    Ok(AuditLog {
        audit_id: row.get(0)?,
        project_id: row.get(1)?,
        action_type,
        actor: row.get(3)?,
        action_ts: NaiveDateTime::parse_from_str(&row.get::<_, String>(4)?, TIMESTAMP_FMT)
            .map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    4,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })?,
        payload_json,
        detail: row.get(6)?,
    })
}
