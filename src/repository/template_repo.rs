// ==========================================
// PipeTrak Progress Engine - milestone template repository
// ==========================================
// Concurrency: template edits use an optimistic-lock check on the header
// row's last-modified timestamp. The writer passes the timestamp it loaded;
// if the row has advanced since, the write aborts with StaleTemplate and
// the editor reloads. No lock is held across user think-time.
// ==========================================
// Weight validation does NOT live here - the engine validator is the single
// source of truth and the API layer must have applied it already. This
// repository only guarantees atomicity.
// ==========================================

use crate::domain::audit::AuditLog;
use crate::domain::milestone::{MilestoneTemplate, MilestoneWeight};
use crate::domain::types::ComponentType;
use crate::repository::audit_repo;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

pub const TIMESTAMP_FMT: &str = "%Y-%m-%d %H:%M:%S%.3f";

// ==========================================
// TemplateLock - write-guard mode for replace_weights
// ==========================================
// Every write path must state what it expects to find, so a writer who
// loaded nothing can never silently clobber a committed weight set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TemplateLock {
    /// Editor loaded the header at this timestamp; abort if it advanced
    Loaded(NaiveDateTime),
    /// Writer expects the slot to be empty; abort if a header already exists
    FirstWrite,
    /// Deliberate wholesale replace (template cloning); no staleness check
    Replace,
}

// ==========================================
// TemplateRepository
// ==========================================
pub struct TemplateRepository {
    conn: Arc<Mutex<Connection>>,
}

impl TemplateRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Load the template for one (project, component type)
    pub fn find(
        &self,
        project_id: &str,
        component_type: ComponentType,
    ) -> RepositoryResult<Option<MilestoneTemplate>> {
        let conn = self.get_conn()?;
        find_in(&conn, project_id, component_type)
    }

    /// Replace the weight set atomically, with the write-guard check,
    /// the optional retroactive percent recompute and the audit record all
    /// inside one transaction.
    ///
    /// # Arguments
    /// - `lock`: what the writer expects to find (see [`TemplateLock`])
    /// - `apply_retroactively`: recompute percent_complete of every
    ///   component of this type from its completed milestones and the new
    ///   weights
    /// - `audit`: pre-built audit record, committed with the write
    ///
    /// # Returns
    /// `(new_updated_at, recomputed_component_count)`
    ///
    /// # Errors
    /// - `StaleTemplate`: the template advanced since it was loaded, or a
    ///   FirstWrite found an existing weight set
    pub fn replace_weights(
        &self,
        project_id: &str,
        component_type: ComponentType,
        weights: &[MilestoneWeight],
        lock: TemplateLock,
        apply_retroactively: bool,
        audit: &AuditLog,
    ) -> RepositoryResult<(NaiveDateTime, usize)> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        // write-guard check against the current header, inside the tx
        let current: Option<String> = tx
            .query_row(
                "SELECT updated_at FROM milestone_template
                 WHERE project_id = ? AND component_type = ?",
                params![project_id, component_type.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        match lock {
            TemplateLock::Loaded(loaded) => {
                let loaded_str = loaded.format(TIMESTAMP_FMT).to_string();
                if let Some(actual) = current.as_deref() {
                    if loaded_str != actual {
                        return Err(RepositoryError::StaleTemplate {
                            entity: format!("{}/{}", project_id, component_type),
                            loaded_at: loaded_str,
                            actual_at: actual.to_string(),
                        });
                    }
                }
            }
            TemplateLock::FirstWrite => {
                if let Some(actual) = current.as_deref() {
                    return Err(RepositoryError::StaleTemplate {
                        entity: format!("{}/{}", project_id, component_type),
                        loaded_at: "(none)".to_string(),
                        actual_at: actual.to_string(),
                    });
                }
            }
            TemplateLock::Replace => {}
        }

        // The new token must be strictly later than the stored one at stored
        // precision; two commits inside the same millisecond would otherwise
        // hand the second editor a token equal to the first's and defeat the
        // check. The format is fixed-width, so string order is time order.
        let mut now = Utc::now().naive_utc();
        if let Some(actual) = current.as_deref() {
            if now.format(TIMESTAMP_FMT).to_string().as_str() <= actual {
                if let Ok(prev) = NaiveDateTime::parse_from_str(actual, TIMESTAMP_FMT) {
                    now = prev + chrono::Duration::milliseconds(1);
                }
            }
        }
        let now_str = now.format(TIMESTAMP_FMT).to_string();

        tx.execute(
            r#"INSERT INTO milestone_template (project_id, component_type, updated_at)
               VALUES (?1, ?2, ?3)
               ON CONFLICT(project_id, component_type) DO UPDATE SET updated_at = ?3"#,
            params![project_id, component_type.as_str(), &now_str],
        )?;

        tx.execute(
            "DELETE FROM milestone_template_entry
             WHERE project_id = ? AND component_type = ?",
            params![project_id, component_type.as_str()],
        )?;

        {
            let mut stmt = tx.prepare(
                r#"INSERT INTO milestone_template_entry (
                    project_id, component_type, milestone_name, weight, sort_order
                ) VALUES (?, ?, ?, ?, ?)"#,
            )?;
            for (idx, entry) in weights.iter().enumerate() {
                stmt.execute(params![
                    project_id,
                    component_type.as_str(),
                    entry.name.trim(),
                    entry.weight,
                    idx as i32,
                ])?;
            }
        }

        // retroactive pass: new weights against already-completed milestones
        let recomputed = if apply_retroactively {
            tx.execute(
                r#"UPDATE component
                   SET percent_complete = COALESCE((
                       SELECT SUM(e.weight)
                       FROM component_milestone cm
                       JOIN milestone_template_entry e
                         ON e.project_id = component.project_id
                        AND e.component_type = component.component_type
                        AND e.milestone_name = cm.milestone_name
                       WHERE cm.component_id = component.component_id
                         AND cm.completed = 1
                   ), 0)
                   WHERE project_id = ? AND component_type = ? AND retired = 0"#,
                params![project_id, component_type.as_str()],
            )?
        } else {
            0
        };

        audit_repo::append_tx(&tx, audit)?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok((now, recomputed))
    }
}

/// Shared read used inside and outside transactions
fn find_in(
    conn: &Connection,
    project_id: &str,
    component_type: ComponentType,
) -> RepositoryResult<Option<MilestoneTemplate>> {
    let updated_at: Option<String> = conn
        .query_row(
            "SELECT updated_at FROM milestone_template
             WHERE project_id = ? AND component_type = ?",
            params![project_id, component_type.as_str()],
            |row| row.get(0),
        )
        .optional()?;

    let updated_at = match updated_at {
        Some(ts) => NaiveDateTime::parse_from_str(&ts, TIMESTAMP_FMT).map_err(|e| {
            RepositoryError::FieldValueError {
                field: "updated_at".to_string(),
                message: e.to_string(),
            }
        })?,
        None => return Ok(None),
    };

    let mut stmt = conn.prepare(
        r#"SELECT milestone_name, weight
           FROM milestone_template_entry
           WHERE project_id = ? AND component_type = ?
           ORDER BY sort_order"#,
    )?;

    let weights = stmt
        .query_map(params![project_id, component_type.as_str()], |row| {
            Ok(MilestoneWeight {
                name: row.get(0)?,
                weight: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<MilestoneWeight>, _>>()?;

    Ok(Some(MilestoneTemplate {
        project_id: project_id.to_string(),
        component_type,
        weights,
        updated_at,
    }))
}
