// ==========================================
// PipeTrak Progress Engine - budget data repository
// ==========================================
// Invariants enforced here:
// - exactly one active budget per project: deactivate-then-insert runs in
//   one transaction (cross-row state coordinated by the transaction, never
//   an in-process flag)
// - budget versions are never deleted; full history retained for audit
// - a distribution is all-or-nothing: budget activation, component effort
//   updates and the allocation audit record commit together or not at all
// ==========================================

use crate::domain::audit::{AllocationSummary, AuditAction, AuditLog};
use crate::domain::budget::Budget;
use crate::engine::distributor::DistributionPlan;
use crate::engine::weight::WeightConfig;
use crate::repository::audit_repo;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{NaiveDate, NaiveDateTime, Utc};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

const TIMESTAMP_FMT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FMT: &str = "%Y-%m-%d";

const BUDGET_COLUMNS: &str = r#"budget_id, project_id, total_effort, reason, effective_date,
           is_active, version_number, created_by, created_at"#;

// ==========================================
// BudgetRepository
// ==========================================
pub struct BudgetRepository {
    conn: Arc<Mutex<Connection>>,
}

impl BudgetRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Persist a planned distribution as one atomic transaction
    ///
    /// Steps (any failure rolls back all of them):
    /// 1. deactivate the project's current active budget
    /// 2. insert the new budget row as active with the next version number
    /// 3. batch-write effort_weight / budgeted_effort for every planned
    ///    component
    /// 4. append exactly one allocation audit record
    ///
    /// Concurrent distributions on the same project serialize on this
    /// transaction (the active-budget row update provides the contention).
    #[allow(clippy::too_many_arguments)]
    pub fn apply_distribution(
        &self,
        project_id: &str,
        total_effort: f64,
        reason: &str,
        effective_date: NaiveDate,
        created_by: &str,
        plan: &DistributionPlan,
        weight_config: &WeightConfig,
    ) -> RepositoryResult<Budget> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        // old total for the audit trail, before anything moves
        let previous_total: f64 = tx.query_row(
            "SELECT COALESCE(SUM(budgeted_effort), 0) FROM component
             WHERE project_id = ? AND retired = 0",
            params![project_id],
            |row| row.get(0),
        )?;

        // 1. deactivate prior active budget (0 rows on first distribution)
        tx.execute(
            "UPDATE budget SET is_active = 0 WHERE project_id = ? AND is_active = 1",
            params![project_id],
        )?;

        // 2. next sequential version number
        let max_version: Option<i32> = tx.query_row(
            "SELECT MAX(version_number) FROM budget WHERE project_id = ?",
            params![project_id],
            |row| row.get(0),
        )?;
        let version_number = max_version.unwrap_or(0) + 1;

        let now = Utc::now().naive_utc();
        let budget = Budget {
            budget_id: Uuid::new_v4().to_string(),
            project_id: project_id.to_string(),
            total_effort,
            reason: reason.to_string(),
            effective_date,
            is_active: true,
            version_number,
            created_by: created_by.to_string(),
            created_at: now,
        };

        tx.execute(
            r#"INSERT INTO budget (
                budget_id, project_id, total_effort, reason, effective_date,
                is_active, version_number, created_by, created_at
            ) VALUES (?, ?, ?, ?, ?, 1, ?, ?, ?)"#,
            params![
                &budget.budget_id,
                &budget.project_id,
                &budget.total_effort,
                &budget.reason,
                &budget.effective_date.format(DATE_FMT).to_string(),
                &budget.version_number,
                &budget.created_by,
                &budget.created_at.format(TIMESTAMP_FMT).to_string(),
            ],
        )?;

        // 3. batch-write allocation results
        {
            let mut stmt = tx.prepare(
                "UPDATE component SET effort_weight = ?, budgeted_effort = ?
                 WHERE component_id = ?",
            )?;
            for alloc in &plan.allocations {
                let affected = stmt.execute(params![
                    alloc.effort_weight,
                    alloc.budgeted_effort,
                    &alloc.component_id,
                ])?;
                if affected == 0 {
                    // a planned component vanished mid-flight; abort the
                    // whole distribution rather than commit a partial one
                    return Err(RepositoryError::NotFound {
                        entity: "Component".to_string(),
                        id: alloc.component_id.clone(),
                    });
                }
            }
        }

        // 4. one allocation audit record
        let summary = AllocationSummary {
            budget_id: budget.budget_id.clone(),
            version_number,
            total_effort,
            previous_total,
            component_count: plan.allocations.len(),
            post_baseline_count: plan.post_baseline_count,
            total_weight: plan.total_weight,
            warnings: plan.warnings.clone(),
            weight_config: serde_json::to_value(weight_config)
                .map_err(|e| RepositoryError::InternalError(e.to_string()))?,
        };
        let audit = AuditLog {
            audit_id: Uuid::new_v4().to_string(),
            project_id: project_id.to_string(),
            action_type: AuditAction::DistributeBudget,
            actor: created_by.to_string(),
            action_ts: now,
            payload_json: Some(
                serde_json::to_value(&summary)
                    .map_err(|e| RepositoryError::InternalError(e.to_string()))?,
            ),
            detail: Some(format!(
                "budget v{}: {}h over {} components ({} post-baseline, {} warnings)",
                version_number,
                total_effort,
                plan.allocations.len(),
                plan.post_baseline_count,
                plan.warnings.len()
            )),
        };
        audit_repo::append_tx(&tx, &audit)?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(budget)
    }

    /// Active budget of a project, if any
    pub fn find_active(&self, project_id: &str) -> RepositoryResult<Option<Budget>> {
        let conn = self.get_conn()?;

        match conn.query_row(
            &format!(
                "SELECT {} FROM budget WHERE project_id = ? AND is_active = 1",
                BUDGET_COLUMNS
            ),
            params![project_id],
            map_row,
        ) {
            Ok(budget) => Ok(Some(budget)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Fetch one budget by id
    pub fn find_by_id(&self, budget_id: &str) -> RepositoryResult<Option<Budget>> {
        let conn = self.get_conn()?;

        match conn.query_row(
            &format!("SELECT {} FROM budget WHERE budget_id = ?", BUDGET_COLUMNS),
            params![budget_id],
            map_row,
        ) {
            Ok(budget) => Ok(Some(budget)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Full budget history of a project, newest version first
    pub fn list_by_project(&self, project_id: &str) -> RepositoryResult<Vec<Budget>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM budget WHERE project_id = ? ORDER BY version_number DESC",
            BUDGET_COLUMNS
        ))?;

        let budgets = stmt
            .query_map(params![project_id], map_row)?
            .collect::<Result<Vec<Budget>, _>>()?;

        Ok(budgets)
    }
}

/// Map a database row to a Budget
fn map_row(row: &rusqlite::Row) -> rusqlite::Result<Budget> {
    Ok(Budget {
        budget_id: row.get(0)?,
        project_id: row.get(1)?,
        total_effort: row.get(2)?,
        reason: row.get(3)?,
        effective_date: NaiveDate::parse_from_str(&row.get::<_, String>(4)?, DATE_FMT).map_err(
            |e| {
                rusqlite::Error::FromSqlConversionFailure(
                    4,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            },
        )?,
        is_active: row.get::<_, i32>(5)? == 1,
        version_number: row.get(6)?,
        created_by: row.get(7)?,
        created_at: NaiveDateTime::parse_from_str(&row.get::<_, String>(8)?, TIMESTAMP_FMT)
            .map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    8,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })?,
    })
}
