// ==========================================
// PipeTrak Progress Engine - earned-value read model
// ==========================================
// Read-only aggregation. One parameterized GROUP BY over the per-component
// computed expression
//     SUM(budgeted_effort * percent_complete / 100.0)
// with the grouping column drawn from the closed GroupDimension enum -
// never string SQL from callers, never a pre-materialized per-dimension
// table. Computing earned value fresh on every query is what guarantees
// Σ(group earned) == project earned while percent_complete keeps moving.
// ==========================================

use crate::domain::component::Component;
use crate::domain::types::GroupDimension;
use crate::engine::earned_value;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// Bucket label for components with no value in the grouping column
pub const UNASSIGNED_GROUP: &str = "(unassigned)";

// ==========================================
// ProgressRow - one aggregate bucket
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressRow {
    pub group_key: String,
    pub component_count: i64,
    pub budgeted: f64,
    pub earned: f64,
    pub remaining: f64,
    pub percent_complete: f64, // 0 when the bucket has no budget
}

// ==========================================
// ProjectSummary - ungrouped totals
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub project_id: String,
    pub component_count: i64,
    pub budgeted: f64,
    pub earned: f64,
    pub remaining: f64,
    pub percent_complete: f64,
}

// ==========================================
// ProgressRepository
// ==========================================
pub struct ProgressRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProgressRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Budgeted / earned / remaining per bucket of the given dimension
    ///
    /// Post-baseline components participate with budget 0, so counts stay
    /// honest and conservation holds across dimensions.
    pub fn aggregate(
        &self,
        project_id: &str,
        dimension: GroupDimension,
    ) -> RepositoryResult<Vec<ProgressRow>> {
        let conn = self.get_conn()?;

        // column name comes from the closed enum, not caller input
        let sql = format!(
            r#"SELECT COALESCE({col}, '{unassigned}') AS group_key,
                      COUNT(*) AS component_count,
                      COALESCE(SUM(budgeted_effort), 0) AS budgeted,
                      COALESCE(SUM(budgeted_effort * percent_complete / 100.0), 0) AS earned
               FROM component
               WHERE project_id = ? AND retired = 0
               GROUP BY group_key
               ORDER BY group_key"#,
            col = dimension.column(),
            unassigned = UNASSIGNED_GROUP,
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![project_id], |row| {
                let budgeted: f64 = row.get(2)?;
                let earned: f64 = row.get(3)?;
                Ok(ProgressRow {
                    group_key: row.get(0)?,
                    component_count: row.get(1)?,
                    budgeted,
                    earned,
                    remaining: budgeted - earned,
                    percent_complete: earned_value::group_percent(budgeted, earned),
                })
            })?
            .collect::<Result<Vec<ProgressRow>, _>>()?;

        Ok(rows)
    }

    /// Project-level totals (same computed expression, no grouping)
    pub fn project_summary(&self, project_id: &str) -> RepositoryResult<ProjectSummary> {
        let conn = self.get_conn()?;

        conn.query_row(
            r#"SELECT COUNT(*),
                      COALESCE(SUM(budgeted_effort), 0),
                      COALESCE(SUM(budgeted_effort * percent_complete / 100.0), 0)
               FROM component
               WHERE project_id = ? AND retired = 0"#,
            params![project_id],
            |row| {
                let budgeted: f64 = row.get(1)?;
                let earned: f64 = row.get(2)?;
                Ok(ProjectSummary {
                    project_id: project_id.to_string(),
                    component_count: row.get(0)?,
                    budgeted,
                    earned,
                    remaining: budgeted - earned,
                    percent_complete: earned_value::group_percent(budgeted, earned),
                })
            },
        )
        .map_err(Into::into)
    }

    /// "Added Components" view: components created after the active
    /// budget's effective date, still carrying budget 0 until the next
    /// revision. Empty when the project has no active budget.
    pub fn list_added_components(&self, project_id: &str) -> RepositoryResult<Vec<Component>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT c.component_id, c.project_id, c.component_type, c.size_text,
                      c.linear_feet, c.area, c.system_code, c.test_package, c.drawing, c.welder,
                      c.budgeted_effort, c.effort_weight, c.percent_complete, c.retired, c.created_at
               FROM component c
               JOIN budget b ON b.project_id = c.project_id AND b.is_active = 1
               WHERE c.project_id = ? AND c.retired = 0
                 AND date(c.created_at) > b.effective_date
               ORDER BY c.created_at, c.component_id"#,
        )?;

        let components = stmt
            .query_map(params![project_id], crate::repository::component_repo::map_component_row)?
            .collect::<Result<Vec<Component>, _>>()?;

        Ok(components)
    }
}
