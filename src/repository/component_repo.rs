// ==========================================
// PipeTrak Progress Engine - component data repository
// ==========================================
// Rule: repositories contain no business logic; all queries are
// parameterized. budgeted_effort / effort_weight are written only through
// BudgetRepository::apply_distribution, never here.
// ==========================================

use crate::domain::component::Component;
use crate::domain::types::ComponentType;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};
use std::str::FromStr;
use std::sync::{Arc, Mutex};

const TIMESTAMP_FMT: &str = "%Y-%m-%d %H:%M:%S";

const COMPONENT_COLUMNS: &str = r#"component_id, project_id, component_type, size_text,
           linear_feet, area, system_code, test_package, drawing, welder,
           budgeted_effort, effort_weight, percent_complete, retired, created_at"#;

// ==========================================
// ComponentRepository
// ==========================================
pub struct ComponentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ComponentRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Insert one component
    pub fn create(&self, component: &Component) -> RepositoryResult<String> {
        let conn = self.get_conn()?;
        insert_component(&conn, component)?;
        Ok(component.component_id.clone())
    }

    /// Insert a batch of components in one transaction
    pub fn batch_insert(&self, components: &[Component]) -> RepositoryResult<usize> {
        if components.is_empty() {
            return Ok(0);
        }

        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        for component in components {
            insert_component(&tx, component)?;
        }
        tx.commit()?;
        Ok(components.len())
    }

    /// Fetch one component by id
    pub fn find_by_id(&self, component_id: &str) -> RepositoryResult<Option<Component>> {
        let conn = self.get_conn()?;

        match conn.query_row(
            &format!(
                "SELECT {} FROM component WHERE component_id = ?",
                COMPONENT_COLUMNS
            ),
            params![component_id],
            map_component_row,
        ) {
            Ok(component) => Ok(Some(component)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All non-retired components of a project (distribution input set)
    pub fn find_active_by_project(&self, project_id: &str) -> RepositoryResult<Vec<Component>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM component WHERE project_id = ? AND retired = 0 ORDER BY component_id",
            COMPONENT_COLUMNS
        ))?;

        let components = stmt
            .query_map(params![project_id], map_component_row)?
            .collect::<Result<Vec<Component>, _>>()?;

        Ok(components)
    }

    /// Components of one type within a project (retroactive recompute scope)
    pub fn find_by_type(
        &self,
        project_id: &str,
        component_type: ComponentType,
    ) -> RepositoryResult<Vec<Component>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM component
             WHERE project_id = ? AND component_type = ? AND retired = 0
             ORDER BY component_id",
            COMPONENT_COLUMNS
        ))?;

        let components = stmt
            .query_map(params![project_id, component_type.as_str()], map_component_row)?
            .collect::<Result<Vec<Component>, _>>()?;

        Ok(components)
    }

    /// Mark a component retired (excluded from future distributions)
    pub fn retire(&self, component_id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        let affected = conn.execute(
            "UPDATE component SET retired = 1 WHERE component_id = ?",
            params![component_id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Component".to_string(),
                id: component_id.to_string(),
            });
        }
        Ok(())
    }

    /// Record one milestone's completion state and recompute the component's
    /// percent_complete from the current template weights, atomically.
    ///
    /// This is the single touchpoint of the milestone-update routine; the
    /// aggregator only ever reads the resulting percent_complete.
    ///
    /// # Errors
    /// - `NotFound`: no such component
    /// - `FieldValueError`: the milestone name is not in the template for
    ///   the component's type (a mistyped name would otherwise be recorded
    ///   but never move percent_complete)
    pub fn set_milestone_state(
        &self,
        component_id: &str,
        milestone_name: &str,
        completed: bool,
        completed_at: Option<NaiveDateTime>,
    ) -> RepositoryResult<f64> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let scope: Option<(String, String)> = tx
            .query_row(
                "SELECT project_id, component_type FROM component WHERE component_id = ?",
                params![component_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        let (project_id, type_text) = scope.ok_or_else(|| RepositoryError::NotFound {
            entity: "Component".to_string(),
            id: component_id.to_string(),
        })?;

        let known: i64 = tx.query_row(
            "SELECT COUNT(*) FROM milestone_template_entry
             WHERE project_id = ? AND component_type = ? AND milestone_name = ?",
            params![&project_id, &type_text, milestone_name],
            |row| row.get(0),
        )?;
        if known == 0 {
            return Err(RepositoryError::FieldValueError {
                field: "milestone_name".to_string(),
                message: format!(
                    "'{}' is not a milestone of the {} template for project {}",
                    milestone_name, type_text, project_id
                ),
            });
        }

        let affected = tx.execute(
            r#"INSERT INTO component_milestone (component_id, milestone_name, completed, completed_at)
               VALUES (?1, ?2, ?3, ?4)
               ON CONFLICT(component_id, milestone_name)
               DO UPDATE SET completed = ?3, completed_at = ?4"#,
            params![
                component_id,
                milestone_name,
                if completed { 1 } else { 0 },
                completed_at.map(|t| t.format(TIMESTAMP_FMT).to_string()),
            ],
        )?;
        if affected == 0 {
            return Err(RepositoryError::InternalError(format!(
                "milestone upsert affected 0 rows for component {}",
                component_id
            )));
        }

        recompute_percent_for_component(&tx, component_id)?;

        let percent: f64 = tx.query_row(
            "SELECT percent_complete FROM component WHERE component_id = ?",
            params![component_id],
            |row| row.get(0),
        )?;

        tx.commit()?;
        Ok(percent)
    }

    /// Direct percent_complete write for progress sources that do not go
    /// through milestone flags (e.g. external progress imports)
    pub fn set_percent_complete(&self, component_id: &str, percent: f64) -> RepositoryResult<()> {
        if !(0.0..=100.0).contains(&percent) || !percent.is_finite() {
            return Err(RepositoryError::FieldValueError {
                field: "percent_complete".to_string(),
                message: format!("must be within [0, 100], got {}", percent),
            });
        }

        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE component SET percent_complete = ? WHERE component_id = ?",
            params![percent, component_id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Component".to_string(),
                id: component_id.to_string(),
            });
        }
        Ok(())
    }
}

/// Shared insert used by create and batch_insert
fn insert_component(conn: &Connection, component: &Component) -> rusqlite::Result<usize> {
    conn.execute(
        r#"INSERT INTO component (
            component_id, project_id, component_type, size_text, linear_feet,
            area, system_code, test_package, drawing, welder,
            budgeted_effort, effort_weight, percent_complete, retired, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        params![
            &component.component_id,
            &component.project_id,
            component.component_type.as_str(),
            &component.size_text,
            &component.linear_feet,
            &component.area,
            &component.system_code,
            &component.test_package,
            &component.drawing,
            &component.welder,
            &component.budgeted_effort,
            &component.effort_weight,
            &component.percent_complete,
            if component.retired { 1 } else { 0 },
            &component.created_at.format(TIMESTAMP_FMT).to_string(),
        ],
    )
}

/// Set-based percent recompute from completed milestones and current
/// template weights. Components with no completed milestones go to 0.
pub(crate) fn recompute_percent_for_component(
    conn: &Connection,
    component_id: &str,
) -> rusqlite::Result<usize> {
    conn.execute(
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
           WHERE component_id = ?"#,
        params![component_id],
    )
}

/// Map a database row to a Component
pub(crate) fn map_component_row(row: &rusqlite::Row) -> rusqlite::Result<Component> {
    let type_text: String = row.get(2)?;
    let component_type = ComponentType::from_str(&type_text).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            rusqlite::types::Type::Text,
            Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, e)),
        )
    })?;

    Ok(Component {
        component_id: row.get(0)?,
        project_id: row.get(1)?,
        component_type,
        size_text: row.get(3)?,
        linear_feet: row.get(4)?,
        area: row.get(5)?,
        system_code: row.get(6)?,
        test_package: row.get(7)?,
        drawing: row.get(8)?,
        welder: row.get(9)?,
        budgeted_effort: row.get(10)?,
        effort_weight: row.get(11)?,
        percent_complete: row.get(12)?,
        retired: row.get::<_, i32>(13)? == 1,
        created_at: NaiveDateTime::parse_from_str(&row.get::<_, String>(14)?, TIMESTAMP_FMT)
            .map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    14,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })?,
    })
}
