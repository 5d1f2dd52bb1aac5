// ==========================================
// PipeTrak Progress Engine - component API
// ==========================================
// Responsibility: component registration and the milestone-update
// touchpoint. Registration never touches budgeted_effort - a component
// registered after the active budget's effective date stays at 0 until the
// next distribution (post-baseline rule).
// ==========================================

use std::sync::Arc;

use chrono::Utc;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::component::Component;
use crate::repository::component_repo::ComponentRepository;

// ==========================================
// ComponentApi
// ==========================================
pub struct ComponentApi {
    component_repo: Arc<ComponentRepository>,
}

impl ComponentApi {
    pub fn new(component_repo: Arc<ComponentRepository>) -> Self {
        Self { component_repo }
    }

    /// Register a batch of components
    ///
    /// budgeted_effort / effort_weight / percent_complete always start at
    /// 0 regardless of what the caller supplied.
    pub fn register_components(&self, mut components: Vec<Component>) -> ApiResult<usize> {
        if components.is_empty() {
            return Ok(0);
        }

        let now = Utc::now().naive_utc();
        for component in &mut components {
            if component.component_id.trim().is_empty() {
                return Err(ApiError::InvalidInput(
                    "component id must not be empty".to_string(),
                ));
            }
            component.budgeted_effort = 0.0;
            component.effort_weight = 0.0;
            component.percent_complete = 0.0;
            component.retired = false;
            if component.created_at.and_utc().timestamp() == 0 {
                component.created_at = now;
            }
        }

        let count = self.component_repo.batch_insert(&components)?;
        tracing::info!(count, "components registered");
        Ok(count)
    }

    /// Fetch one component
    pub fn get_component(&self, component_id: &str) -> ApiResult<Component> {
        self.component_repo
            .find_by_id(component_id)?
            .ok_or_else(|| ApiError::NotFound(format!("Component (id={})", component_id)))
    }

    /// All non-retired components of a project
    pub fn list_components(&self, project_id: &str) -> ApiResult<Vec<Component>> {
        Ok(self.component_repo.find_active_by_project(project_id)?)
    }

    /// Mark one milestone complete/incomplete and recompute the
    /// component's percent_complete from the current template weights.
    ///
    /// Returns the new percent_complete. This is the only write path into
    /// percent_complete besides the retroactive template recompute; earned
    /// value itself is never stored anywhere.
    pub fn update_milestone_state(
        &self,
        component_id: &str,
        milestone_name: &str,
        completed: bool,
    ) -> ApiResult<f64> {
        if milestone_name.trim().is_empty() {
            return Err(ApiError::InvalidInput(
                "milestone name must not be empty".to_string(),
            ));
        }

        let completed_at = completed.then(|| Utc::now().naive_utc());
        let percent = self.component_repo.set_milestone_state(
            component_id,
            milestone_name,
            completed,
            completed_at,
        )?;

        tracing::debug!(component_id, milestone_name, completed, percent, "milestone updated");
        Ok(percent)
    }

    /// Retire a component (excluded from future distributions and rollups)
    pub fn retire_component(&self, component_id: &str) -> ApiResult<()> {
        Ok(self.component_repo.retire(component_id)?)
    }
}
