// ==========================================
// PipeTrak Progress Engine - progress / earned-value API
// ==========================================
// Responsibility: the GetAggregate RPC boundary. Pure reads, no side
// effects; safe under arbitrary concurrency because earned value is always
// computed fresh from budgeted_effort x percent_complete.
// ==========================================

use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::component::Component;
use crate::domain::types::GroupDimension;
use crate::repository::progress_repo::{ProgressRepository, ProgressRow, ProjectSummary};

// ==========================================
// ProgressApi
// ==========================================
pub struct ProgressApi {
    progress_repo: Arc<ProgressRepository>,
}

impl ProgressApi {
    pub fn new(progress_repo: Arc<ProgressRepository>) -> Self {
        Self { progress_repo }
    }

    /// Budgeted / earned / remaining / percent per bucket of a dimension
    pub fn get_aggregate(
        &self,
        project_id: &str,
        dimension: GroupDimension,
    ) -> ApiResult<Vec<ProgressRow>> {
        if project_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("project id must not be empty".to_string()));
        }
        Ok(self.progress_repo.aggregate(project_id, dimension)?)
    }

    /// Project-level totals
    pub fn get_project_summary(&self, project_id: &str) -> ApiResult<ProjectSummary> {
        if project_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("project id must not be empty".to_string()));
        }
        Ok(self.progress_repo.project_summary(project_id)?)
    }

    /// "Added Components" view: post-baseline additions awaiting the next
    /// budget revision (budgeted_effort = 0 until then)
    pub fn list_added_components(&self, project_id: &str) -> ApiResult<Vec<Component>> {
        if project_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("project id must not be empty".to_string()));
        }
        Ok(self.progress_repo.list_added_components(project_id)?)
    }
}
