// ==========================================
// PipeTrak Progress Engine - audit log API
// ==========================================
// Read side of the append-only audit trail. Records are written by the
// budget and template transactions themselves; this API only queries.
// ==========================================

use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::audit::{AuditAction, AuditLog};
use crate::repository::audit_repo::AuditLogRepository;

pub struct AuditApi {
    audit_repo: Arc<AuditLogRepository>,
}

impl AuditApi {
    pub fn new(audit_repo: Arc<AuditLogRepository>) -> Self {
        Self { audit_repo }
    }

    /// Full audit trail of a project, newest first
    pub fn list_by_project(&self, project_id: &str) -> ApiResult<Vec<AuditLog>> {
        if project_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("project id must not be empty".to_string()));
        }
        Ok(self.audit_repo.list_by_project(project_id)?)
    }

    /// Audit trail filtered by action kind
    pub fn list_by_action(
        &self,
        project_id: &str,
        action: AuditAction,
    ) -> ApiResult<Vec<AuditLog>> {
        if project_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("project id must not be empty".to_string()));
        }
        Ok(self.audit_repo.list_by_action(project_id, action)?)
    }
}
