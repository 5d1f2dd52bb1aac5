// ==========================================
// PipeTrak Progress Engine - milestone template API
// ==========================================
// Responsibility: the UpdateTemplateWeights RPC boundary. Every write path
// (bulk edit, single tweak, clone) runs through the one engine validator,
// then the repository commits weights + optional retroactive recompute +
// audit record in a single transaction with the optimistic-lock check.
// ==========================================

use std::sync::Arc;

use chrono::{NaiveDateTime, Utc};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::audit::{AuditAction, AuditLog, TemplateChange};
use crate::domain::milestone::{MilestoneTemplate, MilestoneWeight, TemplateUpdateResult};
use crate::domain::types::ComponentType;
use crate::engine::milestone_validator;
use crate::repository::template_repo::{TemplateLock, TemplateRepository};

// ==========================================
// TemplateApi
// ==========================================
pub struct TemplateApi {
    template_repo: Arc<TemplateRepository>,
}

impl TemplateApi {
    pub fn new(template_repo: Arc<TemplateRepository>) -> Self {
        Self { template_repo }
    }

    /// Load the template for one (project, component type)
    pub fn get_template(
        &self,
        project_id: &str,
        component_type: ComponentType,
    ) -> ApiResult<Option<MilestoneTemplate>> {
        Ok(self.template_repo.find(project_id, component_type)?)
    }

    /// Replace a milestone weight set
    ///
    /// # Arguments
    /// - `last_known_updated_at`: optimistic-lock token loaded with the
    ///   template; a mismatch aborts with ConcurrentModification and the
    ///   editor reloads. None is accepted only for the first write into an
    ///   empty slot and is rejected once a weight set exists.
    /// - `apply_retroactively`: recompute percent_complete of existing
    ///   components of this type against the new weights, in the same
    ///   transaction
    ///
    /// # Errors
    /// - `WeightSumError` with the computed sum if Σ weight != 100
    /// - `ConcurrentModification` on a stale token
    pub fn update_template_weights(
        &self,
        project_id: &str,
        component_type: ComponentType,
        weights: Vec<MilestoneWeight>,
        last_known_updated_at: Option<NaiveDateTime>,
        apply_retroactively: bool,
        actor: &str,
    ) -> ApiResult<TemplateUpdateResult> {
        if project_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("project id must not be empty".to_string()));
        }

        milestone_validator::validate(&weights)?;

        let old_weights = self
            .template_repo
            .find(project_id, component_type)?
            .map(|t| t.weights)
            .unwrap_or_default();

        let lock = match last_known_updated_at {
            Some(loaded) => TemplateLock::Loaded(loaded),
            None => TemplateLock::FirstWrite,
        };

        self.commit(
            project_id,
            component_type,
            weights,
            old_weights,
            lock,
            apply_retroactively,
            AuditAction::UpdateTemplateWeights,
            actor,
        )
    }

    /// Clone a weight set from another project into this one
    ///
    /// Same validator, same transaction shape as a direct edit; an invalid
    /// source template can never be propagated by cloning.
    pub fn clone_template(
        &self,
        source_project_id: &str,
        target_project_id: &str,
        component_type: ComponentType,
        actor: &str,
    ) -> ApiResult<TemplateUpdateResult> {
        let source = self
            .template_repo
            .find(source_project_id, component_type)?
            .ok_or_else(|| {
                ApiError::NotFound(format!(
                    "milestone template {}/{}",
                    source_project_id, component_type
                ))
            })?;

        milestone_validator::validate(&source.weights)?;

        let old_weights = self
            .template_repo
            .find(target_project_id, component_type)?
            .map(|t| t.weights)
            .unwrap_or_default();

        // cloning replaces whatever the target had; the target editor is
        // not mid-edit, so no lock token applies
        self.commit(
            target_project_id,
            component_type,
            source.weights,
            old_weights,
            TemplateLock::Replace,
            false,
            AuditAction::CloneTemplate,
            actor,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn commit(
        &self,
        project_id: &str,
        component_type: ComponentType,
        weights: Vec<MilestoneWeight>,
        old_weights: Vec<MilestoneWeight>,
        lock: TemplateLock,
        apply_retroactively: bool,
        action: AuditAction,
        actor: &str,
    ) -> ApiResult<TemplateUpdateResult> {
        let change = TemplateChange {
            component_type: component_type.to_string(),
            old_weights,
            new_weights: weights.clone(),
            retroactive: apply_retroactively,
        };

        let audit = AuditLog {
            audit_id: Uuid::new_v4().to_string(),
            project_id: project_id.to_string(),
            action_type: action,
            actor: actor.to_string(),
            action_ts: Utc::now().naive_utc(),
            payload_json: Some(
                serde_json::to_value(&change)
                    .map_err(|e| ApiError::InternalError(e.to_string()))?,
            ),
            detail: Some(format!(
                "{}: {} milestones for {}",
                action.as_str(),
                weights.len(),
                component_type
            )),
        };

        let (updated_at, recomputed) = self.template_repo.replace_weights(
            project_id,
            component_type,
            &weights,
            lock,
            apply_retroactively,
            &audit,
        )?;

        tracing::info!(
            project_id,
            component_type = %component_type,
            milestones = weights.len(),
            retroactive = apply_retroactively,
            recomputed,
            "milestone template updated"
        );

        Ok(TemplateUpdateResult {
            component_type,
            milestone_count: weights.len(),
            recomputed_components: recomputed,
            updated_at,
        })
    }
}
