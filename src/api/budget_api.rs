// ==========================================
// PipeTrak Progress Engine - budget API
// ==========================================
// Responsibility: the CreateBudget RPC boundary. Collects the project's
// components, runs the pure distribution plan, and hands the result to the
// repository for one atomic commit. Precondition failures surface before
// any mutation; warnings are returned to the caller, never swallowed.
// ==========================================

use std::sync::Arc;

use chrono::NaiveDate;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::budget::{Budget, DistributionResult};
use crate::engine::distributor::DistributionEngine;
use crate::repository::budget_repo::BudgetRepository;
use crate::repository::component_repo::ComponentRepository;

// ==========================================
// BudgetApi
// ==========================================
pub struct BudgetApi {
    engine: DistributionEngine,
    budget_repo: Arc<BudgetRepository>,
    component_repo: Arc<ComponentRepository>,
}

impl BudgetApi {
    pub fn new(
        engine: DistributionEngine,
        budget_repo: Arc<BudgetRepository>,
        component_repo: Arc<ComponentRepository>,
    ) -> Self {
        Self {
            engine,
            budget_repo,
            component_repo,
        }
    }

    /// Create a new budget version and distribute it over the project
    ///
    /// # Arguments
    /// - `project_id`: owning project
    /// - `total_effort`: total manhours to distribute (> 0)
    /// - `reason`: why this revision exists
    /// - `effective_date`: components created after this date are excluded
    ///   (post-baseline) until the next revision
    /// - `created_by`: acting user (recorded on budget and audit record)
    ///
    /// # Returns
    /// - `Ok(DistributionResult)`: allocation counts, total weight, warnings
    /// - `Err(ApiError)`: InvalidBudget / NoComponents / ZeroWeight before
    ///   any write; transaction failures leave no partial state
    pub fn create_budget(
        &self,
        project_id: &str,
        total_effort: f64,
        reason: &str,
        effective_date: NaiveDate,
        created_by: &str,
    ) -> ApiResult<DistributionResult> {
        if project_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("project id must not be empty".to_string()));
        }
        if created_by.trim().is_empty() {
            return Err(ApiError::InvalidInput("created_by must not be empty".to_string()));
        }

        let components = self.component_repo.find_active_by_project(project_id)?;

        let plan = self
            .engine
            .plan(&components, total_effort, effective_date)
            .map_err(|e| ApiError::from_distribution(e, project_id))?;

        let budget = self.budget_repo.apply_distribution(
            project_id,
            total_effort,
            reason,
            effective_date,
            created_by,
            &plan,
            self.engine.weight_calculator().config(),
        )?;

        tracing::info!(
            project_id,
            budget_id = %budget.budget_id,
            version = budget.version_number,
            total_effort,
            eligible = plan.eligible_count,
            post_baseline = plan.post_baseline_count,
            warnings = plan.warnings.len(),
            "budget distributed"
        );

        Ok(DistributionResult {
            budget_id: budget.budget_id,
            version_number: budget.version_number,
            allocated_count: plan.eligible_count,
            total_weight: plan.total_weight,
            warnings: plan.warnings,
        })
    }

    /// Active budget of a project
    pub fn get_active_budget(&self, project_id: &str) -> ApiResult<Option<Budget>> {
        Ok(self.budget_repo.find_active(project_id)?)
    }

    /// Full budget version history, newest first (never deleted)
    pub fn list_budgets(&self, project_id: &str) -> ApiResult<Vec<Budget>> {
        Ok(self.budget_repo.list_by_project(project_id)?)
    }
}
