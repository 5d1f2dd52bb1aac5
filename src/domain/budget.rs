// ==========================================
// PipeTrak Progress Engine - budget domain model
// ==========================================
// A budget is a versioned, project-scoped total-effort allocation target.
// Exactly one active budget per project at any time; creating a new version
// deactivates the prior one atomically. Versions are never deleted.
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ==========================================
// Budget - versioned allocation target
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub budget_id: String,         // budget ID
    pub project_id: String,        // owning project
    pub total_effort: f64,         // total manhours to distribute
    pub reason: String,            // why this revision exists ("Initial", "Scope change", ...)
    pub effective_date: NaiveDate, // components created after this date are post-baseline
    pub is_active: bool,           // at most one active per project
    pub version_number: i32,       // sequential per project, starting at 1
    pub created_by: String,
    pub created_at: NaiveDateTime,
}

// ==========================================
// DistributionResult - outcome of a budget distribution
// ==========================================
// Returned to the caller of CreateBudget; warnings are non-blocking and must
// always be surfaced (never hidden).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionResult {
    pub budget_id: String,
    pub version_number: i32,
    pub allocated_count: usize, // eligible components that received a share
    pub total_weight: f64,      // sum of eligible effort weights
    pub warnings: Vec<AllocationWarning>,
}

// ==========================================
// AllocationWarning - non-blocking distribution warning
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AllocationWarning {
    /// Size text could not be parsed; the fallback weight was applied
    UnparseableSize { component_id: String, raw: String },
    /// Component created after the budget's effective date; allocated 0
    /// until the next budget revision
    PostBaseline { component_id: String },
}

impl AllocationWarning {
    pub fn component_id(&self) -> &str {
        match self {
            AllocationWarning::UnparseableSize { component_id, .. } => component_id,
            AllocationWarning::PostBaseline { component_id } => component_id,
        }
    }
}
