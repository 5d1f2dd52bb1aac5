// ==========================================
// PipeTrak Progress Engine - audit log domain model
// ==========================================
// Append-only: audit records are created on every mutating operation and
// never updated or deleted. Used for allocation traceability and template
// change history.
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

// ==========================================
// AuditLog - one immutable audit record
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLog {
    pub audit_id: String,         // record ID
    pub project_id: String,       // scoping project
    pub action_type: AuditAction, // stored as string
    pub actor: String,            // acting user
    pub action_ts: NaiveDateTime, // when the action happened
    pub payload_json: Option<JsonValue>, // typed payload (see below)
    pub detail: Option<String>,   // human-readable summary
}

// ==========================================
// AuditAction - audited operation kinds
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    DistributeBudget,      // budget created and distributed over components
    UpdateTemplateWeights, // milestone weight set replaced
    CloneTemplate,         // weight set cloned from another project
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::DistributeBudget => "DISTRIBUTE_BUDGET",
            AuditAction::UpdateTemplateWeights => "UPDATE_TEMPLATE_WEIGHTS",
            AuditAction::CloneTemplate => "CLONE_TEMPLATE",
        }
    }
}

impl std::str::FromStr for AuditAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DISTRIBUTE_BUDGET" => Ok(AuditAction::DistributeBudget),
            "UPDATE_TEMPLATE_WEIGHTS" => Ok(AuditAction::UpdateTemplateWeights),
            "CLONE_TEMPLATE" => Ok(AuditAction::CloneTemplate),
            other => Err(format!("unknown audit action: {}", other)),
        }
    }
}

// ==========================================
// AllocationSummary - payload for DISTRIBUTE_BUDGET
// ==========================================
// Captures which budget version ran, old/new totals and the unparseable-size
// warnings, so an operator can reconstruct the allocation event without logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationSummary {
    pub budget_id: String,
    pub version_number: i32,
    pub total_effort: f64,
    pub previous_total: f64, // Σ budgeted_effort before this distribution
    pub component_count: usize,
    pub post_baseline_count: usize,
    pub total_weight: f64,
    pub warnings: Vec<crate::domain::budget::AllocationWarning>,
    /// Weight configuration snapshot used for this run (exponent etc.)
    pub weight_config: JsonValue,
}

// ==========================================
// TemplateChange - payload for template actions
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateChange {
    pub component_type: String,
    pub old_weights: Vec<crate::domain::milestone::MilestoneWeight>,
    pub new_weights: Vec<crate::domain::milestone::MilestoneWeight>,
    pub retroactive: bool,
}
