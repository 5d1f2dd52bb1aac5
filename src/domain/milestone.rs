// ==========================================
// PipeTrak Progress Engine - milestone template domain model
// ==========================================
// A milestone template defines, per (project, component type), the named
// completion stages and their percentage weights. The weights of one
// template must sum to exactly 100 (enforced by the single validator in
// engine::milestone_validator before any write path commits).
// ==========================================

use crate::domain::types::ComponentType;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// MilestoneWeight - one named milestone and its weight
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilestoneWeight {
    pub name: String, // e.g. "Fit-up", "Weld", "Test"
    pub weight: f64,  // 0-100; 0 marks an optional/skippable milestone
}

impl MilestoneWeight {
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            weight,
        }
    }
}

// ==========================================
// MilestoneTemplate - weight set for one (project, component type)
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MilestoneTemplate {
    pub project_id: String,
    pub component_type: ComponentType,
    pub weights: Vec<MilestoneWeight>, // in sort order
    /// Last-modified timestamp; optimistic-lock token for template edits.
    /// A writer whose loaded timestamp no longer matches must reload.
    pub updated_at: NaiveDateTime,
}

// ==========================================
// TemplateUpdateResult - outcome of UpdateTemplateWeights
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateUpdateResult {
    pub component_type: ComponentType,
    pub milestone_count: usize,
    /// Components whose percent_complete was recomputed (0 unless the
    /// retroactive pass was requested)
    pub recomputed_components: usize,
    pub updated_at: NaiveDateTime,
}
