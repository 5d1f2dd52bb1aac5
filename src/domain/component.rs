// ==========================================
// PipeTrak Progress Engine - component domain model
// ==========================================
// A component is a physical, trackable item (spool, weld, valve, ...)
// belonging to a project. budgeted_effort / effort_weight are written only
// by the budget distributor; percent_complete is maintained by milestone
// updates and read by the aggregator.
// ==========================================

use crate::domain::types::ComponentType;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// Component - trackable item
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    pub component_id: String,          // opaque identifier
    pub project_id: String,            // owning project
    pub component_type: ComponentType, // discriminator
    pub size_text: Option<String>,     // raw nominal-diameter string ("2", "1/2", "2X4", "NOSIZE")
    pub linear_feet: Option<f64>,      // length, meaningful for THREADED_PIPE only

    // ===== grouping dimensions =====
    pub area: Option<String>,
    pub system_code: Option<String>,
    pub test_package: Option<String>,
    pub drawing: Option<String>,
    pub welder: Option<String>,

    // ===== allocation results (written only by the distributor) =====
    pub budgeted_effort: f64, // manhours allocated by the last distribution
    pub effort_weight: f64,   // relative weight used in the last distribution

    // ===== progress (written by milestone updates) =====
    pub percent_complete: f64, // 0-100

    pub retired: bool, // retired components are excluded from distribution
    pub created_at: NaiveDateTime,
}

impl Component {
    /// Raw size text, treating NULL as empty
    pub fn size_text_or_empty(&self) -> &str {
        self.size_text.as_deref().unwrap_or("")
    }
}

// ==========================================
// ParsedSize - size parser result
// ==========================================
// Tagged union rather than nullable-everywhere primitives: downstream code
// must handle the no-size branch explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParsedSize {
    /// Single nominal diameter, inches
    Diameter { inches: f64 },
    /// Reducer, e.g. "2X4" (order preserved as written; weight is symmetric)
    Reducer { first: f64, second: f64 },
    /// Empty string or the "NOSIZE" sentinel: deliberately size-less
    NoSize,
    /// Anything else that failed to parse; carries the raw text for warnings
    Unparseable { raw: String },
}

impl ParsedSize {
    /// True for both the sentinel and the degrade path (fallback weight applies)
    pub fn is_sizeless(&self) -> bool {
        matches!(self, ParsedSize::NoSize | ParsedSize::Unparseable { .. })
    }
}
