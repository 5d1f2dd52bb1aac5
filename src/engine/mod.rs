// ==========================================
// PipeTrak Progress Engine - engine layer
// ==========================================
// Responsibility: business rules as pure functions
// Rule: engines do no SQL; every degrade path is surfaced as a warning
// ==========================================

pub mod distributor;
pub mod earned_value;
pub mod milestone_validator;
pub mod size_parser;
pub mod weight;

// Re-export core engines
pub use distributor::{
    ComponentAllocation, DistributionEngine, DistributionError, DistributionPlan,
};
pub use milestone_validator::WeightValidationError;
pub use weight::{WeightCalculator, WeightConfig};
