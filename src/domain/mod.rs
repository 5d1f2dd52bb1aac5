// ==========================================
// PipeTrak Progress Engine - domain model layer
// ==========================================
// Responsibility: domain entities and types
// Rule: no data access logic, no engine logic
// ==========================================

pub mod audit;
pub mod budget;
pub mod component;
pub mod milestone;
pub mod types;

// Re-export core types
pub use audit::{AllocationSummary, AuditAction, AuditLog, TemplateChange};
pub use budget::{AllocationWarning, Budget, DistributionResult};
pub use component::{Component, ParsedSize};
pub use milestone::{MilestoneTemplate, MilestoneWeight, TemplateUpdateResult};
pub use types::{ComponentType, GroupDimension};
