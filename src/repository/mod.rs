// ==========================================
// PipeTrak Progress Engine - data repository layer
// ==========================================
// Responsibility: data access, shielding database details
// Rules: no business logic; all queries parameterized; multi-row
// invariants (single active budget, template replace + recompute) are
// enforced with explicit transactions
// ==========================================

pub mod audit_repo;
pub mod budget_repo;
pub mod component_repo;
pub mod error;
pub mod progress_repo;
pub mod template_repo;

// Re-export core repositories
pub use audit_repo::AuditLogRepository;
pub use budget_repo::BudgetRepository;
pub use component_repo::ComponentRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use progress_repo::{ProgressRepository, ProgressRow, ProjectSummary, UNASSIGNED_GROUP};
pub use template_repo::{TemplateLock, TemplateRepository};
