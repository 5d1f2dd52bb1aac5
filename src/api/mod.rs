// ==========================================
// PipeTrak Progress Engine - API layer
// ==========================================
// The service boundary: validates input, orchestrates engines and
// repositories, translates layer errors to ApiError. One struct per
// operation family, all stateless over shared repositories.
// ==========================================

pub mod audit_api;
pub mod budget_api;
pub mod component_api;
pub mod error;
pub mod progress_api;
pub mod template_api;

pub use audit_api::AuditApi;
pub use budget_api::BudgetApi;
pub use component_api::ComponentApi;
pub use error::{ApiError, ApiResult};
pub use progress_api::ProgressApi;
pub use template_api::TemplateApi;
