// ==========================================
// PipeTrak Progress Engine - core library
// ==========================================
// Stack: Tauri + Rust + SQLite
// Scope: milestone-weighted earned-value tracking for pipe construction
// ==========================================

// ==========================================
// module declarations
// ==========================================

// domain layer - entities and types
pub mod domain;

// repository layer - data access
pub mod repository;

// engine layer - business rules
pub mod engine;

// configuration layer
pub mod config;

// database infrastructure (connection setup / unified PRAGMAs)
pub mod db;

// logging
pub mod logging;

// API layer - business interface
pub mod api;

// application layer - Tauri integration
pub mod app;

// ==========================================
// core type re-exports
// ==========================================

// domain types
pub use domain::types::{ComponentType, GroupDimension};

// domain entities
pub use domain::{
    AllocationWarning, AuditAction, AuditLog, Budget, Component, DistributionResult,
    MilestoneTemplate, MilestoneWeight, ParsedSize, TemplateUpdateResult,
};

// engines
pub use engine::{
    DistributionEngine, DistributionError, DistributionPlan, WeightCalculator, WeightConfig,
    WeightValidationError,
};

// API
pub use api::{ApiError, ApiResult, BudgetApi, ComponentApi, ProgressApi, TemplateApi};

// ==========================================
// constants
// ==========================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const APP_NAME: &str = "PipeTrak Progress Engine";
