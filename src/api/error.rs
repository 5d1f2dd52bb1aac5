// ==========================================
// PipeTrak Progress Engine - API layer error types
// ==========================================
// Responsibility: convert engine/repository errors into user-facing
// errors. Every message carries actual-vs-expected context so the operator
// can self-correct without consulting logs.
// ==========================================

use crate::engine::distributor::DistributionError;
use crate::engine::milestone_validator::WeightValidationError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API layer error type
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // distribution precondition failures (recoverable)
    // ==========================================
    #[error("invalid budget: total effort must be a positive number (got {total_effort})")]
    InvalidBudget { total_effort: f64 },

    #[error("no eligible components in project {project_id}: nothing to distribute")]
    NoComponents { project_id: String },

    #[error("eligible components sum to weight 0: nothing to distribute")]
    ZeroWeight,

    // ==========================================
    // milestone weight validation (recoverable)
    // ==========================================
    #[error("milestone weights must sum to exactly 100, got {actual_sum}")]
    WeightSumError { actual_sum: f64 },

    #[error("invalid milestone weight set: {0}")]
    WeightValidation(String),

    // ==========================================
    // concurrency control (recoverable: reload and retry)
    // ==========================================
    #[error("modified by another user: {entity} (loaded {loaded_at}, current {actual_at})")]
    ConcurrentModification {
        entity: String,
        loaded_at: String,
        actual_at: String,
    },

    // ==========================================
    // business rules
    // ==========================================
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not found: {0}")]
    NotFound(String),

    // ==========================================
    // data access
    // ==========================================
    #[error("database error: {0}")]
    DatabaseError(String),

    #[error("database connection failed: {0}")]
    DatabaseConnectionError(String),

    #[error("database transaction failed: {0}")]
    DatabaseTransactionError(String),

    // ==========================================
    // generic
    // ==========================================
    #[error("internal error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// From<RepositoryError>
// Purpose: technical repository errors become user-facing business errors
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::StaleTemplate {
                entity,
                loaded_at,
                actual_at,
            } => ApiError::ConcurrentModification {
                entity,
                loaded_at,
                actual_at,
            },
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{} (id={})", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::DatabaseTransactionError(msg) => {
                ApiError::DatabaseTransactionError(msg)
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("database lock failed: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::InvalidInput(format!("unique constraint violation: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::InvalidInput(format!("foreign key violation: {}", msg))
            }
            RepositoryError::ValidationError(msg) => ApiError::InvalidInput(msg),
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InvalidInput(format!("field {}: {}", field, message))
            }
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

// ==========================================
// DistributionError mapping - precondition failures, reported before any
// mutation happened. Takes the project id so NoComponents names the project.
// ==========================================
impl ApiError {
    pub fn from_distribution(err: DistributionError, project_id: &str) -> Self {
        match err {
            DistributionError::InvalidBudget { total_effort } => {
                ApiError::InvalidBudget { total_effort }
            }
            DistributionError::NoComponents { .. } => ApiError::NoComponents {
                project_id: project_id.to_string(),
            },
            DistributionError::ZeroWeight => ApiError::ZeroWeight,
        }
    }
}

// ==========================================
// From<WeightValidationError> - the sum error keeps its computed sum
// ==========================================
impl From<WeightValidationError> for ApiError {
    fn from(err: WeightValidationError) -> Self {
        match err {
            WeightValidationError::SumMismatch { actual_sum } => {
                ApiError::WeightSumError { actual_sum }
            }
            other => ApiError::WeightValidation(other.to_string()),
        }
    }
}

/// Result type alias
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_conversion() {
        let repo_err = RepositoryError::NotFound {
            entity: "Budget".to_string(),
            id: "B001".to_string(),
        };
        let api_err: ApiError = repo_err.into();
        match api_err {
            ApiError::NotFound(msg) => {
                assert!(msg.contains("Budget"));
                assert!(msg.contains("B001"));
            }
            _ => panic!("expected NotFound"),
        }

        let repo_err = RepositoryError::StaleTemplate {
            entity: "P1/SPOOL".to_string(),
            loaded_at: "2025-01-01 10:00:00.000".to_string(),
            actual_at: "2025-01-01 10:05:00.000".to_string(),
        };
        let api_err: ApiError = repo_err.into();
        assert!(matches!(api_err, ApiError::ConcurrentModification { .. }));
    }

    #[test]
    fn test_weight_sum_error_keeps_actual() {
        let err: ApiError = WeightValidationError::SumMismatch { actual_sum: 95.0 }.into();
        match err {
            ApiError::WeightSumError { actual_sum } => assert_eq!(actual_sum, 95.0),
            _ => panic!("expected WeightSumError"),
        }
    }
}
