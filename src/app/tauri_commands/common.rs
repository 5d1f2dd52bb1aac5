use crate::api::error::ApiError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// shared helpers: error mapping, date parsing
// ==========================================

/// Error response returned to the frontend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(super) struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

/// Serialize an ApiError to a JSON string (Tauri command contract)
pub(super) fn map_api_error(err: ApiError) -> String {
    let error_response = ErrorResponse {
        code: match &err {
            ApiError::InvalidBudget { .. } => "INVALID_BUDGET",
            ApiError::NoComponents { .. } => "NO_COMPONENTS",
            ApiError::ZeroWeight => "ZERO_WEIGHT",
            ApiError::WeightSumError { .. } => "WEIGHT_SUM_ERROR",
            ApiError::WeightValidation(_) => "WEIGHT_VALIDATION_ERROR",
            ApiError::ConcurrentModification { .. } => "CONCURRENT_MODIFICATION",
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::DatabaseError(_) => "DATABASE_ERROR",
            ApiError::DatabaseConnectionError(_) => "DATABASE_CONNECTION_ERROR",
            ApiError::DatabaseTransactionError(_) => "DATABASE_TRANSACTION_ERROR",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
            ApiError::Other(_) => "OTHER_ERROR",
        }
        .to_string(),
        message: err.to_string(),
        details: match &err {
            ApiError::WeightSumError { actual_sum } => {
                Some(serde_json::json!({ "actual_sum": actual_sum }))
            }
            ApiError::ConcurrentModification {
                entity,
                loaded_at,
                actual_at,
            } => Some(serde_json::json!({
                "entity": entity,
                "loaded_at": loaded_at,
                "actual_at": actual_at,
            })),
            _ => None,
        },
    };

    serde_json::to_string(&error_response).unwrap_or_else(|_| err.to_string())
}

/// Parse a YYYY-MM-DD date string
pub(super) fn parse_date(date_str: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|e| format!("invalid date (expected YYYY-MM-DD): {}", e))
}
