use std::str::FromStr;

use crate::app::state::AppState;
use crate::domain::types::GroupDimension;

use super::common::map_api_error;

// ==========================================
// progress / earned-value commands
// ==========================================

/// Progress rollup grouped by a dimension (AREA, SYSTEM, TEST_PACKAGE,
/// DRAWING, WELDER)
#[tauri::command(rename_all = "snake_case")]
pub async fn get_progress_aggregate(
    state: tauri::State<'_, AppState>,
    project_id: String,
    dimension: String,
) -> Result<String, String> {
    let dimension = GroupDimension::from_str(&dimension)?;

    let result = state
        .progress_api
        .get_aggregate(&project_id, dimension)
        .map_err(map_api_error)?;

    serde_json::to_string(&result).map_err(|e| format!("serialization failed: {}", e))
}

/// Project-level budgeted / earned / remaining totals
#[tauri::command(rename_all = "snake_case")]
pub async fn get_project_summary(
    state: tauri::State<'_, AppState>,
    project_id: String,
) -> Result<String, String> {
    let result = state
        .progress_api
        .get_project_summary(&project_id)
        .map_err(map_api_error)?;

    serde_json::to_string(&result).map_err(|e| format!("serialization failed: {}", e))
}

/// Components added after the active budget's effective date
#[tauri::command(rename_all = "snake_case")]
pub async fn list_added_components(
    state: tauri::State<'_, AppState>,
    project_id: String,
) -> Result<String, String> {
    let result = state
        .progress_api
        .list_added_components(&project_id)
        .map_err(map_api_error)?;

    serde_json::to_string(&result).map_err(|e| format!("serialization failed: {}", e))
}
