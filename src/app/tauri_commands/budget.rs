use crate::app::state::AppState;

use super::common::{map_api_error, parse_date};

// ==========================================
// budget / distribution commands
// ==========================================

/// Create a budget revision and distribute it over the project
#[tauri::command(rename_all = "snake_case")]
pub async fn create_budget(
    state: tauri::State<'_, AppState>,
    project_id: String,
    total_effort: f64,
    reason: String,
    effective_date: String,
    created_by: String,
) -> Result<String, String> {
    let date = parse_date(&effective_date)?;

    let result = state
        .budget_api
        .create_budget(&project_id, total_effort, &reason, date, &created_by)
        .map_err(map_api_error)?;

    serde_json::to_string(&result).map_err(|e| format!("serialization failed: {}", e))
}

/// Active budget of a project (null when none exists yet)
#[tauri::command(rename_all = "snake_case")]
pub async fn get_active_budget(
    state: tauri::State<'_, AppState>,
    project_id: String,
) -> Result<String, String> {
    let result = state
        .budget_api
        .get_active_budget(&project_id)
        .map_err(map_api_error)?;

    serde_json::to_string(&result).map_err(|e| format!("serialization failed: {}", e))
}

/// Full budget version history, newest first
#[tauri::command(rename_all = "snake_case")]
pub async fn list_budgets(
    state: tauri::State<'_, AppState>,
    project_id: String,
) -> Result<String, String> {
    let result = state
        .budget_api
        .list_budgets(&project_id)
        .map_err(map_api_error)?;

    serde_json::to_string(&result).map_err(|e| format!("serialization failed: {}", e))
}
