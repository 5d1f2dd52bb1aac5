use crate::app::state::AppState;
use crate::domain::component::Component;

use super::common::map_api_error;

// ==========================================
// component commands
// ==========================================

/// Register a batch of components (JSON array of Component objects)
#[tauri::command(rename_all = "snake_case")]
pub async fn register_components(
    state: tauri::State<'_, AppState>,
    components_json: String,
) -> Result<String, String> {
    let components: Vec<Component> = serde_json::from_str(&components_json)
        .map_err(|e| format!("invalid components payload: {}", e))?;

    let count = state
        .component_api
        .register_components(components)
        .map_err(map_api_error)?;

    serde_json::to_string(&serde_json::json!({ "registered": count }))
        .map_err(|e| format!("serialization failed: {}", e))
}

/// All non-retired components of a project
#[tauri::command(rename_all = "snake_case")]
pub async fn list_components(
    state: tauri::State<'_, AppState>,
    project_id: String,
) -> Result<String, String> {
    let result = state
        .component_api
        .list_components(&project_id)
        .map_err(map_api_error)?;

    serde_json::to_string(&result).map_err(|e| format!("serialization failed: {}", e))
}

/// Mark one milestone complete/incomplete; returns the new percent_complete
#[tauri::command(rename_all = "snake_case")]
pub async fn update_milestone_state(
    state: tauri::State<'_, AppState>,
    component_id: String,
    milestone_name: String,
    completed: bool,
) -> Result<String, String> {
    let percent = state
        .component_api
        .update_milestone_state(&component_id, &milestone_name, completed)
        .map_err(map_api_error)?;

    serde_json::to_string(&serde_json::json!({ "percent_complete": percent }))
        .map_err(|e| format!("serialization failed: {}", e))
}

/// Retire a component
#[tauri::command(rename_all = "snake_case")]
pub async fn retire_component(
    state: tauri::State<'_, AppState>,
    component_id: String,
) -> Result<String, String> {
    state
        .component_api
        .retire_component(&component_id)
        .map_err(map_api_error)?;

    Ok("{}".to_string())
}
