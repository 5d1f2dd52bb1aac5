use std::str::FromStr;

use chrono::NaiveDateTime;

use crate::app::state::AppState;
use crate::domain::milestone::MilestoneWeight;
use crate::domain::types::ComponentType;
use crate::repository::template_repo::TIMESTAMP_FMT;

use super::common::map_api_error;

// ==========================================
// milestone template commands
// ==========================================

/// Load the milestone template for one (project, component type)
#[tauri::command(rename_all = "snake_case")]
pub async fn get_template(
    state: tauri::State<'_, AppState>,
    project_id: String,
    component_type: String,
) -> Result<String, String> {
    let component_type = ComponentType::from_str(&component_type)?;

    let result = state
        .template_api
        .get_template(&project_id, component_type)
        .map_err(map_api_error)?;

    serde_json::to_string(&result).map_err(|e| format!("serialization failed: {}", e))
}

/// Replace a milestone weight set
///
/// `weights_json`: JSON array of `{name, weight}` objects.
/// `last_known_updated_at`: the updated_at string loaded with the template;
/// pass null only when creating the first weight set for this slot.
#[tauri::command(rename_all = "snake_case")]
pub async fn update_template_weights(
    state: tauri::State<'_, AppState>,
    project_id: String,
    component_type: String,
    weights_json: String,
    last_known_updated_at: Option<String>,
    apply_retroactively: bool,
    actor: String,
) -> Result<String, String> {
    let component_type = ComponentType::from_str(&component_type)?;

    let weights: Vec<MilestoneWeight> = serde_json::from_str(&weights_json)
        .map_err(|e| format!("invalid weights payload: {}", e))?;

    let lock_token = match last_known_updated_at {
        Some(raw) => Some(
            NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FMT)
                .map_err(|e| format!("invalid updated_at token: {}", e))?,
        ),
        None => None,
    };

    let result = state
        .template_api
        .update_template_weights(
            &project_id,
            component_type,
            weights,
            lock_token,
            apply_retroactively,
            &actor,
        )
        .map_err(map_api_error)?;

    serde_json::to_string(&result).map_err(|e| format!("serialization failed: {}", e))
}

/// Clone a weight set from another project
#[tauri::command(rename_all = "snake_case")]
pub async fn clone_template(
    state: tauri::State<'_, AppState>,
    source_project_id: String,
    target_project_id: String,
    component_type: String,
    actor: String,
) -> Result<String, String> {
    let component_type = ComponentType::from_str(&component_type)?;

    let result = state
        .template_api
        .clone_template(&source_project_id, &target_project_id, component_type, &actor)
        .map_err(map_api_error)?;

    serde_json::to_string(&result).map_err(|e| format!("serialization failed: {}", e))
}
