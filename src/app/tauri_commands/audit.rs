use std::str::FromStr;

use crate::app::state::AppState;
use crate::domain::audit::AuditAction;

use super::common::map_api_error;

// ==========================================
// audit trail commands
// ==========================================

/// Full audit trail of a project, newest first
#[tauri::command(rename_all = "snake_case")]
pub async fn list_audit_log(
    state: tauri::State<'_, AppState>,
    project_id: String,
    action_type: Option<String>,
) -> Result<String, String> {
    let result = match action_type {
        Some(raw) => {
            let action = AuditAction::from_str(&raw)?;
            state
                .audit_api
                .list_by_action(&project_id, action)
                .map_err(map_api_error)?
        }
        None => state
            .audit_api
            .list_by_project(&project_id)
            .map_err(map_api_error)?,
    };

    serde_json::to_string(&result).map_err(|e| format!("serialization failed: {}", e))
}
