// ==========================================
// PipeTrak Progress Engine - Tauri entry point
// ==========================================
// Stack: Tauri + Rust + SQLite
// ==========================================

// no console window on Windows release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use pipetrak_progress::app::{get_default_db_path, AppState};

#[cfg(feature = "tauri-app")]
fn main() {
    use pipetrak_progress::app::tauri_commands::*;

    pipetrak_progress::logging::init();

    tracing::info!("==================================================");
    tracing::info!("PipeTrak Progress Engine");
    tracing::info!("version: {}", pipetrak_progress::VERSION);
    tracing::info!("==================================================");

    let db_path = get_default_db_path();
    tracing::info!("using database: {}", db_path);

    let app_state = AppState::new(db_path).expect("failed to initialize AppState");

    tauri::Builder::default()
        .manage(app_state)
        .invoke_handler(tauri::generate_handler![
            // ==========================================
            // budget / distribution commands (3)
            // ==========================================
            create_budget,
            get_active_budget,
            list_budgets,
            // ==========================================
            // milestone template commands (3)
            // ==========================================
            get_template,
            update_template_weights,
            clone_template,
            // ==========================================
            // progress / earned-value commands (3)
            // ==========================================
            get_progress_aggregate,
            get_project_summary,
            list_added_components,
            // ==========================================
            // component commands (4)
            // ==========================================
            register_components,
            list_components,
            update_milestone_state,
            retire_component,
            // ==========================================
            // audit trail commands (1)
            // ==========================================
            list_audit_log,
        ])
        .run(tauri::generate_context!())
        .expect("failed to start Tauri application");

    tracing::info!("Tauri application exited");
}

#[cfg(not(feature = "tauri-app"))]
fn main() {
    println!("==================================================");
    println!("PipeTrak Progress Engine");
    println!("version: {}", pipetrak_progress::VERSION);
    println!("==================================================");
    println!();
    println!("this executable requires the tauri-app feature:");
    println!("    cargo run --features tauri-app");
    println!();
    println!("or use the library directly:");
    println!("    use pipetrak_progress::app::AppState;");
    println!();
    println!("default database: {}", get_default_db_path());
}
