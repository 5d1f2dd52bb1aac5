// ==========================================
// PipeTrak Progress Engine - Tauri commands (split by domain)
// ==========================================
// Responsibility: command definitions wiring the frontend to the APIs
// ==========================================

#![cfg(feature = "tauri-app")]

mod audit;
mod budget;
mod common;
mod component;
mod progress;
mod template;

pub use audit::*;
pub use budget::*;
pub use component::*;
pub use progress::*;
pub use template::*;
