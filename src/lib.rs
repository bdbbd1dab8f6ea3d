// Library entry so integration tests and external tools can reference internal modules.
// Re-export the same modules used by the binary (`main.rs`).
pub mod commands;
pub mod config;
pub mod database;
pub mod handler;
pub mod lifecycle;
pub mod logging;
pub mod model;
pub mod services;

pub use model::AppState;
