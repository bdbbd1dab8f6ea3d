//! This module defines the shared state stored in Serenity's global `TypeMap`.

use crate::config::BotConfig;
use crate::lifecycle::{Phase, PhaseError, PhaseTracker};
use crate::services::HomeworkStore;
use serenity::prelude::TypeMapKey;
use std::sync::Arc;
use tokio::sync::Mutex;

/// The central, shared state of the application.
/// An `Arc<AppState>` is stored in the global context for access from any command handler.
pub struct AppState {
    /// The only owner of homework records; handlers read snapshots or call `create`.
    pub store: Arc<HomeworkStore>,
    /// Read-only for the process lifetime.
    pub config: Arc<BotConfig>,
    pub phase: Mutex<PhaseTracker>,
}

impl AppState {
    pub fn new(store: HomeworkStore, config: BotConfig, phase: PhaseTracker) -> Self {
        Self {
            store: Arc::new(store),
            config: Arc::new(config),
            phase: Mutex::new(phase),
        }
    }

    pub async fn from_ctx(ctx: &serenity::prelude::Context) -> Option<Arc<Self>> {
        ctx.data.read().await.get::<AppState>().cloned()
    }

    pub async fn mark_ready(&self) -> Result<(), PhaseError> {
        self.phase.lock().await.advance(Phase::Ready)
    }
}

impl TypeMapKey for AppState {
    type Value = Arc<AppState>;
}
