//! Startup sequence: `Starting -> ConfigLoaded -> Connected -> Hydrated -> Ready`.
//!
//! Phases only move forward one step at a time. A missing chat token stops the process
//! before anything else runs; a bad settings file only downgrades the configuration.

use crate::config::{self, BotConfig};
use crate::database::{self, StoreError};
use crate::services::HomeworkStore;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Starting,
    ConfigLoaded,
    Connected,
    Hydrated,
    Ready,
}

impl Phase {
    pub fn next(self) -> Option<Phase> {
        match self {
            Self::Starting => Some(Self::ConfigLoaded),
            Self::ConfigLoaded => Some(Self::Connected),
            Self::Connected => Some(Self::Hydrated),
            Self::Hydrated => Some(Self::Ready),
            Self::Ready => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Starting => "starting",
            Self::ConfigLoaded => "config-loaded",
            Self::Connected => "connected",
            Self::Hydrated => "hydrated",
            Self::Ready => "ready",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseError {
    pub from: Phase,
    pub to: Phase,
}

impl Display for PhaseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "illegal lifecycle transition {} -> {}",
            self.from.as_str(),
            self.to.as_str()
        )
    }
}

impl Error for PhaseError {}

#[derive(Debug)]
pub struct PhaseTracker {
    current: Phase,
}

impl Default for PhaseTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseTracker {
    pub fn new() -> Self {
        Self {
            current: Phase::Starting,
        }
    }

    pub fn current(&self) -> Phase {
        self.current
    }

    pub fn advance(&mut self, to: Phase) -> Result<(), PhaseError> {
        if self.current.next() != Some(to) {
            return Err(PhaseError {
                from: self.current,
                to,
            });
        }
        info!(target = "lifecycle", from = self.current.as_str(), to = to.as_str(), "phase change");
        self.current = to;
        Ok(())
    }
}

#[derive(Debug)]
pub enum StartupError {
    MissingToken,
    Storage(StoreError),
    Phase(PhaseError),
}

impl Display for StartupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingToken => write!(f, "DISCORD_TOKEN is not set"),
            Self::Storage(err) => write!(f, "storage unavailable: {err}"),
            Self::Phase(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StartupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::MissingToken => None,
            Self::Storage(err) => Some(err),
            Self::Phase(err) => Some(err),
        }
    }
}

impl From<StoreError> for StartupError {
    fn from(value: StoreError) -> Self {
        Self::Storage(value)
    }
}

impl From<PhaseError> for StartupError {
    fn from(value: PhaseError) -> Self {
        Self::Phase(value)
    }
}

/// Accepts the chat credential only when present and non-blank.
pub fn require_token(raw: Option<String>) -> Result<String, StartupError> {
    raw.map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or(StartupError::MissingToken)
}

/// Everything the gateway client needs once startup has reached `Hydrated`.
pub struct Bootstrapped {
    pub config: BotConfig,
    pub store: HomeworkStore,
    pub tracker: PhaseTracker,
}

/// Runs config-load, storage connect and cache hydration in order.
pub async fn bootstrap(
    config_path: impl AsRef<Path>,
    database_url: &str,
) -> Result<Bootstrapped, StartupError> {
    let mut tracker = PhaseTracker::new();

    let config = config::load_config(config_path);
    tracker.advance(Phase::ConfigLoaded)?;

    let pool = database::connect(database_url).await?;
    tracker.advance(Phase::Connected)?;

    let store = HomeworkStore::new(pool);
    let loaded = store.hydrate().await;
    tracker.advance(Phase::Hydrated)?;
    info!(target = "lifecycle", records = loaded, "homework cache hydrated");

    Ok(Bootstrapped {
        config,
        store,
        tracker,
    })
}
