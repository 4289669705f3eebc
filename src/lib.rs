pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::{GeminiClient, LocalStorage};
pub use config::Settings;
pub use core::{
    engine::{EnrichmentEngine, EnrichmentReport},
    orchestrator::{EnrichmentOrchestrator, SelectionView},
};
pub use domain::catalog::Catalog;
pub use utils::error::{EnrichError, Result};
