pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "server")]
pub mod api;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::{MemoryStore, PvgisClient, RestStore};
pub use crate::config::AppConfig;
pub use crate::core::{BatchOrchestrator, IrradianceProxy, Services};
pub use crate::utils::error::{Result, SolarError};
