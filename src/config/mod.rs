#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command};
pub use toml_config::{
    AppConfig, BatchConfig, DuplicatePolicy, PricingConfig, PricingModelKind, ProviderConfig,
    StoreConfig, StoreKind,
};
