pub mod batch;
pub mod irradiance;
pub mod pricing;
pub mod processor;
pub mod services;

pub use crate::domain::model::{BatchResponse, ItemOutcome, SimulationRequestItem};
pub use crate::domain::ports::{IrradianceProvider, SolarDataStore};
pub use crate::utils::error::Result;
pub use batch::{BatchError, BatchOrchestrator};
pub use irradiance::IrradianceProxy;
pub use services::Services;
