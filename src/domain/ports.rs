use crate::domain::irradiance::IrradianceParams;
use crate::domain::model::SolarEnergyRecord;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Keyed lookup over the persisted yield records.
///
/// `Ok(None)` means "not found"; `Err` is reserved for store-level failures.
#[async_trait]
pub trait SolarDataStore: Send + Sync {
    async fn find_by_id(&self, solar_energy_id: &str) -> Result<Option<SolarEnergyRecord>>;
}

/// One call to the external photovoltaic-potential provider.
#[async_trait]
pub trait IrradianceProvider: Send + Sync {
    async fn fetch(&self, params: &IrradianceParams) -> Result<serde_json::Value>;
}
