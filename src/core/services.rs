use crate::adapters::{store::build_store, PvgisClient};
use crate::config::AppConfig;
use crate::core::batch::BatchOrchestrator;
use crate::core::irradiance::IrradianceProxy;
use crate::core::pricing::PricingModel;
use crate::core::processor::ItemProcessor;
use crate::domain::ports::{IrradianceProvider, SolarDataStore};
use crate::utils::error::Result;
use std::sync::Arc;

/// Both entry points, wired from configuration. Shared by the CLI and the HTTP API.
pub struct Services {
    pub batch: BatchOrchestrator,
    pub irradiance: IrradianceProxy,
}

impl Services {
    pub fn new(
        store: Arc<dyn SolarDataStore>,
        provider: Arc<dyn IrradianceProvider>,
        config: &AppConfig,
    ) -> Self {
        let processor = ItemProcessor::new(store, PricingModel::from_config(&config.pricing));
        Self {
            batch: BatchOrchestrator::new(processor)
                .with_duplicate_policy(config.batch.duplicate_ids),
            irradiance: IrradianceProxy::new(provider),
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let store = build_store(&config.store)?;
        let provider: Arc<dyn IrradianceProvider> =
            Arc::new(PvgisClient::new(config.provider.clone())?);
        tracing::debug!(
            "Services ready (store: {:?}, pricing: {:?})",
            config.store.r#type,
            config.pricing.model
        );
        Ok(Self::new(store, provider, config))
    }
}
