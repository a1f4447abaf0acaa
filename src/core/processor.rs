use crate::core::pricing::{efficiency_fraction, PricingModel};
use crate::domain::model::{ItemFailure, ItemOutcome, SimulationRequestItem};
use crate::domain::ports::SolarDataStore;
use std::sync::Arc;

/// Turns one request item into exactly one outcome. Never returns an error:
/// every failure ends up as an `ItemOutcome::Failed`.
pub struct ItemProcessor {
    store: Arc<dyn SolarDataStore>,
    pricing: PricingModel,
}

impl ItemProcessor {
    pub fn new(store: Arc<dyn SolarDataStore>, pricing: PricingModel) -> Self {
        Self { store, pricing }
    }

    pub fn validate(item: &SimulationRequestItem) -> Result<(), ItemFailure> {
        let surface_ok = item.surface_area.is_finite() && item.surface_area != 0.0;
        let efficiency_ok = item.panel_efficiency_percent.is_finite();
        let id_ok = !item.solar_energy_id.is_empty();

        if surface_ok && efficiency_ok && id_ok {
            Ok(())
        } else {
            Err(ItemFailure::InvalidParameters)
        }
    }

    pub async fn process(&self, item: &SimulationRequestItem) -> ItemOutcome {
        if let Err(failure) = Self::validate(item) {
            tracing::debug!("Item '{}' rejected: {}", item.solar_energy_id, failure);
            return ItemOutcome::failed(failure);
        }

        let efficiency = efficiency_fraction(item.panel_efficiency_percent);

        let record = match self.store.find_by_id(&item.solar_energy_id).await {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Lookup failed for '{}': {}", item.solar_energy_id, e);
                return ItemOutcome::failed(ItemFailure::ProcessingError);
            }
        };

        let Some(yearly_energy) = record.as_ref().and_then(|r| r.usable_yield()) else {
            tracing::debug!("No solar data for '{}'", item.solar_energy_id);
            return ItemOutcome::failed(ItemFailure::SolarDataNotFound);
        };

        match self.pricing.compute(yearly_energy, item.surface_area, efficiency) {
            Ok(result) => ItemOutcome::Computed(result),
            Err(e) => {
                tracing::warn!("Computation failed for '{}': {}", item.solar_energy_id, e);
                ItemOutcome::failed(ItemFailure::ProcessingError)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStore;
    use crate::domain::model::SolarEnergyRecord;
    use crate::utils::error::{Result, SolarError};
    use async_trait::async_trait;

    struct FailingStore;

    #[async_trait]
    impl SolarDataStore for FailingStore {
        async fn find_by_id(&self, _solar_energy_id: &str) -> Result<Option<SolarEnergyRecord>> {
            Err(SolarError::StoreError {
                message: "connection reset".to_string(),
            })
        }
    }

    fn item(surface: f64, efficiency: f64, id: &str) -> SimulationRequestItem {
        SimulationRequestItem {
            surface_area: surface,
            panel_efficiency_percent: efficiency,
            solar_energy_id: id.to_string(),
        }
    }

    fn processor() -> ItemProcessor {
        let store = MemoryStore::from_records(vec![
            SolarEnergyRecord::new("se-1", 1000.0),
            SolarEnergyRecord::new("se-zero", 0.0),
        ]);
        ItemProcessor::new(Arc::new(store), PricingModel::Flat { price_per_kwh: 0.1 })
    }

    #[test]
    fn test_validate() {
        assert!(ItemProcessor::validate(&item(10.0, 20.0, "se-1")).is_ok());
        assert!(ItemProcessor::validate(&item(-10.0, 20.0, "se-1")).is_ok());
        assert!(ItemProcessor::validate(&item(0.0, 20.0, "se-1")).is_err());
        assert!(ItemProcessor::validate(&item(f64::NAN, 20.0, "se-1")).is_err());
        assert!(ItemProcessor::validate(&item(f64::INFINITY, 20.0, "se-1")).is_err());
        assert!(ItemProcessor::validate(&item(10.0, f64::NAN, "se-1")).is_err());
        assert!(ItemProcessor::validate(&item(10.0, 20.0, "")).is_err());
    }

    #[tokio::test]
    async fn test_process_computes_result() {
        let outcome = processor().process(&item(20.0, 20.0, "se-1")).await;

        match outcome {
            ItemOutcome::Computed(result) => {
                assert_eq!(result.yearly_energy, 1000.0);
                assert_eq!(result.surface_area, 20.0);
                assert!((result.amount_euros_per_year - 400.0).abs() < 1e-9);
            }
            other => panic!("expected a result, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_process_invalid_and_missing() {
        let p = processor();

        let outcome = p.process(&item(0.0, 20.0, "se-1")).await;
        assert_eq!(outcome.error_message(), Some("Invalid parameters"));

        let outcome = p.process(&item(10.0, 20.0, "se-unknown")).await;
        assert_eq!(outcome.error_message(), Some("Solar data not found"));

        let outcome = p.process(&item(10.0, 20.0, "se-zero")).await;
        assert_eq!(outcome.error_message(), Some("Solar data not found"));
    }

    #[tokio::test]
    async fn test_store_failure_is_contained() {
        let p = ItemProcessor::new(Arc::new(FailingStore), PricingModel::default());
        let outcome = p.process(&item(10.0, 20.0, "se-1")).await;
        assert_eq!(outcome.error_message(), Some("Processing error"));
    }
}
