use crate::config::DuplicatePolicy;
use crate::core::processor::ItemProcessor;
use crate::domain::model::{BatchResponse, ItemFailure, ItemOutcome, SimulationRequestItem};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::task::JoinSet;

pub const SIMULATIONS_FIELD: &str = "simulations";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BatchError {
    #[error("Invalid format: 'simulations' array required")]
    InvalidFormat,
}

/// Top-level error descriptor: `{ "error": ..., "status": 400 }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchErrorBody {
    pub error: String,
    pub status: u16,
}

impl BatchError {
    pub fn status_code(&self) -> u16 {
        match self {
            BatchError::InvalidFormat => 400,
        }
    }

    pub fn to_body(&self) -> BatchErrorBody {
        BatchErrorBody {
            error: self.to_string(),
            status: self.status_code(),
        }
    }
}

/// Fans a batch out to one task per item and joins every outcome into a
/// single mapping keyed by `solarEnergyId`.
pub struct BatchOrchestrator {
    processor: Arc<ItemProcessor>,
    duplicate_policy: DuplicatePolicy,
}

impl BatchOrchestrator {
    pub fn new(processor: ItemProcessor) -> Self {
        Self {
            processor: Arc::new(processor),
            duplicate_policy: DuplicatePolicy::default(),
        }
    }

    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    /// 解析請求主體；`simulations` 不是陣列時直接失敗，不處理任何項目
    pub fn parse_items(body: &serde_json::Value) -> Result<Vec<SimulationRequestItem>, BatchError> {
        body.get(SIMULATIONS_FIELD)
            .and_then(serde_json::Value::as_array)
            .map(|items| items.iter().map(SimulationRequestItem::from_json).collect())
            .ok_or(BatchError::InvalidFormat)
    }

    pub async fn run(&self, body: &serde_json::Value) -> Result<BatchResponse, BatchError> {
        let items = Self::parse_items(body)?;
        Ok(self.run_items(items).await)
    }

    pub async fn run_items(&self, items: Vec<SimulationRequestItem>) -> BatchResponse {
        let started = Instant::now();
        let item_count = items.len();
        let mut response = BatchResponse::new();

        let duplicates = match self.duplicate_policy {
            DuplicatePolicy::Reject => duplicate_ids(&items),
            DuplicatePolicy::LastWriterWins => HashSet::new(),
        };
        for id in &duplicates {
            tracing::warn!("Duplicate solarEnergyId '{}' rejected", id);
            response.insert(id.clone(), ItemOutcome::failed(ItemFailure::DuplicateIdentifier));
        }

        let mut tasks = JoinSet::new();
        let mut pending = HashMap::new();

        for item in items {
            if duplicates.contains(&item.solar_energy_id) {
                continue;
            }
            let processor = Arc::clone(&self.processor);
            let solar_energy_id = item.solar_energy_id.clone();
            let handle = tasks.spawn(async move {
                let outcome = processor.process(&item).await;
                (item.solar_energy_id, outcome)
            });
            pending.insert(handle.id(), solar_energy_id);
        }

        // 等待全部任務結束，單一失敗不會中斷其他項目
        while let Some(joined) = tasks.join_next_with_id().await {
            match joined {
                Ok((task_id, (solar_energy_id, outcome))) => {
                    pending.remove(&task_id);
                    tracing::debug!(
                        "Item '{}' settled (computed: {})",
                        solar_energy_id,
                        outcome.is_computed()
                    );
                    response.insert(solar_energy_id, outcome);
                }
                Err(join_error) => {
                    let solar_energy_id = pending.remove(&join_error.id()).unwrap_or_default();
                    tracing::error!("Item '{}' task failed: {}", solar_energy_id, join_error);
                    response.insert(
                        solar_energy_id,
                        ItemOutcome::failed(ItemFailure::ProcessingError),
                    );
                }
            }
        }

        let failed = response.values().filter(|o| !o.is_computed()).count();
        tracing::info!(
            "Batch of {} items finished in {:?} ({} keys, {} failed)",
            item_count,
            started.elapsed(),
            response.len(),
            failed
        );
        response
    }
}

fn duplicate_ids(items: &[SimulationRequestItem]) -> HashSet<String> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter(|item| !seen.insert(item.solar_energy_id.as_str()))
        .map(|item| item.solar_energy_id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStore;
    use crate::core::pricing::PricingModel;
    use crate::domain::model::SolarEnergyRecord;
    use crate::domain::ports::SolarDataStore;
    use crate::utils::error::Result;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts lookups and panics on one id.
    struct InstrumentedStore {
        inner: MemoryStore,
        lookups: AtomicUsize,
        panic_on: Option<String>,
    }

    #[async_trait]
    impl SolarDataStore for InstrumentedStore {
        async fn find_by_id(&self, solar_energy_id: &str) -> Result<Option<SolarEnergyRecord>> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            if self.panic_on.as_deref() == Some(solar_energy_id) {
                panic!("store exploded on {}", solar_energy_id);
            }
            self.inner.find_by_id(solar_energy_id).await
        }
    }

    fn instrumented(panic_on: Option<&str>) -> Arc<InstrumentedStore> {
        Arc::new(InstrumentedStore {
            inner: MemoryStore::from_records(vec![
                SolarEnergyRecord::new("a", 1000.0),
                SolarEnergyRecord::new("b", 1100.0),
                SolarEnergyRecord::new("c", 1200.0),
            ]),
            lookups: AtomicUsize::new(0),
            panic_on: panic_on.map(str::to_string),
        })
    }

    fn orchestrator(store: Arc<InstrumentedStore>) -> BatchOrchestrator {
        BatchOrchestrator::new(ItemProcessor::new(store, PricingModel::default()))
    }

    #[tokio::test]
    async fn test_invalid_envelope_does_no_work() {
        let store = instrumented(None);
        let batch = orchestrator(store.clone());

        for body in [
            json!({}),
            json!({ "simulations": "a,b" }),
            json!({ "simulations": { "surface": 10 } }),
            json!([]),
        ] {
            assert_eq!(batch.run(&body).await, Err(BatchError::InvalidFormat));
        }
        assert_eq!(store.lookups.load(Ordering::SeqCst), 0);

        let body = BatchError::InvalidFormat.to_body();
        assert_eq!(body.status, 400);
        assert!(body.error.contains("simulations"));
    }

    #[tokio::test]
    async fn test_keys_match_input_ids() {
        let batch = orchestrator(instrumented(None));
        let body = json!({ "simulations": [
            { "surface": 10, "panelEfficiency": 20, "solarEnergyId": "a" },
            { "surface": 0, "panelEfficiency": 20, "solarEnergyId": "b" },
            { "surface": 10, "panelEfficiency": 20, "solarEnergyId": "missing" }
        ]});

        let response = batch.run(&body).await.unwrap();

        let keys: Vec<&str> = response.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "b", "missing"]);
        assert!(response["a"].is_computed());
        assert_eq!(response["b"].error_message(), Some("Invalid parameters"));
        assert_eq!(response["missing"].error_message(), Some("Solar data not found"));
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let batch = orchestrator(instrumented(None));
        let response = batch.run(&json!({ "simulations": [] })).await.unwrap();
        assert!(response.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_item_without_id_keyed_by_empty_string() {
        let batch = orchestrator(instrumented(None));
        let body = json!({ "simulations": [
            { "surface": 10, "panelEfficiency": 20 },
            { "surface": 10, "panelEfficiency": 20, "solarEnergyId": "c" }
        ]});

        let response = batch.run(&body).await.unwrap();
        assert_eq!(response[""].error_message(), Some("Invalid parameters"));
        assert!(response["c"].is_computed());
    }

    #[tokio::test]
    async fn test_panicking_item_is_contained() {
        let store = instrumented(Some("b"));
        let batch = orchestrator(store.clone());
        let body = json!({ "simulations": [
            { "surface": 10, "panelEfficiency": 20, "solarEnergyId": "a" },
            { "surface": 10, "panelEfficiency": 20, "solarEnergyId": "b" },
            { "surface": 10, "panelEfficiency": 20, "solarEnergyId": "c" }
        ]});

        let response = batch.run(&body).await.unwrap();

        assert_eq!(response.len(), 3);
        assert!(response["a"].is_computed());
        assert_eq!(response["b"].error_message(), Some("Processing error"));
        assert!(response["c"].is_computed());
        assert_eq!(store.lookups.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_duplicates_last_writer_wins() {
        let batch = orchestrator(instrumented(None));
        let body = json!({ "simulations": [
            { "surface": 10, "panelEfficiency": 20, "solarEnergyId": "a" },
            { "surface": 0, "panelEfficiency": 20, "solarEnergyId": "a" }
        ]});

        let response = batch.run(&body).await.unwrap();
        // 哪一筆留下取決於完成順序，只保證一個 key
        assert_eq!(response.len(), 1);
        assert!(response.contains_key("a"));
    }

    #[tokio::test]
    async fn test_duplicates_rejected() {
        let store = instrumented(None);
        let batch = orchestrator(store.clone()).with_duplicate_policy(DuplicatePolicy::Reject);
        let body = json!({ "simulations": [
            { "surface": 10, "panelEfficiency": 20, "solarEnergyId": "a" },
            { "surface": 12, "panelEfficiency": 20, "solarEnergyId": "a" },
            { "surface": 10, "panelEfficiency": 20, "solarEnergyId": "b" }
        ]});

        let response = batch.run(&body).await.unwrap();

        assert_eq!(response["a"].error_message(), Some("Duplicate identifier"));
        assert!(response["b"].is_computed());
        assert_eq!(store.lookups.load(Ordering::SeqCst), 1);
    }
}
