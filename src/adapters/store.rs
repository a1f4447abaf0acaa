use crate::config::{StoreConfig, StoreKind};
use crate::domain::model::SolarEnergyRecord;
use crate::domain::ports::SolarDataStore;
use crate::utils::error::{Result, SolarError};
use crate::utils::validation::validate_required_field;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Records held in memory, usually loaded from a CSV export of the table.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: HashMap<String, SolarEnergyRecord>,
}

impl MemoryStore {
    pub fn from_records(records: impl IntoIterator<Item = SolarEnergyRecord>) -> Self {
        Self {
            records: records
                .into_iter()
                .map(|r| (r.solar_energy_id.clone(), r))
                .collect(),
        }
    }

    /// 欄位: solar_energy_id,yearly_energy[,city,postal_code,tilt_angle,azimuth,updated_at]
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut records = Vec::new();
        for row in csv_reader.deserialize::<SolarEnergyRecord>() {
            records.push(row?);
        }
        Ok(Self::from_records(records))
    }

    pub fn from_csv_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(&path)?;
        let store = Self::from_csv_reader(file)?;
        tracing::info!(
            "Loaded {} solar records from {}",
            store.len(),
            path.as_ref().display()
        );
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl SolarDataStore for MemoryStore {
    async fn find_by_id(&self, solar_energy_id: &str) -> Result<Option<SolarEnergyRecord>> {
        Ok(self.records.get(solar_energy_id).cloned())
    }
}

/// REST 只取計算需要的欄位，其他欄位的型別不影響查詢
const REST_SELECT: &str = "solar_energy_id,yearly_energy";

#[derive(Debug, Deserialize)]
struct RestRow {
    #[serde(default)]
    solar_energy_id: Option<String>,
    #[serde(default)]
    yearly_energy: Option<f64>,
}

impl RestRow {
    fn into_record(self, requested_id: &str) -> SolarEnergyRecord {
        SolarEnergyRecord {
            solar_energy_id: self
                .solar_energy_id
                .unwrap_or_else(|| requested_id.to_string()),
            yearly_energy: self.yearly_energy,
            city: None,
            postal_code: None,
            tilt_angle: None,
            azimuth: None,
            updated_at: None,
        }
    }
}

/// Looks records up through a PostgREST-style HTTP interface
/// (`GET {endpoint}/{table}?solar_energy_id=eq.{id}`).
pub struct RestStore {
    client: Client,
    endpoint: String,
    table: String,
    api_key: Option<String>,
}

impl RestStore {
    pub fn new(endpoint: impl Into<String>, table: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            table: table.into(),
            api_key: None,
        })
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    fn table_url(&self) -> String {
        format!("{}/{}", self.endpoint, self.table)
    }
}

#[async_trait]
impl SolarDataStore for RestStore {
    async fn find_by_id(&self, solar_energy_id: &str) -> Result<Option<SolarEnergyRecord>> {
        let url = self.table_url();
        tracing::debug!("Looking up solar record {} at {}", solar_energy_id, url);

        let mut request = self.client.get(&url).query(&[
            ("select", REST_SELECT.to_string()),
            ("solar_energy_id", format!("eq.{}", solar_energy_id)),
        ]);
        if let Some(key) = &self.api_key {
            request = request.header("apikey", key).bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SolarError::StoreError {
                message: format!("lookup of '{}' returned HTTP {}", solar_energy_id, status),
            });
        }

        let rows: Vec<RestRow> = response.json().await.map_err(|e| SolarError::StoreError {
            message: format!("malformed record for '{}': {}", solar_energy_id, e),
        })?;

        if rows.len() > 1 {
            tracing::warn!(
                "{} rows share solar_energy_id {}, using the first",
                rows.len(),
                solar_energy_id
            );
        }
        Ok(rows
            .into_iter()
            .next()
            .map(|row| row.into_record(solar_energy_id)))
    }
}

/// 依照配置建立對應的資料來源
pub fn build_store(config: &StoreConfig) -> Result<Arc<dyn SolarDataStore>> {
    match config.r#type {
        StoreKind::Memory => {
            let store = match &config.csv_path {
                Some(path) => MemoryStore::from_csv_file(path)?,
                None => {
                    tracing::warn!("No store.csv_path configured, starting with an empty store");
                    MemoryStore::default()
                }
            };
            Ok(Arc::new(store))
        }
        StoreKind::Rest => {
            let endpoint = validate_required_field("store.endpoint", &config.endpoint)?;
            let mut store = RestStore::new(
                endpoint.as_str(),
                config.table.as_str(),
                Duration::from_secs(config.timeout_seconds),
            )?;
            if let Some(key) = &config.api_key {
                store = store.with_api_key(key.as_str());
            }
            Ok(Arc::new(store))
        }
    }
}
