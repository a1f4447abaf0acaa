use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 單筆模擬請求，已從寬鬆的 JSON 轉成數值
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationRequestItem {
    pub surface_area: f64,
    pub panel_efficiency_percent: f64,
    pub solar_energy_id: String,
}

impl SimulationRequestItem {
    /// Reads `surface`, `panelEfficiency` and `solarEnergyId` from one batch entry.
    ///
    /// Numbers and numeric strings are both accepted; anything else becomes NaN so
    /// validation rejects it later. A missing identifier becomes an empty string.
    pub fn from_json(value: &serde_json::Value) -> Self {
        Self {
            surface_area: numeric_field(value, "surface"),
            panel_efficiency_percent: numeric_field(value, "panelEfficiency"),
            solar_energy_id: identifier_field(value, "solarEnergyId"),
        }
    }
}

fn numeric_field(value: &serde_json::Value, key: &str) -> f64 {
    match value.get(key) {
        Some(serde_json::Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}

fn identifier_field(value: &serde_json::Value, key: &str) -> String {
    match value.get(key) {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// 資料庫中的年發電量紀錄 (solar_energy 表)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarEnergyRecord {
    pub solar_energy_id: String,
    #[serde(default)]
    pub yearly_energy: Option<f64>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub tilt_angle: Option<f64>,
    #[serde(default)]
    pub azimuth: Option<f64>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl SolarEnergyRecord {
    pub fn new(solar_energy_id: impl Into<String>, yearly_energy: f64) -> Self {
        Self {
            solar_energy_id: solar_energy_id.into(),
            yearly_energy: Some(yearly_energy),
            city: None,
            postal_code: None,
            tilt_angle: None,
            azimuth: None,
            updated_at: None,
        }
    }

    /// 缺值或為零都視為沒有資料
    pub fn usable_yield(&self) -> Option<f64> {
        self.yearly_energy.filter(|y| *y != 0.0 && !y.is_nan())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputationResult {
    pub yearly_energy: f64,
    pub surface_area: f64,
    pub amount_euros_per_year: f64,
    #[serde(rename = "installedPowerKWp", skip_serializing_if = "Option::is_none")]
    pub installed_power_kwp: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installation_cost_euros: Option<f64>,
}

/// Per-item failure kinds. The message is the only thing a caller sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemFailure {
    InvalidParameters,
    SolarDataNotFound,
    ProcessingError,
    DuplicateIdentifier,
}

impl ItemFailure {
    pub fn message(&self) -> &'static str {
        match self {
            ItemFailure::InvalidParameters => "Invalid parameters",
            ItemFailure::SolarDataNotFound => "Solar data not found",
            ItemFailure::ProcessingError => "Processing error",
            ItemFailure::DuplicateIdentifier => "Duplicate identifier",
        }
    }
}

impl fmt::Display for ItemFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemError {
    pub error: String,
}

impl From<ItemFailure> for ItemError {
    fn from(failure: ItemFailure) -> Self {
        Self {
            error: failure.message().to_string(),
        }
    }
}

/// Exactly one of the two per entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemOutcome {
    Computed(ComputationResult),
    Failed(ItemError),
}

impl ItemOutcome {
    pub fn failed(failure: ItemFailure) -> Self {
        ItemOutcome::Failed(failure.into())
    }

    pub fn is_computed(&self) -> bool {
        matches!(self, ItemOutcome::Computed(_))
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            ItemOutcome::Failed(e) => Some(&e.error),
            ItemOutcome::Computed(_) => None,
        }
    }
}

pub type BatchResponse = BTreeMap<String, ItemOutcome>;
