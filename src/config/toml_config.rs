use crate::utils::error::{Result, SolarError};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_amount, validate_positive_number, validate_range,
    validate_required_field, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

pub const DEFAULT_PRICE_PER_KWH: f64 = 0.1269;
pub const DEFAULT_PVGIS_ENDPOINT: &str = "https://re.jrc.ec.europa.eu/api/v5_3/PVcalc";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:3000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingModelKind {
    #[default]
    Flat,
    InstalledPower,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    pub model: PricingModelKind,
    pub price_per_kwh: f64,
    /// 標準測試條件下每平方公尺的峰值功率 (kW)
    pub peak_power_per_m2_kw: f64,
    /// 每 kWp 安裝成本 (歐元)，只用於 installed_power 模型
    pub install_cost_per_kwp: Option<f64>,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            model: PricingModelKind::Flat,
            price_per_kwh: DEFAULT_PRICE_PER_KWH,
            peak_power_per_m2_kw: 1.0,
            install_cost_per_kwp: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    #[default]
    LastWriterWins,
    Reject,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub duplicate_ids: DuplicatePolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    #[default]
    Memory,
    Rest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub r#type: StoreKind,
    pub csv_path: Option<String>,
    pub endpoint: Option<String>,
    pub table: String,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            r#type: StoreKind::Memory,
            csv_path: None,
            endpoint: None,
            table: "solar_energy".to_string(),
            api_key: None,
            timeout_seconds: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub endpoint: String,
    pub timeout_seconds: u64,
    pub raddatabase: String,
    pub peakpower: f64,
    pub loss: f64,
    pub mountingplace: String,
    pub pvtechchoice: String,
    pub usehorizon: bool,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_PVGIS_ENDPOINT.to_string(),
            timeout_seconds: 30,
            raddatabase: "PVGIS-SARAH3".to_string(),
            peakpower: 1.0,
            loss: 14.0,
            mountingplace: "free".to_string(),
            pvtechchoice: "crystSi".to_string(),
            usehorizon: true,
        }
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SolarError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SolarError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SUPABASE_KEY})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SolarError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server
            .bind
            .parse()
            .map_err(|e| SolarError::InvalidConfigValueError {
                field: "server.bind".to_string(),
                value: self.server.bind.clone(),
                reason: format!("Invalid socket address: {}", e),
            })
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.bind_addr()?;

        validate_positive_amount("pricing.price_per_kwh", self.pricing.price_per_kwh)?;
        if self.pricing.model == PricingModelKind::InstalledPower {
            validate_positive_amount(
                "pricing.peak_power_per_m2_kw",
                self.pricing.peak_power_per_m2_kw,
            )?;
        }
        if let Some(cost) = self.pricing.install_cost_per_kwp {
            validate_positive_amount("pricing.install_cost_per_kwp", cost)?;
        }

        match self.store.r#type {
            StoreKind::Rest => {
                let endpoint = validate_required_field("store.endpoint", &self.store.endpoint)?;
                validate_url("store.endpoint", endpoint)?;
                validate_non_empty_string("store.table", &self.store.table)?;
            }
            StoreKind::Memory => {
                if let Some(path) = &self.store.csv_path {
                    validate_non_empty_string("store.csv_path", path)?;
                }
            }
        }
        validate_positive_number("store.timeout_seconds", self.store.timeout_seconds, 1)?;

        validate_url("provider.endpoint", &self.provider.endpoint)?;
        validate_positive_number("provider.timeout_seconds", self.provider.timeout_seconds, 1)?;
        validate_range("provider.loss", self.provider.loss, 0.0, 100.0)?;
        validate_positive_amount("provider.peakpower", self.provider.peakpower)?;

        tracing::debug!("✅ Configuration validation passed");
        Ok(())
    }
}
