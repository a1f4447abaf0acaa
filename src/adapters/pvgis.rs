use crate::config::ProviderConfig;
use crate::domain::irradiance::IrradianceParams;
use crate::domain::ports::IrradianceProvider;
use crate::utils::error::{Result, SolarError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// HTTP client for the JRC PVGIS `PVcalc` service.
pub struct PvgisClient {
    client: Client,
    config: ProviderConfig,
}

impl PvgisClient {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self { client, config })
    }

    /// 固定的技術參數加上使用者的座標與角度
    fn query_params(&self, params: &IrradianceParams) -> Vec<(&'static str, String)> {
        vec![
            ("lat", params.latitude.to_string()),
            ("lon", params.longitude.to_string()),
            ("outputformat", "json".to_string()),
            ("raddatabase", self.config.raddatabase.clone()),
            ("browser", "0".to_string()),
            ("peakpower", self.config.peakpower.to_string()),
            ("loss", self.config.loss.to_string()),
            ("mountingplace", self.config.mountingplace.clone()),
            ("pvtechchoice", self.config.pvtechchoice.clone()),
            ("angle", params.tilt_angle.to_string()),
            ("aspect", params.azimuth.to_string()),
            ("usehorizon", if self.config.usehorizon { "1" } else { "0" }.to_string()),
            ("userhorizon", String::new()),
            ("js", "1".to_string()),
        ]
    }
}

#[async_trait]
impl IrradianceProvider for PvgisClient {
    async fn fetch(&self, params: &IrradianceParams) -> Result<serde_json::Value> {
        tracing::debug!("Making PVGIS request to: {}", self.config.endpoint);
        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&self.query_params(params))
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("PVGIS response status: {}", status);
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SolarError::ProviderError {
                message: format!("HTTP {}: {}", status, body),
            });
        }

        let payload: serde_json::Value = response.json().await?;
        Ok(payload)
    }
}
