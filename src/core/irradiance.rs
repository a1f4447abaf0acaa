use crate::domain::irradiance::{IrradianceQuery, ProxyError};
use crate::domain::ports::IrradianceProvider;
use std::sync::Arc;

/// Validates coordinates and angles, then makes exactly one provider call.
pub struct IrradianceProxy {
    provider: Arc<dyn IrradianceProvider>,
}

impl IrradianceProxy {
    pub fn new(provider: Arc<dyn IrradianceProvider>) -> Self {
        Self { provider }
    }

    pub async fn fetch(&self, query: &IrradianceQuery) -> Result<serde_json::Value, ProxyError> {
        let params = query.validate().map_err(|e| {
            tracing::debug!("Irradiance query rejected: {}", e);
            e
        })?;

        match self.provider.fetch(&params).await {
            Ok(payload) => Ok(payload),
            Err(e) => {
                // 只記錄細節，不回傳給呼叫端
                tracing::error!("Error fetching solar potential: {}", e);
                Err(ProxyError::UpstreamFailure)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::irradiance::IrradianceParams;
    use crate::utils::error::{Result, SolarError};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingProvider {
        calls: Mutex<Vec<IrradianceParams>>,
        fail: bool,
    }

    #[async_trait]
    impl IrradianceProvider for RecordingProvider {
        async fn fetch(&self, params: &IrradianceParams) -> Result<serde_json::Value> {
            self.calls.lock().unwrap().push(*params);
            if self.fail {
                return Err(SolarError::ProviderError {
                    message: "internal stack trace".to_string(),
                });
            }
            Ok(serde_json::json!({ "inputs": { "location": { "latitude": params.latitude } } }))
        }
    }

    #[tokio::test]
    async fn test_valid_query_passes_payload_through() {
        let provider = Arc::new(RecordingProvider::default());
        let proxy = IrradianceProxy::new(provider.clone());

        let payload = proxy
            .fetch(&IrradianceQuery::new(48.85, 2.35).with_angle(35.0).with_aspect(0.0))
            .await
            .unwrap();

        assert_eq!(payload["inputs"]["location"]["latitude"], 48.85);
        let calls = provider.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].tilt_angle, 35.0);
    }

    #[tokio::test]
    async fn test_validation_happens_before_provider_call() {
        let provider = Arc::new(RecordingProvider::default());
        let proxy = IrradianceProxy::new(provider.clone());

        let err = proxy
            .fetch(&IrradianceQuery::new(48.85, 2.35).with_angle(120.0))
            .await
            .unwrap_err();

        assert_eq!(err, ProxyError::TiltOutOfRange);
        assert_eq!(err.status_code(), 400);
        assert!(provider.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upstream_failure_hides_detail() {
        let provider = Arc::new(RecordingProvider {
            fail: true,
            ..Default::default()
        });
        let proxy = IrradianceProxy::new(provider.clone());

        let err = proxy.fetch(&IrradianceQuery::new(48.85, 2.35)).await.unwrap_err();

        assert_eq!(err, ProxyError::UpstreamFailure);
        assert_eq!(err.status_code(), 500);
        assert!(!err.to_string().contains("stack trace"));
        assert_eq!(provider.calls.lock().unwrap().len(), 1);
    }
}
