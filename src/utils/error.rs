use thiserror::Error;

#[derive(Error, Debug)]
pub enum SolarError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Solar data store error: {message}")]
    StoreError { message: String },

    #[error("Irradiance provider error: {message}")]
    ProviderError { message: String },

    #[error("Computation error: {message}")]
    ComputationError { message: String },
}

impl SolarError {
    /// 是否為配置相關錯誤
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            SolarError::ConfigError { .. }
                | SolarError::ConfigValidationError { .. }
                | SolarError::InvalidConfigValueError { .. }
                | SolarError::MissingConfigError { .. }
        )
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SolarError::HttpError(_) => "Could not reach a remote service".to_string(),
            SolarError::StoreError { .. } => "The solar data store is unavailable".to_string(),
            SolarError::ProviderError { .. } => {
                "The irradiance provider returned an error".to_string()
            }
            e if e.is_config_error() => format!("Invalid configuration: {}", e),
            e => e.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SolarError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_are_classified() {
        let err = SolarError::MissingConfigError {
            field: "store.endpoint".to_string(),
        };
        assert!(err.is_config_error());
        assert!(err.user_friendly_message().contains("store.endpoint"));

        let err = SolarError::StoreError {
            message: "connection refused".to_string(),
        };
        assert!(!err.is_config_error());
        assert!(!err.user_friendly_message().contains("connection refused"));
    }
}
