use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 預設傾角：法國本土平均緯度下的最佳值
pub const DEFAULT_TILT_ANGLE: f64 = 35.0;
/// 預設方位角：0° = 正南
pub const DEFAULT_AZIMUTH: f64 = 0.0;

pub const TILT_ANGLE_MIN: f64 = 0.0;
pub const TILT_ANGLE_MAX: f64 = 90.0;
pub const AZIMUTH_MIN: f64 = -180.0;
pub const AZIMUTH_MAX: f64 = 180.0;

/// Raw query string as the caller sent it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IrradianceQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub angle: Option<String>,
    pub aspect: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IrradianceParams {
    pub latitude: f64,
    pub longitude: f64,
    pub tilt_angle: f64,
    pub azimuth: f64,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProxyError {
    #[error("Latitude and longitude are required")]
    MissingCoordinates,

    #[error("Latitude and longitude must be numbers")]
    InvalidCoordinates,

    #[error("Tilt angle must be between 0 and 90 degrees")]
    TiltOutOfRange,

    #[error("Azimuth must be between -180 and 180 degrees")]
    AzimuthOutOfRange,

    #[error("Error fetching solar potential data")]
    UpstreamFailure,
}

impl ProxyError {
    pub fn status_code(&self) -> u16 {
        match self {
            ProxyError::UpstreamFailure => 500,
            _ => 400,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status_code() == 400
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// 參數缺席才用預設值；有給但是空白時視為 0
fn parse_angle(value: &Option<String>, default: f64) -> Option<f64> {
    match value.as_deref().map(str::trim) {
        None => Some(default),
        Some("") => Some(0.0),
        Some(raw) => raw.parse::<f64>().ok().filter(|v| v.is_finite()),
    }
}

impl IrradianceQuery {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat: Some(lat.to_string()),
            lon: Some(lon.to_string()),
            angle: None,
            aspect: None,
        }
    }

    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = Some(angle.to_string());
        self
    }

    pub fn with_aspect(mut self, aspect: f64) -> Self {
        self.aspect = Some(aspect.to_string());
        self
    }

    /// Checks coordinates first, then tilt, then azimuth.
    pub fn validate(&self) -> Result<IrradianceParams, ProxyError> {
        let (lat, lon) = match (present(&self.lat), present(&self.lon)) {
            (Some(lat), Some(lon)) => (lat, lon),
            _ => return Err(ProxyError::MissingCoordinates),
        };

        let latitude = lat.parse::<f64>().ok().filter(|v| v.is_finite());
        let longitude = lon.parse::<f64>().ok().filter(|v| v.is_finite());
        let (latitude, longitude) = match (latitude, longitude) {
            (Some(lat), Some(lon)) => (lat, lon),
            _ => return Err(ProxyError::InvalidCoordinates),
        };

        // 非數字的角度視同超出範圍
        let tilt_angle = parse_angle(&self.angle, DEFAULT_TILT_ANGLE)
            .filter(|a| (TILT_ANGLE_MIN..=TILT_ANGLE_MAX).contains(a))
            .ok_or(ProxyError::TiltOutOfRange)?;

        let azimuth = parse_angle(&self.aspect, DEFAULT_AZIMUTH)
            .filter(|a| (AZIMUTH_MIN..=AZIMUTH_MAX).contains(a))
            .ok_or(ProxyError::AzimuthOutOfRange)?;

        Ok(IrradianceParams {
            latitude,
            longitude,
            tilt_angle,
            azimuth,
        })
    }
}
