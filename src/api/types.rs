use serde::{Deserialize, Serialize};

use crate::domain::irradiance::IrradianceQuery;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// `?lat=&lon=&angle=&aspect=` — kept as strings so validation owns the parsing.
#[derive(Debug, Default, Deserialize)]
pub struct SolarPotentialQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub angle: Option<String>,
    pub aspect: Option<String>,
}

impl From<SolarPotentialQuery> for IrradianceQuery {
    fn from(q: SolarPotentialQuery) -> Self {
        IrradianceQuery {
            lat: q.lat,
            lon: q.lon,
            angle: q.angle,
            aspect: q.aspect,
        }
    }
}
