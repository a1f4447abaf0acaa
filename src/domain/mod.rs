// Domain layer: models, scoped errors and ports. No I/O here.

pub mod irradiance;
pub mod model;
pub mod ports;
