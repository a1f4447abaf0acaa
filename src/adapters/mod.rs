// Adapters layer: concrete implementations of the domain ports.

pub mod pvgis;
pub mod store;

pub use pvgis::PvgisClient;
pub use store::{MemoryStore, RestStore};
