use crate::config::{PricingConfig, PricingModelKind};
use crate::domain::model::ComputationResult;
use crate::utils::error::{Result, SolarError};

/// Revenue projection applied to each valid item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PricingModel {
    /// `yield × surface × price × efficiency`
    Flat { price_per_kwh: f64 },
    /// Sizes the installation in kWp first, then prices the yield of that capacity.
    /// With an install cost per kWp, the one-off installation cost is reported too.
    InstalledPower {
        price_per_kwh: f64,
        peak_power_per_m2_kw: f64,
        install_cost_per_kwp: Option<f64>,
    },
}

impl Default for PricingModel {
    fn default() -> Self {
        Self::from_config(&PricingConfig::default())
    }
}

impl PricingModel {
    pub fn from_config(config: &PricingConfig) -> Self {
        match config.model {
            PricingModelKind::Flat => PricingModel::Flat {
                price_per_kwh: config.price_per_kwh,
            },
            PricingModelKind::InstalledPower => PricingModel::InstalledPower {
                price_per_kwh: config.price_per_kwh,
                peak_power_per_m2_kw: config.peak_power_per_m2_kw,
                install_cost_per_kwp: config.install_cost_per_kwp,
            },
        }
    }

    pub fn compute(
        &self,
        yearly_energy: f64,
        surface_area: f64,
        efficiency: f64,
    ) -> Result<ComputationResult> {
        let result = match *self {
            PricingModel::Flat { price_per_kwh } => ComputationResult {
                yearly_energy,
                surface_area,
                amount_euros_per_year: yearly_energy * surface_area * price_per_kwh * efficiency,
                installed_power_kwp: None,
                installation_cost_euros: None,
            },
            PricingModel::InstalledPower {
                price_per_kwh,
                peak_power_per_m2_kw,
                install_cost_per_kwp,
            } => {
                let installed_power_kwp = surface_area * efficiency * peak_power_per_m2_kw;
                ComputationResult {
                    yearly_energy,
                    surface_area,
                    amount_euros_per_year: yearly_energy * installed_power_kwp * price_per_kwh,
                    installed_power_kwp: Some(installed_power_kwp),
                    installation_cost_euros: install_cost_per_kwp
                        .map(|cost| cost * installed_power_kwp),
                }
            }
        };

        if !result.amount_euros_per_year.is_finite() {
            return Err(SolarError::ComputationError {
                message: format!(
                    "non-finite amount for yield {} and surface {}",
                    yearly_energy, surface_area
                ),
            });
        }
        Ok(result)
    }
}

/// 百分比轉成小數並四捨五入到小數點後兩位
pub fn efficiency_fraction(panel_efficiency_percent: f64) -> f64 {
    ((panel_efficiency_percent / 100.0) * 100.0).round() / 100.0
}
