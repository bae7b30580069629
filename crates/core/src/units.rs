//! Unit systems, conversions and shared anthropometric formulas.

use serde::{Deserialize, Serialize};

pub const KG_PER_LB: f64 = 0.453592;
pub const CM_PER_INCH: f64 = 2.54;
pub const M_PER_INCH: f64 = 0.0254;

/// Measurement system of weight/height inputs.
///
/// Imperial inputs are pounds and inches. What a metric height means depends on the
/// calculator: centimetres for cardiac output, metres for BMI/BSA.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn weight_kg(&self, weight: f64) -> f64 {
        match self {
            UnitSystem::Metric => weight,
            UnitSystem::Imperial => weight * KG_PER_LB,
        }
    }

    /// Height in centimetres from a metric value given in centimetres.
    pub fn height_cm_from_cm(&self, height: f64) -> f64 {
        match self {
            UnitSystem::Metric => height,
            UnitSystem::Imperial => height * CM_PER_INCH,
        }
    }

    /// Height in metres from a metric value given in metres.
    pub fn height_m_from_m(&self, height: f64) -> f64 {
        match self {
            UnitSystem::Metric => height,
            UnitSystem::Imperial => height * M_PER_INCH,
        }
    }
}

/// Body surface area in m² (Mosteller): `sqrt(kg × cm / 3600)`.
pub fn mosteller_bsa(weight_kg: f64, height_cm: f64) -> f64 {
    (weight_kg * height_cm / 3600.0).sqrt()
}

/// Rounds to `decimals` places, halves away from zero.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
