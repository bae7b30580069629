//! Cardiac output and cardiac index.
//!
//! Metric heights for this calculator are centimetres; imperial inputs are pounds and inches.

use crate::status::Status;
use crate::threshold::{Bound, CheckTable, ThresholdTable};
use crate::units::{mosteller_bsa, round_to, UnitSystem};
use crate::validation::{
    finite_output, measure, positive_finite, HEART_RATE_BPM, HEIGHT_CM, STROKE_VOLUME_ML,
    WEIGHT_KG,
};
use crate::CalcResult;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CardiacOutputInput {
    pub heart_rate: f64,
    /// Stroke volume in millilitres.
    pub stroke_volume: f64,
    pub weight: f64,
    pub height: f64,
    #[serde(default)]
    pub unit: UnitSystem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CardiacUnits {
    pub co: &'static str,
    pub ci: &'static str,
}

pub const UNITS: CardiacUnits = CardiacUnits {
    co: "L/min",
    ci: "L/min/m²",
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardiacOutputResult {
    /// L/min, two decimals.
    pub cardiac_output: f64,
    /// L/min/m², two decimals.
    pub cardiac_index: f64,
    pub co_interpretation: &'static str,
    pub ci_interpretation: &'static str,
    #[serde(skip)]
    pub co_status: Status,
    #[serde(skip)]
    pub ci_status: Status,
    pub units: CardiacUnits,
}

static CO_INTERPRETATION: ThresholdTable<(&str, Status)> = ThresholdTable::new(
    "cardiac_output.co",
    &[
        (
            Bound::Below(4.0),
            (
                "Low - possible cardiogenic shock or heart failure",
                Status::Abnormal,
            ),
        ),
        (Bound::AtMost(8.0), ("Normal cardiac output", Status::Normal)),
    ],
    (
        "High - possible sepsis, hyperthyroidism, or exercise",
        Status::Abnormal,
    ),
);

static CI_INTERPRETATION: ThresholdTable<(&str, Status)> = ThresholdTable::new(
    "cardiac_output.ci",
    &[
        (
            Bound::Below(2.5),
            ("Low - possible cardiogenic shock", Status::Abnormal),
        ),
        (Bound::AtMost(4.0), ("Normal cardiac index", Status::Normal)),
    ],
    ("High cardiac index", Status::Abnormal),
);

pub fn interpret_co(co: f64) -> (&'static str, Status) {
    *CO_INTERPRETATION.classify(co)
}

pub fn interpret_ci(ci: f64) -> (&'static str, Status) {
    *CI_INTERPRETATION.classify(ci)
}

pub fn calculate(input: &CardiacOutputInput) -> CalcResult<CardiacOutputResult> {
    let heart_rate = measure("heartRate", input.heart_rate, HEART_RATE_BPM)?;
    let stroke_volume = measure("strokeVolume", input.stroke_volume, STROKE_VOLUME_ML)?;
    let weight_kg = measure("weight", input.unit.weight_kg(input.weight), WEIGHT_KG)?;
    let height_cm = measure("height", input.unit.height_cm_from_cm(input.height), HEIGHT_CM)?;

    let co = heart_rate * stroke_volume / 1000.0;
    let bsa = positive_finite("body surface area", mosteller_bsa(weight_kg, height_cm))?;
    let ci = finite_output("cardiac index", co / bsa)?;

    let (co_interpretation, co_status) = interpret_co(co);
    let (ci_interpretation, ci_status) = interpret_ci(ci);

    Ok(CardiacOutputResult {
        cardiac_output: round_to(co, 2),
        cardiac_index: round_to(ci, 2),
        co_interpretation,
        ci_interpretation,
        co_status,
        ci_status,
        units: UNITS,
    })
}

pub(crate) fn tables() -> Vec<&'static dyn CheckTable> {
    vec![&CO_INTERPRETATION, &CI_INTERPRETATION]
}
