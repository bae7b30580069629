//! Body mass index, ideal body weight and body surface area.
//!
//! Metric heights for these calculators are metres; imperial inputs are pounds and inches.

use crate::status::{Classification, Status};
use crate::threshold::{Bound, CheckTable, ThresholdTable};
use crate::units::{mosteller_bsa, round_to, UnitSystem};
use crate::validation::{finite_output, measure, positive_finite, HEIGHT_M, WEIGHT_KG};
use crate::CalcResult;
use serde::{Deserialize, Serialize};

pub const BSA_FORMULA: &str = "Mosteller";
pub const BSA_UNIT: &str = "m²";
pub const BSA_USE: &str = "Drug dosing, burn assessment, cardiac index calculation";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BodyInput {
    pub weight: f64,
    pub height: f64,
    #[serde(default)]
    pub unit: UnitSystem,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BmiResult {
    pub bmi: f64,
    pub category: &'static str,
    pub status: Status,
    pub recommendation: &'static str,
    /// Devine ideal body weight in kg.
    pub ideal_weight: f64,
    /// Actual minus ideal weight in kg.
    pub weight_difference: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BsaResult {
    pub bsa: f64,
    pub formula: &'static str,
    pub unit: &'static str,
    #[serde(rename = "use")]
    pub intended_use: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyMetrics {
    pub bmi: BmiResult,
    pub bsa: BsaResult,
}

static BMI_CATEGORY: ThresholdTable<Classification> = ThresholdTable::new(
    "body.bmi",
    &[
        (
            Bound::Below(16.0),
            Classification::new(
                "Severe Underweight",
                Status::Critical,
                "Severe malnutrition - nutritional assessment required",
            ),
        ),
        (
            Bound::Below(18.5),
            Classification::new(
                "Underweight",
                Status::Abnormal,
                "Below healthy weight - nutritional counseling recommended",
            ),
        ),
        (
            Bound::Below(25.0),
            Classification::new("Normal Weight", Status::Normal, "Healthy weight range"),
        ),
        (
            Bound::Below(30.0),
            Classification::new(
                "Overweight",
                Status::Borderline,
                "Above healthy weight - lifestyle modifications recommended",
            ),
        ),
        (
            Bound::Below(35.0),
            Classification::new(
                "Obesity Class I",
                Status::Abnormal,
                "Weight loss program and metabolic screening recommended",
            ),
        ),
        (
            Bound::Below(40.0),
            Classification::new(
                "Obesity Class II",
                Status::Abnormal,
                "Significant health risks - intensive weight management needed",
            ),
        ),
    ],
    Classification::new(
        "Obesity Class III (Severe)",
        Status::Critical,
        "Extreme obesity - bariatric surgery evaluation may be warranted",
    ),
);

/// Validated `(weight kg, height cm)`.
fn anthropometrics(input: &BodyInput) -> CalcResult<(f64, f64)> {
    let weight_kg = measure("weight", input.unit.weight_kg(input.weight), WEIGHT_KG)?;
    let height_m = measure("height", input.unit.height_m_from_m(input.height), HEIGHT_M)?;
    Ok((weight_kg, height_m * 100.0))
}

pub fn classify_bmi(bmi: f64) -> &'static Classification {
    BMI_CATEGORY.classify(bmi)
}

/// Devine ideal body weight: 50 kg plus 2.3 kg per inch over five feet.
pub fn ideal_weight_kg(height_cm: f64) -> f64 {
    if height_cm > 150.0 {
        50.0 + 2.3 * ((height_cm - 150.0) / 2.54)
    } else {
        50.0
    }
}

pub fn bmi(input: &BodyInput) -> CalcResult<BmiResult> {
    let (weight_kg, height_cm) = anthropometrics(input)?;
    let height_m = height_cm / 100.0;
    let value = finite_output("BMI", weight_kg / (height_m * height_m))?;
    let class = classify_bmi(value);
    let ideal = ideal_weight_kg(height_cm);

    Ok(BmiResult {
        bmi: round_to(value, 1),
        category: class.category,
        status: class.status,
        recommendation: class.recommendation,
        ideal_weight: round_to(ideal, 1),
        weight_difference: round_to(weight_kg - ideal, 1),
    })
}

pub fn bsa(input: &BodyInput) -> CalcResult<BsaResult> {
    let (weight_kg, height_cm) = anthropometrics(input)?;
    let value = positive_finite("body surface area", mosteller_bsa(weight_kg, height_cm))?;

    Ok(BsaResult {
        bsa: round_to(value, 2),
        formula: BSA_FORMULA,
        unit: BSA_UNIT,
        intended_use: BSA_USE,
    })
}

pub fn body_metrics(input: &BodyInput) -> CalcResult<BodyMetrics> {
    Ok(BodyMetrics {
        bmi: bmi(input)?,
        bsa: bsa(input)?,
    })
}

pub(crate) fn tables() -> Vec<&'static dyn CheckTable> {
    vec![&BMI_CATEGORY]
}
