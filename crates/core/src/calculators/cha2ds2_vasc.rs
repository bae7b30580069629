//! CHA2DS2-VASc stroke risk in atrial fibrillation.

use super::Gender;
use crate::accumulator::ScoreAccumulator;
use crate::status::Status;
use crate::threshold::{Bound, CheckTable, ThresholdTable};
use crate::validation::{measure, AGE_YEARS};
use crate::CalcResult;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Cha2ds2VascInput {
    pub age: f64,
    pub gender: Gender,
    #[serde(default, rename = "hasCongestiveHF")]
    pub has_congestive_hf: bool,
    #[serde(default)]
    pub has_hypertension: bool,
    #[serde(default)]
    pub has_diabetes: bool,
    #[serde(default, rename = "hasStrokeTIA")]
    pub has_stroke_tia: bool,
    #[serde(default)]
    pub has_vascular_disease: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cha2ds2VascResult {
    pub score: i32,
    pub annual_stroke_risk: &'static str,
    pub recommendation: &'static str,
    pub risk_level: &'static str,
    pub status: Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrokeRisk {
    pub annual_risk: &'static str,
    pub recommendation: &'static str,
}

const fn stroke(annual_risk: &'static str, recommendation: &'static str) -> StrokeRisk {
    StrokeRisk {
        annual_risk,
        recommendation,
    }
}

static AGE_POINTS: ThresholdTable<i32> = ThresholdTable::new(
    "cha2ds2_vasc.age",
    &[(Bound::Below(65.0), 0), (Bound::Below(75.0), 1)],
    2,
);

static STROKE_RISK: ThresholdTable<StrokeRisk> = ThresholdTable::new(
    "cha2ds2_vasc.stroke_risk",
    &[
        (
            Bound::AtMost(0.0),
            stroke("0%", "No antithrombotic therapy recommended"),
        ),
        (
            Bound::AtMost(1.0),
            stroke("1.3%", "Consider oral anticoagulation or aspirin"),
        ),
        (
            Bound::AtMost(2.0),
            stroke("2.2%", "Oral anticoagulation recommended (warfarin or DOAC)"),
        ),
        (
            Bound::AtMost(3.0),
            stroke("3.2%", "Oral anticoagulation strongly recommended"),
        ),
        (
            Bound::AtMost(4.0),
            stroke("4.0%", "Oral anticoagulation mandatory"),
        ),
        (
            Bound::AtMost(5.0),
            stroke("6.7%", "Oral anticoagulation mandatory"),
        ),
        (
            Bound::AtMost(6.0),
            stroke("9.8%", "Oral anticoagulation mandatory"),
        ),
    ],
    stroke(
        ">10%",
        "Oral anticoagulation mandatory, high-risk monitoring",
    ),
);

static RISK_LEVEL: ThresholdTable<(&str, Status)> = ThresholdTable::new(
    "cha2ds2_vasc.risk_level",
    &[
        (Bound::AtMost(0.0), ("Low", Status::Normal)),
        (Bound::AtMost(1.0), ("Moderate", Status::Borderline)),
    ],
    ("High", Status::Abnormal),
);

pub fn score(input: &Cha2ds2VascInput) -> CalcResult<ScoreAccumulator> {
    let age = measure("age", input.age, AGE_YEARS)?;

    let mut acc = ScoreAccumulator::new();
    acc.add_if(input.has_congestive_hf, "hasCongestiveHF", 1)
        .add_if(input.has_hypertension, "hasHypertension", 1)
        .add("age", *AGE_POINTS.classify(age))
        .add_if(input.has_diabetes, "hasDiabetes", 1)
        .add_if(input.has_stroke_tia, "hasStrokeTIA", 2)
        .add_if(input.has_vascular_disease, "hasVascularDisease", 1)
        .add_if(input.gender == Gender::Female, "gender", 1);
    Ok(acc)
}

pub fn calculate(input: &Cha2ds2VascInput) -> CalcResult<Cha2ds2VascResult> {
    let acc = score(input)?;
    let total = acc.total();
    tracing::debug!(score = total, breakdown = ?acc.contributions(), "cha2ds2-vasc score");

    let value = f64::from(total);
    let risk = STROKE_RISK.classify(value);
    let (risk_level, status) = *RISK_LEVEL.classify(value);

    Ok(Cha2ds2VascResult {
        score: total,
        annual_stroke_risk: risk.annual_risk,
        recommendation: risk.recommendation,
        risk_level,
        status,
    })
}

pub(crate) fn tables() -> Vec<&'static dyn CheckTable> {
    vec![&AGE_POINTS, &STROKE_RISK, &RISK_LEVEL]
}
