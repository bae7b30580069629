//! HAS-BLED major bleeding risk on anticoagulation.
//!
//! Every factor contributes at most one point. Renal and liver disease share the single
//! "abnormal renal/liver function" point, so the maximum score is 8.

use crate::accumulator::ScoreAccumulator;
use crate::status::{Classification, Status};
use crate::threshold::{Bound, CheckTable, ThresholdTable};
use serde::{Deserialize, Serialize};

pub const NOTE: &str =
    "HAS-BLED ≥3 indicates high bleeding risk but does NOT contraindicate anticoagulation";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HasBledInput {
    #[serde(default)]
    pub has_hypertension: bool,
    #[serde(default)]
    pub has_renal_disease: bool,
    #[serde(default)]
    pub has_liver_disease: bool,
    #[serde(default)]
    pub has_stroke_history: bool,
    #[serde(default)]
    pub has_prior_bleed: bool,
    #[serde(default, rename = "hasLabileINR")]
    pub has_labile_inr: bool,
    /// Age over 65.
    #[serde(default)]
    pub is_elderly: bool,
    #[serde(default)]
    pub uses_drugs_alcohol: bool,
    /// Antiplatelet or NSAID use.
    #[serde(default)]
    pub uses_antiplatelets: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HasBledResult {
    pub score: i32,
    pub bleeding_risk: &'static str,
    pub recommendation: &'static str,
    pub note: &'static str,
    pub status: Status,
}

static BLEEDING_RISK: ThresholdTable<Classification> = ThresholdTable::new(
    "has_bled.bleeding_risk",
    &[
        (
            Bound::AtMost(0.0),
            Classification::new(
                "Low (1.13% per year)",
                Status::Normal,
                "Anticoagulation is safe",
            ),
        ),
        (
            Bound::AtMost(1.0),
            Classification::new(
                "Low (1.02% per year)",
                Status::Normal,
                "Anticoagulation with caution",
            ),
        ),
        (
            Bound::AtMost(2.0),
            Classification::new(
                "Moderate (1.88% per year)",
                Status::Borderline,
                "Anticoagulation with regular monitoring",
            ),
        ),
    ],
    Classification::new(
        "High (3.74% per year)",
        Status::Abnormal,
        "Careful risk-benefit assessment, close monitoring essential",
    ),
);

pub fn score(input: &HasBledInput) -> ScoreAccumulator {
    let mut acc = ScoreAccumulator::new();
    acc.add_if(input.has_hypertension, "hasHypertension", 1)
        .add_if(
            input.has_renal_disease || input.has_liver_disease,
            "hasRenalOrLiverDisease",
            1,
        )
        .add_if(input.has_stroke_history, "hasStrokeHistory", 1)
        .add_if(input.has_prior_bleed, "hasPriorBleed", 1)
        .add_if(input.has_labile_inr, "hasLabileINR", 1)
        .add_if(input.is_elderly, "isElderly", 1)
        .add_if(input.uses_drugs_alcohol, "usesDrugsAlcohol", 1)
        .add_if(input.uses_antiplatelets, "usesAntiplatelets", 1);
    acc
}

/// All inputs are booleans, so there is nothing to validate and the calculation cannot fail.
pub fn calculate(input: &HasBledInput) -> HasBledResult {
    let acc = score(input);
    let total = acc.total();
    tracing::debug!(score = total, breakdown = ?acc.contributions(), "has-bled score");

    let risk = BLEEDING_RISK.classify(f64::from(total));
    HasBledResult {
        score: total,
        bleeding_risk: risk.category,
        recommendation: risk.recommendation,
        note: NOTE,
        status: risk.status,
    }
}

pub(crate) fn tables() -> Vec<&'static dyn CheckTable> {
    vec![&BLEEDING_RISK]
}
