//! Framingham 10-year cardiovascular risk.
//!
//! Sex selects one of two point tables. Each table is written with `>=` breakpoints as in the
//! published score: a value sitting exactly on a breakpoint scores the higher band, which is
//! why every bound below is `Below(breakpoint)`.

use super::Gender;
use crate::accumulator::ScoreAccumulator;
use crate::status::{Classification, Status};
use crate::threshold::{Bound, CheckTable, ThresholdTable};
use crate::validation::{
    measure, AGE_YEARS, HDL_CHOLESTEROL_MG_DL, SYSTOLIC_MMHG, TOTAL_CHOLESTEROL_MG_DL,
};
use crate::CalcResult;
use serde::{Deserialize, Serialize};

pub const TIMEFRAME: &str = "10 years";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FraminghamInput {
    pub age: f64,
    pub gender: Gender,
    pub total_cholesterol: f64,
    pub hdl_cholesterol: f64,
    #[serde(rename = "systolicBP")]
    pub systolic_bp: f64,
    #[serde(default)]
    pub is_smoker: bool,
    #[serde(default)]
    pub is_diabetic: bool,
    #[serde(default, rename = "onBPMeds")]
    pub on_bp_meds: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FraminghamResult {
    pub points: i32,
    /// Risk formatted as a percentage, e.g. `"8%"`.
    pub risk: String,
    #[serde(skip)]
    pub risk_percent: u32,
    pub risk_category: &'static str,
    pub status: Status,
    pub recommendation: &'static str,
    pub timeframe: &'static str,
}

struct PointTables {
    age: ThresholdTable<i32>,
    total_cholesterol: ThresholdTable<i32>,
    hdl_cholesterol: ThresholdTable<i32>,
    systolic_treated: ThresholdTable<i32>,
    systolic_untreated: ThresholdTable<i32>,
    smoker: i32,
    diabetic: i32,
}

static MALE: PointTables = PointTables {
    age: ThresholdTable::new(
        "framingham.male.age",
        &[
            (Bound::Below(40.0), 0),
            (Bound::Below(50.0), 3),
            (Bound::Below(60.0), 6),
            (Bound::Below(70.0), 10),
        ],
        11,
    ),
    total_cholesterol: ThresholdTable::new(
        "framingham.male.total_cholesterol",
        &[
            (Bound::Below(200.0), 0),
            (Bound::Below(240.0), 1),
            (Bound::Below(280.0), 2),
        ],
        3,
    ),
    hdl_cholesterol: ThresholdTable::new(
        "framingham.male.hdl_cholesterol",
        &[
            (Bound::Below(35.0), 2),
            (Bound::Below(45.0), 1),
            (Bound::Below(60.0), 0),
        ],
        -1,
    ),
    systolic_treated: ThresholdTable::new(
        "framingham.male.systolic_treated",
        &[
            (Bound::Below(120.0), 0),
            (Bound::Below(140.0), 1),
            (Bound::Below(160.0), 2),
        ],
        3,
    ),
    systolic_untreated: ThresholdTable::new(
        "framingham.male.systolic_untreated",
        &[(Bound::Below(140.0), 0), (Bound::Below(160.0), 1)],
        2,
    ),
    smoker: 2,
    diabetic: 2,
};

static FEMALE: PointTables = PointTables {
    age: ThresholdTable::new(
        "framingham.female.age",
        &[
            (Bound::Below(40.0), 0),
            (Bound::Below(50.0), 2),
            (Bound::Below(60.0), 6),
            (Bound::Below(70.0), 9),
        ],
        12,
    ),
    total_cholesterol: ThresholdTable::new(
        "framingham.female.total_cholesterol",
        &[
            (Bound::Below(200.0), 0),
            (Bound::Below(240.0), 1),
            (Bound::Below(280.0), 2),
        ],
        4,
    ),
    hdl_cholesterol: ThresholdTable::new(
        "framingham.female.hdl_cholesterol",
        &[
            (Bound::Below(35.0), 5),
            (Bound::Below(45.0), 2),
            (Bound::Below(50.0), 1),
            (Bound::Below(60.0), 0),
        ],
        -2,
    ),
    systolic_treated: ThresholdTable::new(
        "framingham.female.systolic_treated",
        &[
            (Bound::Below(120.0), 0),
            (Bound::Below(140.0), 2),
            (Bound::Below(160.0), 3),
        ],
        4,
    ),
    systolic_untreated: ThresholdTable::new(
        "framingham.female.systolic_untreated",
        &[
            (Bound::Below(120.0), 0),
            (Bound::Below(140.0), 1),
            (Bound::Below(160.0), 2),
        ],
        3,
    ),
    smoker: 3,
    diabetic: 4,
};

/// Points to 10-year risk percentage.
static RISK_PERCENT: ThresholdTable<u32> = ThresholdTable::new(
    "framingham.risk_percent",
    &[
        (Bound::Below(0.0), 1),
        (Bound::AtMost(4.0), 2),
        (Bound::AtMost(6.0), 5),
        (Bound::AtMost(8.0), 8),
        (Bound::AtMost(10.0), 11),
        (Bound::AtMost(12.0), 16),
        (Bound::AtMost(14.0), 22),
        (Bound::AtMost(16.0), 27),
    ],
    30,
);

static RISK_CATEGORY: ThresholdTable<Classification> = ThresholdTable::new(
    "framingham.risk_category",
    &[
        (
            Bound::Below(10.0),
            Classification::new(
                "Low Risk",
                Status::Normal,
                "Lifestyle modifications, routine monitoring",
            ),
        ),
        (
            Bound::Below(20.0),
            Classification::new(
                "Moderate Risk",
                Status::Borderline,
                "Consider statin therapy, aggressive lifestyle changes",
            ),
        ),
    ],
    Classification::new(
        "High Risk",
        Status::Abnormal,
        "Statin therapy recommended, intensive risk factor modification",
    ),
);

fn tables_for(gender: Gender) -> &'static PointTables {
    match gender {
        Gender::Male => &MALE,
        Gender::Female => &FEMALE,
    }
}

/// Accumulates Framingham points for a validated input.
pub fn score(input: &FraminghamInput) -> CalcResult<ScoreAccumulator> {
    let age = measure("age", input.age, AGE_YEARS)?;
    let total = measure(
        "totalCholesterol",
        input.total_cholesterol,
        TOTAL_CHOLESTEROL_MG_DL,
    )?;
    let hdl = measure("hdlCholesterol", input.hdl_cholesterol, HDL_CHOLESTEROL_MG_DL)?;
    let systolic = measure("systolicBP", input.systolic_bp, SYSTOLIC_MMHG)?;

    let tables = tables_for(input.gender);
    let systolic_table = if input.on_bp_meds {
        &tables.systolic_treated
    } else {
        &tables.systolic_untreated
    };

    let mut acc = ScoreAccumulator::new();
    acc.add("age", *tables.age.classify(age))
        .add("totalCholesterol", *tables.total_cholesterol.classify(total))
        .add("hdlCholesterol", *tables.hdl_cholesterol.classify(hdl))
        .add("systolicBP", *systolic_table.classify(systolic))
        .add_if(input.is_smoker, "isSmoker", tables.smoker)
        .add_if(input.is_diabetic, "isDiabetic", tables.diabetic);
    Ok(acc)
}

pub fn risk_percent(points: i32) -> u32 {
    *RISK_PERCENT.classify(f64::from(points))
}

pub fn risk_category(risk_percent: u32) -> &'static Classification {
    RISK_CATEGORY.classify(f64::from(risk_percent))
}

pub fn calculate(input: &FraminghamInput) -> CalcResult<FraminghamResult> {
    let acc = score(input)?;
    let points = acc.total();
    tracing::debug!(
        gender = input.gender.as_str(),
        points,
        breakdown = ?acc.contributions(),
        "framingham points"
    );

    let percent = risk_percent(points);
    let category = risk_category(percent);

    Ok(FraminghamResult {
        points,
        risk: format!("{percent}%"),
        risk_percent: percent,
        risk_category: category.category,
        status: category.status,
        recommendation: category.recommendation,
        timeframe: TIMEFRAME,
    })
}

pub(crate) fn tables() -> Vec<&'static dyn CheckTable> {
    let mut all: Vec<&'static dyn CheckTable> = vec![&RISK_PERCENT, &RISK_CATEGORY];
    for t in [&MALE, &FEMALE] {
        all.extend([
            &t.age as &dyn CheckTable,
            &t.total_cholesterol,
            &t.hdl_cholesterol,
            &t.systolic_treated,
            &t.systolic_untreated,
        ]);
    }
    all
}
