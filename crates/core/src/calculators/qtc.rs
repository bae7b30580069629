//! Heart-rate corrected QT interval.

use crate::config::OptionPolicy;
use crate::status::Status;
use crate::threshold::{Bound, CheckTable, ThresholdTable};
use crate::validation::{finite_output, measure, positive_finite, HEART_RATE_BPM, QT_MS};
use crate::{CalcError, CalcResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// QT correction formula. Bazett is the default when the caller does not choose one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QtcFormula {
    /// `QT / RR^(1/2)`
    #[default]
    Bazett,
    /// `QT / RR^(1/3)`, less over-correction at high heart rates
    Fridericia,
}

impl QtcFormula {
    /// Capitalised display name echoed back in results.
    pub fn display_name(&self) -> &'static str {
        match self {
            QtcFormula::Bazett => "Bazett",
            QtcFormula::Fridericia => "Fridericia",
        }
    }

    /// Corrected QT in milliseconds for an RR interval in seconds.
    pub fn correct(&self, qt_ms: f64, rr_seconds: f64) -> f64 {
        match self {
            QtcFormula::Bazett => qt_ms / rr_seconds.sqrt(),
            QtcFormula::Fridericia => qt_ms / rr_seconds.powf(1.0 / 3.0),
        }
    }
}

impl FromStr for QtcFormula {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bazett" => Ok(QtcFormula::Bazett),
            "fridericia" => Ok(QtcFormula::Fridericia),
            other => Err(CalcError::unsupported(
                "formula",
                format!("unknown QTc formula `{other}`, expected `bazett` or `fridericia`"),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct QtcInput {
    /// Measured QT interval in milliseconds.
    pub qt: f64,
    pub heart_rate: f64,
    /// Formula name as supplied by the caller; `None` selects Bazett.
    #[serde(default)]
    pub formula: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QtcResult {
    pub qtc: i64,
    pub qt: f64,
    pub heart_rate: f64,
    pub formula: &'static str,
    pub interpretation: &'static str,
    pub risk: &'static str,
    pub status: Status,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QtcBand {
    pub interpretation: &'static str,
    pub risk: &'static str,
    pub status: Status,
}

const fn band(interpretation: &'static str, risk: &'static str, status: Status) -> QtcBand {
    QtcBand {
        interpretation,
        risk,
        status,
    }
}

static INTERPRETATION: ThresholdTable<QtcBand> = ThresholdTable::new(
    "qtc.interpretation",
    &[
        (
            Bound::Below(390.0),
            band(
                "Short QT (possible Short QT Syndrome)",
                "Abnormal - consider genetic testing",
                Status::Abnormal,
            ),
        ),
        (
            Bound::AtMost(450.0),
            band("Normal QTc", "Normal", Status::Normal),
        ),
        (
            Bound::AtMost(470.0),
            band("Borderline prolonged", "Low", Status::Borderline),
        ),
        (
            Bound::AtMost(500.0),
            band(
                "Prolonged QTc",
                "Moderate - monitor for Torsades de Pointes",
                Status::Abnormal,
            ),
        ),
    ],
    band(
        "Severely prolonged QTc",
        "High - increased risk of sudden cardiac death",
        Status::Critical,
    ),
);

/// Resolves the caller's formula string.
///
/// Under [`OptionPolicy::Lenient`] an unknown name falls back to Bazett and the returned
/// warning explains the substitution; under [`OptionPolicy::Strict`] it is an error.
pub fn resolve_formula(
    raw: Option<&str>,
    policy: OptionPolicy,
) -> CalcResult<(QtcFormula, Option<String>)> {
    let raw = match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => return Ok((QtcFormula::default(), None)),
        Some(raw) => raw,
    };

    match (raw.parse::<QtcFormula>(), policy) {
        (Ok(formula), _) => Ok((formula, None)),
        (Err(err), OptionPolicy::Strict) => Err(err),
        (Err(_), OptionPolicy::Lenient) => {
            tracing::warn!(formula = raw, "unknown QTc formula, falling back to Bazett");
            Ok((
                QtcFormula::Bazett,
                Some(format!("unknown formula `{raw}`; Bazett used instead")),
            ))
        }
    }
}

pub fn interpret(qtc: f64) -> &'static QtcBand {
    INTERPRETATION.classify(qtc)
}

pub fn calculate(input: &QtcInput, policy: OptionPolicy) -> CalcResult<QtcResult> {
    let qt = measure("qt", input.qt, QT_MS)?;
    let heart_rate = measure("heartRate", input.heart_rate, HEART_RATE_BPM)?;
    let (formula, warning) = resolve_formula(input.formula.as_deref(), policy)?;

    let rr = positive_finite("RR interval", 60.0 / heart_rate)?;
    let qtc = finite_output("QTc", formula.correct(qt, rr))?;
    let band = interpret(qtc);

    Ok(QtcResult {
        qtc: qtc.round() as i64,
        qt,
        heart_rate,
        formula: formula.display_name(),
        interpretation: band.interpretation,
        risk: band.risk,
        status: band.status,
        warnings: warning.into_iter().collect(),
    })
}

pub(crate) fn tables() -> Vec<&'static dyn CheckTable> {
    vec![&INTERPRETATION]
}
