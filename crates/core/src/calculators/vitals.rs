//! Five-parameter vital signs assessment.
//!
//! Blood pressure, heart rate, temperature, SpO2 and respiratory rate are assessed
//! independently through their own tables and then combined: the overall status is the most
//! severe sub-assessment status, and every non-normal overall status carries alerts.

use crate::status::{Classification, Status};
use crate::threshold::{Bound, CheckTable, ThresholdTable};
use crate::validation::{
    measure, DIASTOLIC_MMHG, HEART_RATE_BPM, RESPIRATORY_RATE_PER_MIN, SPO2_PERCENT,
    SYSTOLIC_MMHG, TEMPERATURE_C,
};
use crate::CalcResult;
use serde::{Deserialize, Serialize};

pub const CRITICAL_ALERT: &str = "CRITICAL: Immediate medical attention required";
pub const ABNORMAL_ALERT: &str = "Abnormal vital signs detected - monitor closely";
pub const BORDERLINE_ALERT: &str = "Borderline vital signs - recheck and continue observation";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VitalSignsInput {
    /// mmHg
    pub systolic: f64,
    /// mmHg
    pub diastolic: f64,
    /// beats/min
    pub heart_rate: f64,
    /// °C
    pub temperature: f64,
    /// %
    #[serde(rename = "spO2")]
    pub sp_o2: f64,
    /// breaths/min
    pub respiratory_rate: f64,
}

// ============================================================================
// Blood pressure
// ============================================================================

/// Blood pressure category, declared in ascending precedence.
///
/// Systolic and diastolic values are classified separately and the higher-ranked category
/// wins. Hypotension outranks both hypertension stages; only a hypertensive crisis outranks it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BpCategory {
    Normal,
    Elevated,
    Stage1,
    Stage2,
    Hypotension,
    Crisis,
}

impl BpCategory {
    pub fn classification(&self) -> Classification {
        match self {
            BpCategory::Normal => Classification::new(
                "Normal",
                Status::Normal,
                "Blood pressure is within normal range",
            ),
            BpCategory::Elevated => Classification::new(
                "Elevated",
                Status::Borderline,
                "Lifestyle modifications recommended",
            ),
            BpCategory::Stage1 => Classification::new(
                "Hypertension Stage 1",
                Status::Abnormal,
                "Consider antihypertensive therapy and lifestyle changes",
            ),
            BpCategory::Stage2 => Classification::new(
                "Hypertension Stage 2",
                Status::Abnormal,
                "Antihypertensive therapy required",
            ),
            BpCategory::Hypotension => Classification::new(
                "Hypotension",
                Status::Abnormal,
                "Low blood pressure - check for dehydration, shock, or medication effects",
            ),
            BpCategory::Crisis => Classification::new(
                "Hypertensive Crisis",
                Status::Critical,
                "EMERGENCY - Immediate medical attention required",
            ),
        }
    }
}

static SYSTOLIC: ThresholdTable<BpCategory> = ThresholdTable::new(
    "vitals.systolic",
    &[
        (Bound::Below(90.0), BpCategory::Hypotension),
        (Bound::Below(120.0), BpCategory::Normal),
        (Bound::Below(130.0), BpCategory::Elevated),
        (Bound::Below(140.0), BpCategory::Stage1),
        (Bound::Below(180.0), BpCategory::Stage2),
    ],
    BpCategory::Crisis,
);

static DIASTOLIC: ThresholdTable<BpCategory> = ThresholdTable::new(
    "vitals.diastolic",
    &[
        (Bound::Below(60.0), BpCategory::Hypotension),
        (Bound::Below(80.0), BpCategory::Normal),
        (Bound::Below(90.0), BpCategory::Stage1),
        (Bound::Below(120.0), BpCategory::Stage2),
    ],
    BpCategory::Crisis,
);

// ============================================================================
// Single-value tables
// ============================================================================

static HEART_RATE: ThresholdTable<Classification> = ThresholdTable::new(
    "vitals.heart_rate",
    &[
        (
            Bound::Below(40.0),
            Classification::new(
                "Severe Bradycardia",
                Status::Critical,
                "Severe bradycardia - check for heart block, medications",
            ),
        ),
        (
            Bound::Below(60.0),
            Classification::new(
                "Bradycardia",
                Status::Borderline,
                "Low heart rate - may be normal for athletes",
            ),
        ),
        (
            Bound::AtMost(100.0),
            Classification::new(
                "Normal",
                Status::Normal,
                "Heart rate is within normal range",
            ),
        ),
        (
            Bound::AtMost(120.0),
            Classification::new(
                "Tachycardia",
                Status::Borderline,
                "Elevated heart rate - check for fever, anxiety, dehydration",
            ),
        ),
    ],
    Classification::new(
        "Severe Tachycardia",
        Status::Abnormal,
        "High heart rate - evaluate for arrhythmia, sepsis, or cardiac issues",
    ),
);

static TEMPERATURE: ThresholdTable<Classification> = ThresholdTable::new(
    "vitals.temperature",
    &[
        (
            Bound::Below(35.0),
            Classification::new(
                "Hypothermia",
                Status::Critical,
                "Hypothermia - warm patient, check for exposure",
            ),
        ),
        (
            Bound::Below(36.5),
            Classification::new("Low", Status::Borderline, "Below normal temperature"),
        ),
        (
            Bound::AtMost(37.5),
            Classification::new(
                "Normal",
                Status::Normal,
                "Temperature is within normal range",
            ),
        ),
        (
            Bound::AtMost(38.3),
            Classification::new(
                "Low-grade Fever",
                Status::Borderline,
                "Mild fever - monitor for infection",
            ),
        ),
        (
            Bound::AtMost(39.4),
            Classification::new(
                "Moderate Fever",
                Status::Abnormal,
                "Moderate fever - consider antipyretics, investigate source",
            ),
        ),
    ],
    Classification::new(
        "High Fever",
        Status::Critical,
        "High fever - immediate evaluation for sepsis, meningitis",
    ),
);

static SPO2: ThresholdTable<Classification> = ThresholdTable::new(
    "vitals.spo2",
    &[
        (
            Bound::Below(90.0),
            Classification::new(
                "Severe Hypoxemia",
                Status::Critical,
                "CRITICAL - Oxygen therapy required immediately",
            ),
        ),
        (
            Bound::Below(94.0),
            Classification::new(
                "Hypoxemia",
                Status::Abnormal,
                "Low oxygen saturation - consider oxygen supplementation",
            ),
        ),
        (
            Bound::Below(96.0),
            Classification::new(
                "Borderline",
                Status::Borderline,
                "Monitor oxygen saturation closely",
            ),
        ),
    ],
    Classification::new(
        "Normal",
        Status::Normal,
        "Oxygen saturation is within normal range",
    ),
);

static RESPIRATORY_RATE: ThresholdTable<Classification> = ThresholdTable::new(
    "vitals.respiratory_rate",
    &[
        (
            Bound::Below(8.0),
            Classification::new(
                "Severe Bradypnea",
                Status::Critical,
                "Dangerously low respiratory rate - check airway, consider ventilation",
            ),
        ),
        (
            Bound::Below(12.0),
            Classification::new(
                "Bradypnea",
                Status::Borderline,
                "Low respiratory rate - monitor closely",
            ),
        ),
        (
            Bound::AtMost(20.0),
            Classification::new(
                "Normal",
                Status::Normal,
                "Respiratory rate is within normal range",
            ),
        ),
        (
            Bound::AtMost(24.0),
            Classification::new(
                "Tachypnea",
                Status::Borderline,
                "Elevated respiratory rate - check for fever, anxiety, pain",
            ),
        ),
    ],
    Classification::new(
        "Severe Tachypnea",
        Status::Abnormal,
        "High respiratory rate - evaluate for respiratory distress, metabolic acidosis",
    ),
);

// ============================================================================
// Sub-assessments
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BloodPressureAssessment {
    pub systolic: f64,
    pub diastolic: f64,
    #[serde(flatten)]
    pub classification: Classification,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeartRateAssessment {
    pub heart_rate: f64,
    #[serde(flatten)]
    pub classification: Classification,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemperatureAssessment {
    pub temperature: f64,
    #[serde(flatten)]
    pub classification: Classification,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OxygenSaturationAssessment {
    #[serde(rename = "spO2")]
    pub sp_o2: f64,
    #[serde(flatten)]
    pub classification: Classification,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RespiratoryRateAssessment {
    pub respiratory_rate: f64,
    #[serde(flatten)]
    pub classification: Classification,
}

/// The fixed set of parameters combined into the overall status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VitalSign {
    BloodPressure,
    HeartRate,
    Temperature,
    OxygenSaturation,
    RespiratoryRate,
}

impl VitalSign {
    pub fn label(&self) -> &'static str {
        match self {
            VitalSign::BloodPressure => "Blood pressure",
            VitalSign::HeartRate => "Heart rate",
            VitalSign::Temperature => "Temperature",
            VitalSign::OxygenSaturation => "Oxygen saturation",
            VitalSign::RespiratoryRate => "Respiratory rate",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalSignsAssessment {
    pub blood_pressure: BloodPressureAssessment,
    pub heart_rate: HeartRateAssessment,
    pub temperature: TemperatureAssessment,
    pub oxygen_saturation: OxygenSaturationAssessment,
    pub respiratory_rate: RespiratoryRateAssessment,
    pub overall_status: Status,
    pub alerts: Vec<String>,
}

impl VitalSignsAssessment {
    /// Each parameter with the classification it received.
    pub fn findings(&self) -> [(VitalSign, &Classification); 5] {
        [
            (VitalSign::BloodPressure, &self.blood_pressure.classification),
            (VitalSign::HeartRate, &self.heart_rate.classification),
            (VitalSign::Temperature, &self.temperature.classification),
            (
                VitalSign::OxygenSaturation,
                &self.oxygen_saturation.classification,
            ),
            (
                VitalSign::RespiratoryRate,
                &self.respiratory_rate.classification,
            ),
        ]
    }
}

pub fn blood_pressure_category(systolic: f64, diastolic: f64) -> BpCategory {
    (*SYSTOLIC.classify(systolic)).max(*DIASTOLIC.classify(diastolic))
}

pub fn assess_blood_pressure(systolic: f64, diastolic: f64) -> CalcResult<BloodPressureAssessment> {
    let systolic = measure("systolic", systolic, SYSTOLIC_MMHG)?;
    let diastolic = measure("diastolic", diastolic, DIASTOLIC_MMHG)?;
    Ok(BloodPressureAssessment {
        systolic,
        diastolic,
        classification: blood_pressure_category(systolic, diastolic).classification(),
    })
}

pub fn assess_heart_rate(heart_rate: f64) -> CalcResult<HeartRateAssessment> {
    let heart_rate = measure("heartRate", heart_rate, HEART_RATE_BPM)?;
    Ok(HeartRateAssessment {
        heart_rate,
        classification: *HEART_RATE.classify(heart_rate),
    })
}

pub fn assess_temperature(temperature: f64) -> CalcResult<TemperatureAssessment> {
    let temperature = measure("temperature", temperature, TEMPERATURE_C)?;
    Ok(TemperatureAssessment {
        temperature,
        classification: *TEMPERATURE.classify(temperature),
    })
}

pub fn assess_spo2(sp_o2: f64) -> CalcResult<OxygenSaturationAssessment> {
    let sp_o2 = measure("spO2", sp_o2, SPO2_PERCENT)?;
    Ok(OxygenSaturationAssessment {
        sp_o2,
        classification: *SPO2.classify(sp_o2),
    })
}

pub fn assess_respiratory_rate(respiratory_rate: f64) -> CalcResult<RespiratoryRateAssessment> {
    let respiratory_rate = measure("respiratoryRate", respiratory_rate, RESPIRATORY_RATE_PER_MIN)?;
    Ok(RespiratoryRateAssessment {
        respiratory_rate,
        classification: *RESPIRATORY_RATE.classify(respiratory_rate),
    })
}

/// Builds the alert list for an overall status: one fixed headline, then one line per
/// parameter that is not normal. Empty only when the overall status is normal.
fn alerts_for(overall: Status, findings: &[(VitalSign, &Classification); 5]) -> Vec<String> {
    let headline = match overall {
        Status::Normal => return Vec::new(),
        Status::Borderline => BORDERLINE_ALERT,
        Status::Abnormal => ABNORMAL_ALERT,
        Status::Critical => CRITICAL_ALERT,
    };

    let mut alerts = vec![headline.to_string()];
    alerts.extend(
        findings
            .iter()
            .filter(|(_, c)| c.status != Status::Normal)
            .map(|(sign, c)| format!("{}: {} ({})", sign.label(), c.category, c.status)),
    );
    alerts
}

pub fn assess(input: &VitalSignsInput) -> CalcResult<VitalSignsAssessment> {
    let mut assessment = VitalSignsAssessment {
        blood_pressure: assess_blood_pressure(input.systolic, input.diastolic)?,
        heart_rate: assess_heart_rate(input.heart_rate)?,
        temperature: assess_temperature(input.temperature)?,
        oxygen_saturation: assess_spo2(input.sp_o2)?,
        respiratory_rate: assess_respiratory_rate(input.respiratory_rate)?,
        overall_status: Status::Normal,
        alerts: Vec::new(),
    };

    let findings = assessment.findings();
    let overall = Status::worst(findings.iter().map(|(_, c)| c.status));
    let alerts = alerts_for(overall, &findings);

    assessment.overall_status = overall;
    assessment.alerts = alerts;
    Ok(assessment)
}

pub(crate) fn tables() -> Vec<&'static dyn CheckTable> {
    vec![
        &SYSTOLIC,
        &DIASTOLIC,
        &HEART_RATE,
        &TEMPERATURE,
        &SPO2,
        &RESPIRATORY_RATE,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CalcError;

    fn normal_vitals() -> VitalSignsInput {
        VitalSignsInput {
            systolic: 115.0,
            diastolic: 75.0,
            heart_rate: 72.0,
            temperature: 37.0,
            sp_o2: 98.0,
            respiratory_rate: 16.0,
        }
    }

    #[test]
    fn all_normal_has_no_alerts() {
        let assessment = assess(&normal_vitals()).expect("assess");
        assert_eq!(assessment.overall_status, Status::Normal);
        assert!(assessment.alerts.is_empty());
    }

    #[test]
    fn hypertensive_crisis_dominates_normal_parameters() {
        let input = VitalSignsInput {
            systolic: 200.0,
            diastolic: 130.0,
            heart_rate: 80.0,
            ..normal_vitals()
        };
        let assessment = assess(&input).expect("assess");
        assert_eq!(assessment.blood_pressure.classification.category, "Hypertensive Crisis");
        assert_eq!(assessment.blood_pressure.classification.status, Status::Critical);
        assert_eq!(assessment.overall_status, Status::Critical);
        assert_eq!(
            assessment.alerts,
            vec![
                CRITICAL_ALERT.to_string(),
                "Blood pressure: Hypertensive Crisis (critical)".to_string(),
            ]
        );
    }

    #[test]
    fn abnormal_outranks_borderline() {
        let input = VitalSignsInput {
            heart_rate: 55.0,
            sp_o2: 92.0,
            ..normal_vitals()
        };
        let assessment = assess(&input).expect("assess");
        assert_eq!(assessment.overall_status, Status::Abnormal);
        assert_eq!(assessment.alerts[0], ABNORMAL_ALERT);
        assert_eq!(assessment.alerts.len(), 3);
    }

    #[test]
    fn borderline_overall_still_alerts() {
        let input = VitalSignsInput {
            respiratory_rate: 22.0,
            ..normal_vitals()
        };
        let assessment = assess(&input).expect("assess");
        assert_eq!(assessment.overall_status, Status::Borderline);
        assert_eq!(
            assessment.alerts,
            vec![
                BORDERLINE_ALERT.to_string(),
                "Respiratory rate: Tachypnea (borderline)".to_string(),
            ]
        );
    }

    #[test]
    fn overall_status_is_worst_and_alerts_track_it() {
        let systolics = [85.0, 115.0, 125.0, 135.0, 150.0, 190.0];
        let heart_rates = [35.0, 55.0, 72.0, 110.0, 130.0];
        let temperatures = [34.0, 36.0, 37.0, 38.0, 39.0, 40.0];
        let spo2s = [85.0, 92.0, 95.0, 98.0];
        for &systolic in &systolics {
            for &heart_rate in &heart_rates {
                for &temperature in &temperatures {
                    for &sp_o2 in &spo2s {
                        let input = VitalSignsInput {
                            systolic,
                            heart_rate,
                            temperature,
                            sp_o2,
                            ..normal_vitals()
                        };
                        let a = assess(&input).expect("assess");
                        let worst = a
                            .findings()
                            .iter()
                            .map(|(_, c)| c.status)
                            .max()
                            .expect("five findings");
                        assert_eq!(a.overall_status, worst);
                        assert_eq!(a.alerts.is_empty(), worst == Status::Normal);
                    }
                }
            }
        }
    }

    #[test]
    fn systolic_breakpoints() {
        for (systolic, expected) in [
            (89.0, BpCategory::Hypotension),
            (90.0, BpCategory::Normal),
            (119.0, BpCategory::Normal),
            (120.0, BpCategory::Elevated),
            (129.0, BpCategory::Elevated),
            (130.0, BpCategory::Stage1),
            (139.0, BpCategory::Stage1),
            (140.0, BpCategory::Stage2),
            (179.0, BpCategory::Stage2),
            (180.0, BpCategory::Crisis),
        ] {
            assert_eq!(
                blood_pressure_category(systolic, 70.0),
                expected,
                "systolic {systolic}"
            );
        }
    }

    #[test]
    fn diastolic_breakpoints() {
        for (diastolic, expected) in [
            (59.0, BpCategory::Hypotension),
            (60.0, BpCategory::Normal),
            (79.0, BpCategory::Normal),
            (80.0, BpCategory::Stage1),
            (89.0, BpCategory::Stage1),
            (90.0, BpCategory::Stage2),
            (119.0, BpCategory::Stage2),
            (120.0, BpCategory::Crisis),
        ] {
            assert_eq!(
                blood_pressure_category(110.0, diastolic),
                expected,
                "diastolic {diastolic}"
            );
        }
    }

    #[test]
    fn either_pressure_upgrades_category() {
        assert_eq!(blood_pressure_category(150.0, 85.0), BpCategory::Stage2);
        assert_eq!(blood_pressure_category(118.0, 85.0), BpCategory::Stage1);
        assert_eq!(blood_pressure_category(125.0, 80.0), BpCategory::Stage1);
        assert_eq!(blood_pressure_category(200.0, 70.0), BpCategory::Crisis);
        assert_eq!(blood_pressure_category(170.0, 55.0), BpCategory::Hypotension);
        assert_eq!(blood_pressure_category(200.0, 55.0), BpCategory::Crisis);
    }

    #[test]
    fn heart_rate_breakpoints() {
        for (hr, expected) in [
            (39.0, Status::Critical),
            (40.0, Status::Borderline),
            (59.0, Status::Borderline),
            (60.0, Status::Normal),
            (100.0, Status::Normal),
            (101.0, Status::Borderline),
            (120.0, Status::Borderline),
            (121.0, Status::Abnormal),
        ] {
            let a = assess_heart_rate(hr).expect("heart rate");
            assert_eq!(a.classification.status, expected, "hr {hr}");
        }
    }

    #[test]
    fn temperature_breakpoints() {
        for (temp, expected) in [
            (34.9, "Hypothermia"),
            (35.0, "Low"),
            (36.4, "Low"),
            (36.5, "Normal"),
            (37.5, "Normal"),
            (37.6, "Low-grade Fever"),
            (38.3, "Low-grade Fever"),
            (38.4, "Moderate Fever"),
            (39.4, "Moderate Fever"),
            (39.5, "High Fever"),
        ] {
            let a = assess_temperature(temp).expect("temperature");
            assert_eq!(a.classification.category, expected, "temp {temp}");
        }
    }

    #[test]
    fn spo2_breakpoints() {
        for (spo2, expected) in [
            (89.0, Status::Critical),
            (90.0, Status::Abnormal),
            (93.9, Status::Abnormal),
            (94.0, Status::Borderline),
            (95.9, Status::Borderline),
            (96.0, Status::Normal),
            (100.0, Status::Normal),
        ] {
            let a = assess_spo2(spo2).expect("spo2");
            assert_eq!(a.classification.status, expected, "spo2 {spo2}");
        }
    }

    #[test]
    fn respiratory_rate_breakpoints() {
        for (rr, expected) in [
            (7.0, "Severe Bradypnea"),
            (8.0, "Bradypnea"),
            (11.0, "Bradypnea"),
            (12.0, "Normal"),
            (20.0, "Normal"),
            (21.0, "Tachypnea"),
            (24.0, "Tachypnea"),
            (25.0, "Severe Tachypnea"),
        ] {
            let a = assess_respiratory_rate(rr).expect("respiratory rate");
            assert_eq!(a.classification.category, expected, "rr {rr}");
        }
    }

    #[test]
    fn implausible_spo2_names_field() {
        let input = VitalSignsInput {
            sp_o2: 104.0,
            ..normal_vitals()
        };
        let err = assess(&input).expect_err("spO2 over 100");
        assert!(matches!(err, CalcError::Validation { field, .. } if field == "spO2"));
    }

    #[test]
    fn serialises_sub_assessments_with_wire_names() {
        let json = serde_json::to_value(assess(&normal_vitals()).expect("assess"))
            .expect("serialise");
        assert_eq!(json["overallStatus"], "normal");
        assert_eq!(json["oxygenSaturation"]["spO2"], 98.0);
        assert_eq!(json["heartRate"]["heartRate"], 72.0);
        assert_eq!(json["bloodPressure"]["category"], "Normal");
        assert_eq!(json["respiratoryRate"]["status"], "normal");
    }
}
