//! The scoring engine: calculators plus audit emission.
//!
//! Calculators themselves are pure functions in [`crate::calculators`]. The engine wraps each
//! one, applies the resolved [`EngineConfig`] and writes an audit record after every successful
//! calculation.

use crate::audit::{AuditAction, AuditContext, AuditRecord, AuditSink};
use crate::calculators::body::{self, BmiResult, BodyInput, BodyMetrics, BsaResult};
use crate::calculators::cardiac_output::{self, CardiacOutputInput, CardiacOutputResult};
use crate::calculators::cha2ds2_vasc::{self, Cha2ds2VascInput, Cha2ds2VascResult};
use crate::calculators::framingham::{self, FraminghamInput, FraminghamResult};
use crate::calculators::has_bled::{self, HasBledInput, HasBledResult};
use crate::calculators::qtc::{self, QtcInput, QtcResult};
use crate::calculators::vitals::{self, VitalSignsAssessment, VitalSignsInput};
use crate::config::EngineConfig;
use crate::CalcResult;
use serde_json::{json, Value};
use std::fmt;
use std::sync::Arc;

/// Runs calculations and audits them.
///
/// Cheap to clone; clones share the configuration and the audit sink.
#[derive(Clone)]
pub struct ScoringEngine {
    config: Arc<EngineConfig>,
    audit: Arc<dyn AuditSink>,
}

impl fmt::Debug for ScoringEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScoringEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ScoringEngine {
    pub fn new(config: EngineConfig, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            config: Arc::new(config),
            audit,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn framingham(
        &self,
        input: &FraminghamInput,
        context: &AuditContext,
    ) -> CalcResult<FraminghamResult> {
        let result = framingham::calculate(input)?;
        self.emit(
            AuditAction::Framingham,
            context,
            json!({ "risk": result.risk, "riskCategory": result.risk_category }),
        );
        Ok(result)
    }

    pub fn cha2ds2_vasc(
        &self,
        input: &Cha2ds2VascInput,
        context: &AuditContext,
    ) -> CalcResult<Cha2ds2VascResult> {
        let result = cha2ds2_vasc::calculate(input)?;
        self.emit(
            AuditAction::Cha2ds2Vasc,
            context,
            json!({ "score": result.score, "riskLevel": result.risk_level }),
        );
        Ok(result)
    }

    pub fn has_bled(
        &self,
        input: &HasBledInput,
        context: &AuditContext,
    ) -> CalcResult<HasBledResult> {
        let result = has_bled::calculate(input);
        self.emit(
            AuditAction::HasBled,
            context,
            json!({ "score": result.score }),
        );
        Ok(result)
    }

    /// Unknown formula names follow the configured [`crate::OptionPolicy`].
    pub fn qtc(&self, input: &QtcInput, context: &AuditContext) -> CalcResult<QtcResult> {
        let result = qtc::calculate(input, self.config.option_policy())?;
        self.emit(
            AuditAction::Qtc,
            context,
            json!({ "qtc": result.qtc, "interpretation": result.interpretation }),
        );
        Ok(result)
    }

    pub fn cardiac_output(
        &self,
        input: &CardiacOutputInput,
        context: &AuditContext,
    ) -> CalcResult<CardiacOutputResult> {
        let result = cardiac_output::calculate(input)?;
        self.emit(
            AuditAction::CardiacOutput,
            context,
            json!({ "co": result.cardiac_output, "ci": result.cardiac_index }),
        );
        Ok(result)
    }

    pub fn bmi(&self, input: &BodyInput, context: &AuditContext) -> CalcResult<BmiResult> {
        let result = body::bmi(input)?;
        self.emit(
            AuditAction::Bmi,
            context,
            json!({
                "weight": input.weight,
                "height": input.height,
                "unit": input.unit,
                "bmi": result.bmi,
            }),
        );
        Ok(result)
    }

    pub fn bsa(&self, input: &BodyInput, context: &AuditContext) -> CalcResult<BsaResult> {
        let result = body::bsa(input)?;
        self.emit(
            AuditAction::Bsa,
            context,
            json!({
                "weight": input.weight,
                "height": input.height,
                "unit": input.unit,
                "bsa": result.bsa,
            }),
        );
        Ok(result)
    }

    /// BMI and BSA together, audited as one BMI calculation.
    pub fn body_metrics(
        &self,
        input: &BodyInput,
        context: &AuditContext,
    ) -> CalcResult<BodyMetrics> {
        let result = body::body_metrics(input)?;
        self.emit(
            AuditAction::Bmi,
            context,
            json!({
                "weight": input.weight,
                "height": input.height,
                "unit": input.unit,
                "bmi": result.bmi.bmi,
                "bsa": result.bsa.bsa,
            }),
        );
        Ok(result)
    }

    pub fn vital_signs(
        &self,
        input: &VitalSignsInput,
        context: &AuditContext,
    ) -> CalcResult<VitalSignsAssessment> {
        let result = vitals::assess(input)?;
        self.emit(
            AuditAction::VitalSigns,
            context,
            json!({ "vitalSigns": input, "overallStatus": result.overall_status }),
        );
        Ok(result)
    }

    /// Hands a record to the sink. A sink failure is logged and swallowed.
    fn emit(&self, action: AuditAction, context: &AuditContext, details: Value) {
        if !self.config.audit_enabled() {
            return;
        }

        let record = AuditRecord::new(action, context, details, self.config.policy_version());
        let id = record.id;
        if let Err(err) = self.audit.record(record) {
            tracing::warn!(
                action = action.as_str(),
                audit_id = %id,
                error = %err,
                "failed to record audit entry"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::MemoryAuditSink;
    use crate::calculators::Gender;
    use crate::config::OptionPolicy;
    use crate::units::UnitSystem;
    use crate::{AuditError, CalcError};

    struct FailingSink;

    impl AuditSink for FailingSink {
        fn record(&self, _record: AuditRecord) -> Result<(), AuditError> {
            Err(AuditError::Poisoned)
        }
    }

    fn engine_with_memory(config: EngineConfig) -> (ScoringEngine, Arc<MemoryAuditSink>) {
        let sink = Arc::new(MemoryAuditSink::new());
        (ScoringEngine::new(config, sink.clone()), sink)
    }

    fn context() -> AuditContext {
        AuditContext::new(Some("hosp-1".into()), Some("dr-2".into()), Some("pt-3".into()))
    }

    fn reference_framingham() -> FraminghamInput {
        FraminghamInput {
            age: 55.0,
            gender: Gender::Male,
            total_cholesterol: 250.0,
            hdl_cholesterol: 50.0,
            systolic_bp: 130.0,
            is_smoker: false,
            is_diabetic: false,
            on_bp_meds: false,
        }
    }

    fn body_input() -> BodyInput {
        BodyInput {
            weight: 70.0,
            height: 1.75,
            unit: UnitSystem::Metric,
        }
    }

    #[test]
    fn successful_calculation_emits_one_record() {
        let (engine, sink) = engine_with_memory(EngineConfig::default());
        let result = engine
            .framingham(&reference_framingham(), &context())
            .expect("framingham");
        assert_eq!(result.points, 8);

        let records = sink.records();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.action, AuditAction::Framingham);
        assert_eq!(record.event_type, "MEDICAL_CALCULATION");
        assert_eq!(record.hospital_id.as_deref(), Some("hosp-1"));
        assert_eq!(record.user_id.as_deref(), Some("dr-2"));
        assert_eq!(record.patient_id.as_deref(), Some("pt-3"));
        assert_eq!(record.details["risk"], "8%");
        assert_eq!(record.details["riskCategory"], "Low Risk");
        assert_eq!(record.policy_version, "1.0.0");
    }

    #[test]
    fn failed_calculation_emits_nothing() {
        let (engine, sink) = engine_with_memory(EngineConfig::default());
        let input = FraminghamInput {
            age: -3.0,
            ..reference_framingham()
        };
        let err = engine
            .framingham(&input, &context())
            .expect_err("negative age");
        assert_eq!(err.field(), Some("age"));
        assert!(sink.records().is_empty());
    }

    #[test]
    fn sink_failure_does_not_fail_calculation() {
        let engine = ScoringEngine::new(EngineConfig::default(), Arc::new(FailingSink));
        let result = engine
            .has_bled(&HasBledInput::default(), &AuditContext::default())
            .expect("has-bled despite failing sink");
        assert_eq!(result.score, 0);
    }

    #[test]
    fn disabled_audit_skips_sink() {
        let config =
            EngineConfig::new(false, "1.0.0".into(), OptionPolicy::Lenient).expect("config");
        let (engine, sink) = engine_with_memory(config);
        engine.bmi(&body_input(), &context()).expect("bmi");
        assert!(sink.records().is_empty());
    }

    #[test]
    fn configured_policy_version_is_stamped() {
        let config =
            EngineConfig::new(true, "2.4.0".into(), OptionPolicy::Lenient).expect("config");
        let (engine, sink) = engine_with_memory(config);
        engine.bsa(&body_input(), &context()).expect("bsa");
        let records = sink.records();
        assert_eq!(records[0].policy_version, "2.4.0");
        assert_eq!(records[0].action, AuditAction::Bsa);
        assert_eq!(records[0].details["bsa"], 1.84);
        assert_eq!(records[0].details["unit"], "metric");
    }

    #[test]
    fn strict_config_rejects_unknown_qtc_formula() {
        let input = QtcInput {
            qt: 400.0,
            heart_rate: 60.0,
            formula: Some("framingham".into()),
        };

        let (lenient, _) = engine_with_memory(EngineConfig::default());
        let result = lenient.qtc(&input, &context()).expect("lenient");
        assert_eq!(result.formula, "Bazett");
        assert_eq!(result.warnings.len(), 1);

        let strict_config =
            EngineConfig::new(true, "1.0.0".into(), OptionPolicy::Strict).expect("config");
        let (strict, sink) = engine_with_memory(strict_config);
        let err = strict.qtc(&input, &context()).expect_err("strict");
        assert!(matches!(err, CalcError::UnsupportedOption { .. }));
        assert!(sink.records().is_empty());
    }

    #[test]
    fn body_metrics_is_audited_once_as_bmi() {
        let (engine, sink) = engine_with_memory(EngineConfig::default());
        engine.body_metrics(&body_input(), &context()).expect("metrics");
        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].action, AuditAction::Bmi);
        assert_eq!(records[0].details["bmi"], 22.9);
        assert_eq!(records[0].details["bsa"], 1.84);
    }

    #[test]
    fn vital_signs_details_echo_inputs() {
        let (engine, sink) = engine_with_memory(EngineConfig::default());
        let input = VitalSignsInput {
            systolic: 200.0,
            diastolic: 130.0,
            heart_rate: 80.0,
            temperature: 37.0,
            sp_o2: 98.0,
            respiratory_rate: 16.0,
        };
        engine.vital_signs(&input, &context()).expect("vitals");
        let details = &sink.records()[0].details;
        assert_eq!(details["overallStatus"], "critical");
        assert_eq!(details["vitalSigns"]["spO2"], 98.0);
        assert_eq!(details["vitalSigns"]["systolic"], 200.0);
    }

    #[test]
    fn clones_share_the_sink() {
        let (engine, sink) = engine_with_memory(EngineConfig::default());
        let clone = engine.clone();
        engine
            .cha2ds2_vasc(
                &Cha2ds2VascInput {
                    age: 70.0,
                    gender: Gender::Female,
                    has_congestive_hf: false,
                    has_hypertension: true,
                    has_diabetes: false,
                    has_stroke_tia: false,
                    has_vascular_disease: false,
                },
                &context(),
            )
            .expect("cha2ds2-vasc");
        clone
            .cardiac_output(
                &CardiacOutputInput {
                    heart_rate: 70.0,
                    stroke_volume: 70.0,
                    weight: 70.0,
                    height: 175.0,
                    unit: UnitSystem::Metric,
                },
                &context(),
            )
            .expect("cardiac output");
        let actions: Vec<_> = sink.records().iter().map(|r| r.action).collect();
        assert_eq!(
            actions,
            vec![AuditAction::Cha2ds2Vasc, AuditAction::CardiacOutput]
        );
    }
}
