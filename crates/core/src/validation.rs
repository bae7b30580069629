//! Input validation.
//!
//! Every numeric input is checked against a conservative physiological range before any table
//! lookup. Ranges are deliberately wide: they reject data-entry errors and impossible values
//! (negative weights, a heart rate of zero used as a divisor), not unusual patients.

use crate::{CalcError, CalcResult};
use clinscore_types::{Measurement, PlausibleRange};

/// Age in years.
pub const AGE_YEARS: PlausibleRange = PlausibleRange::inclusive(0.0, 120.0);
/// Total cholesterol in mg/dL.
pub const TOTAL_CHOLESTEROL_MG_DL: PlausibleRange = PlausibleRange::inclusive(50.0, 1000.0);
/// HDL cholesterol in mg/dL.
pub const HDL_CHOLESTEROL_MG_DL: PlausibleRange = PlausibleRange::inclusive(5.0, 300.0);
/// Systolic blood pressure in mmHg.
pub const SYSTOLIC_MMHG: PlausibleRange = PlausibleRange::inclusive(40.0, 300.0);
/// Diastolic blood pressure in mmHg.
pub const DIASTOLIC_MMHG: PlausibleRange = PlausibleRange::inclusive(20.0, 200.0);
/// Heart rate in beats per minute. Zero is excluded: it is a divisor in QTc and CO.
pub const HEART_RATE_BPM: PlausibleRange = PlausibleRange::above(0.0, 350.0);
/// Uncorrected QT interval in milliseconds.
pub const QT_MS: PlausibleRange = PlausibleRange::inclusive(100.0, 1000.0);
/// Stroke volume in millilitres.
pub const STROKE_VOLUME_ML: PlausibleRange = PlausibleRange::above(0.0, 400.0);
/// Body weight in kilograms (after unit conversion).
pub const WEIGHT_KG: PlausibleRange = PlausibleRange::above(0.0, 500.0);
/// Body height in centimetres (after unit conversion).
pub const HEIGHT_CM: PlausibleRange = PlausibleRange::above(0.0, 300.0);
/// Body height in metres (after unit conversion), used where metric heights are metres.
pub const HEIGHT_M: PlausibleRange = PlausibleRange::above(0.0, 3.0);
/// Core temperature in degrees Celsius.
pub const TEMPERATURE_C: PlausibleRange = PlausibleRange::inclusive(20.0, 46.0);
/// Peripheral oxygen saturation in percent.
pub const SPO2_PERCENT: PlausibleRange = PlausibleRange::inclusive(0.0, 100.0);
/// Respiratory rate in breaths per minute.
pub const RESPIRATORY_RATE_PER_MIN: PlausibleRange = PlausibleRange::inclusive(0.0, 100.0);

/// Validates `value` for `field` and returns it unchanged.
///
/// # Errors
///
/// Returns [`CalcError::Validation`] naming `field` when the value is non-finite or outside
/// `range`.
pub fn measure(field: &str, value: f64, range: PlausibleRange) -> CalcResult<f64> {
    Measurement::new(value, range)
        .map(|m| m.value())
        .map_err(|e| CalcError::validation(field, e.to_string()))
}

/// Guards a derived quantity (BSA, RR interval) that later acts as a divisor.
pub(crate) fn positive_finite(what: &str, value: f64) -> CalcResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(CalcError::Computation(format!(
            "{what} must be a positive finite number, got {value}"
        )))
    }
}

/// Guards a computed output before it is classified or returned.
pub(crate) fn finite_output(what: &str, value: f64) -> CalcResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::Computation(format!("{what} is not finite")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measure_accepts_value_in_range() {
        assert_eq!(measure("heartRate", 72.0, HEART_RATE_BPM), Ok(72.0));
    }

    #[test]
    fn measure_rejects_zero_heart_rate() {
        let err = measure("heartRate", 0.0, HEART_RATE_BPM).expect_err("zero heart rate");
        assert!(matches!(&err, CalcError::Validation { field, .. } if field == "heartRate"));
        assert_eq!(err.field(), Some("heartRate"));
    }

    #[test]
    fn measure_rejects_spo2_above_100() {
        let err = measure("spO2", 100.5, SPO2_PERCENT).expect_err("spO2 over 100");
        assert!(
            matches!(err, CalcError::Validation { reason, .. } if reason.contains("[0, 100]"))
        );
    }

    #[test]
    fn measure_rejects_nan() {
        let err = measure("age", f64::NAN, AGE_YEARS).expect_err("nan age");
        assert!(matches!(err, CalcError::Validation { reason, .. } if reason.contains("finite")));
    }

    #[test]
    fn positive_finite_rejects_zero() {
        assert!(matches!(
            positive_finite("bsa", 0.0),
            Err(CalcError::Computation(_))
        ));
        assert_eq!(positive_finite("bsa", 1.9), Ok(1.9));
    }
}
