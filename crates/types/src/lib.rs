//! Validated measurement primitives shared by the Clinscore crates.
//!
//! A [`Measurement`] is a finite `f64` that has been checked against a [`PlausibleRange`].
//! Calculators only ever see measurements that passed this check, so threshold lookups never
//! operate on `NaN` or on values outside the physiological domain they were written for.

use std::fmt;

/// Errors that can occur when constructing a validated measurement.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeasurementError {
    /// The input was `NaN` or infinite
    #[error("value must be a finite number")]
    NonFinite,
    /// The input was finite but outside the accepted range
    #[error("value {value} is outside the plausible range {range}")]
    OutOfRange { value: f64, range: PlausibleRange },
}

/// A closed (or left-open) interval of physiologically plausible values.
///
/// Ranges are written as `[min, max]`, or `(min, max]` when the lower bound itself is not a
/// usable value (for example a heart rate of zero used as a divisor).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlausibleRange {
    min: f64,
    max: f64,
    min_exclusive: bool,
}

impl PlausibleRange {
    /// Range including both bounds: `[min, max]`.
    pub const fn inclusive(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            min_exclusive: false,
        }
    }

    /// Range excluding the lower bound: `(min, max]`.
    pub const fn above(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            min_exclusive: true,
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Returns `true` when `value` lies inside the range. `NaN` is never contained.
    pub fn contains(&self, value: f64) -> bool {
        let above_min = if self.min_exclusive {
            value > self.min
        } else {
            value >= self.min
        };
        above_min && value <= self.max
    }
}

impl fmt::Display for PlausibleRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let open = if self.min_exclusive { '(' } else { '[' };
        write!(f, "{open}{}, {}]", self.min, self.max)
    }
}

/// A finite measurement known to lie inside a [`PlausibleRange`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Measurement(f64);

impl Measurement {
    /// Validates `value` against `range`.
    ///
    /// # Errors
    ///
    /// Returns [`MeasurementError::NonFinite`] for `NaN`/infinite input and
    /// [`MeasurementError::OutOfRange`] when the value falls outside `range`.
    pub fn new(value: f64, range: PlausibleRange) -> Result<Self, MeasurementError> {
        if !value.is_finite() {
            return Err(MeasurementError::NonFinite);
        }
        if !range.contains(value) {
            return Err(MeasurementError::OutOfRange { value, range });
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl serde::Serialize for Measurement {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_f64(self.0)
    }
}
