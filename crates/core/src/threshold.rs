//! Data-driven threshold tables.
//!
//! Every calculator turns a number into an outcome by walking an ordered list of upper bounds.
//! Tables are plain `static` data so a change to a breakpoint is a one-line diff, and the
//! boundary semantics of each band (`<` vs `<=`) are written next to the value.
//!
//! A table is a sequence of bands `(bound, outcome)` followed by an open-ended `otherwise`
//! outcome. The first band whose bound admits the value wins; values past the last bound fall
//! through to `otherwise`, so every finite input classifies.

/// Upper bound of a band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    /// The band covers values strictly below the limit.
    Below(f64),
    /// The band covers values up to and including the limit.
    AtMost(f64),
}

impl Bound {
    pub fn limit(&self) -> f64 {
        match self {
            Bound::Below(limit) | Bound::AtMost(limit) => *limit,
        }
    }

    pub fn admits(&self, value: f64) -> bool {
        match self {
            Bound::Below(limit) => value < *limit,
            Bound::AtMost(limit) => value <= *limit,
        }
    }
}

/// Structural problems detected by [`ThresholdTable::check`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TableError {
    #[error("table {table}: bound at index {index} is not finite")]
    NonFiniteBound { table: &'static str, index: usize },
    #[error("table {table}: bound at index {index} does not increase on the previous bound")]
    NotMonotonic { table: &'static str, index: usize },
}

/// An ordered, gap-free partition of the real line into outcomes.
#[derive(Debug)]
pub struct ThresholdTable<T: 'static> {
    name: &'static str,
    bands: &'static [(Bound, T)],
    otherwise: T,
}

impl<T> ThresholdTable<T> {
    pub const fn new(name: &'static str, bands: &'static [(Bound, T)], otherwise: T) -> Self {
        Self {
            name,
            bands,
            otherwise,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the outcome of the first band admitting `value`.
    ///
    /// No band admits `NaN`, so it falls through to `otherwise`. Calculators validate their
    /// inputs before classifying and never rely on this.
    pub fn classify(&self, value: f64) -> &T {
        self.bands
            .iter()
            .find(|(bound, _)| bound.admits(value))
            .map(|(_, outcome)| outcome)
            .unwrap_or(&self.otherwise)
    }

    /// Bounded bands in evaluation order, excluding the open-ended outcome.
    pub fn bands(&self) -> &'static [(Bound, T)] {
        self.bands
    }

    pub fn otherwise(&self) -> &T {
        &self.otherwise
    }

    /// Verifies that every bound is finite and that limits strictly increase.
    pub fn check(&self) -> Result<(), TableError> {
        let mut previous: Option<f64> = None;
        for (index, (bound, _)) in self.bands.iter().enumerate() {
            let limit = bound.limit();
            if !limit.is_finite() {
                return Err(TableError::NonFiniteBound {
                    table: self.name,
                    index,
                });
            }
            if previous.is_some_and(|p| limit <= p) {
                return Err(TableError::NotMonotonic {
                    table: self.name,
                    index,
                });
            }
            previous = Some(limit);
        }
        Ok(())
    }
}

/// Object-safe view over tables of any outcome type, used to check every shipped table.
pub trait CheckTable: Sync {
    fn table_name(&self) -> &'static str;
    fn check_table(&self) -> Result<(), TableError>;
}

impl<T: Sync> CheckTable for ThresholdTable<T> {
    fn table_name(&self) -> &'static str {
        self.name
    }

    fn check_table(&self) -> Result<(), TableError> {
        self.check()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LADDER_BANDS: &[(Bound, &str)] = &[
        (Bound::Below(10.0), "low"),
        (Bound::AtMost(20.0), "mid"),
    ];
    static LADDER: ThresholdTable<&str> = ThresholdTable::new("ladder", LADDER_BANDS, "high");

    #[test]
    fn below_bound_excludes_limit() {
        assert_eq!(*LADDER.classify(9.999), "low");
        assert_eq!(*LADDER.classify(10.0), "mid");
    }

    #[test]
    fn at_most_bound_includes_limit() {
        assert_eq!(*LADDER.classify(20.0), "mid");
        assert_eq!(*LADDER.classify(20.001), "high");
    }

    #[test]
    fn values_below_first_band_take_first_outcome() {
        assert_eq!(*LADDER.classify(-1_000.0), "low");
    }

    #[test]
    fn nan_falls_through_to_otherwise() {
        assert_eq!(*LADDER.classify(f64::NAN), "high");
    }

    #[test]
    fn well_formed_table_passes_check() {
        assert_eq!(LADDER.check(), Ok(()));
    }

    #[test]
    fn check_rejects_repeated_limit() {
        const BANDS: &[(Bound, u8)] = &[(Bound::Below(5.0), 0), (Bound::AtMost(5.0), 1)];
        let table = ThresholdTable::new("repeated", BANDS, 2);
        assert_eq!(
            table.check(),
            Err(TableError::NotMonotonic {
                table: "repeated",
                index: 1
            })
        );
    }

    #[test]
    fn check_rejects_descending_limits() {
        const BANDS: &[(Bound, u8)] = &[(Bound::Below(5.0), 0), (Bound::Below(3.0), 1)];
        let table = ThresholdTable::new("descending", BANDS, 2);
        assert!(matches!(
            table.check(),
            Err(TableError::NotMonotonic { index: 1, .. })
        ));
    }

    #[test]
    fn check_rejects_nan_limit() {
        const BANDS: &[(Bound, u8)] = &[(Bound::Below(f64::NAN), 0)];
        let table = ThresholdTable::new("nan", BANDS, 1);
        assert!(matches!(
            table.check(),
            Err(TableError::NonFiniteBound { index: 0, .. })
        ));
    }
}
