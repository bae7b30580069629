//! Integer point accumulation for additive risk scores.

use serde::Serialize;

/// One factor's contribution to a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Contribution {
    pub factor: &'static str,
    pub points: i32,
}

/// Sums integer points from independent risk factors and remembers where they came from.
///
/// Points are `i32` so fractional weights cannot be expressed; negative points are allowed
/// because some tables (Framingham HDL) subtract for protective factors.
#[derive(Debug, Clone, Default)]
pub struct ScoreAccumulator {
    total: i32,
    contributions: Vec<Contribution>,
}

impl ScoreAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `points` for `factor`. Zero-point factors are recorded too, so the breakdown
    /// lists every factor that was considered.
    pub fn add(&mut self, factor: &'static str, points: i32) -> &mut Self {
        self.total += points;
        self.contributions.push(Contribution { factor, points });
        self
    }

    /// Adds `points` when `present` holds, otherwise records the factor with zero points.
    pub fn add_if(&mut self, present: bool, factor: &'static str, points: i32) -> &mut Self {
        self.add(factor, if present { points } else { 0 })
    }

    pub fn total(&self) -> i32 {
        self.total
    }

    pub fn contributions(&self) -> &[Contribution] {
        &self.contributions
    }

    /// Points recorded for `factor`, summed if the factor was added more than once.
    pub fn points_for(&self, factor: &str) -> i32 {
        self.contributions
            .iter()
            .filter(|c| c.factor == factor)
            .map(|c| c.points)
            .sum()
    }
}
