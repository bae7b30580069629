//! Clinical status levels and the classification outcome shared by threshold tables.

use serde::Serialize;
use std::fmt;

/// Severity of a finding.
///
/// Variants are declared in ascending severity so the derived `Ord` gives the precedence used
/// when combining assessments: `Normal < Borderline < Abnormal < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Normal,
    Borderline,
    Abnormal,
    Critical,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Normal => "normal",
            Status::Borderline => "borderline",
            Status::Abnormal => "abnormal",
            Status::Critical => "critical",
        }
    }

    /// Most severe status in `statuses`, or `Normal` when empty.
    pub fn worst<I>(statuses: I) -> Status
    where
        I: IntoIterator<Item = Status>,
    {
        statuses.into_iter().max().unwrap_or(Status::Normal)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category, status and recommendation produced by one table lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub category: &'static str,
    pub status: Status,
    pub recommendation: &'static str,
}

impl Classification {
    pub const fn new(category: &'static str, status: Status, recommendation: &'static str) -> Self {
        Self {
            category,
            status,
            recommendation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_order_is_total_and_ascending() {
        assert!(Status::Normal < Status::Borderline);
        assert!(Status::Borderline < Status::Abnormal);
        assert!(Status::Abnormal < Status::Critical);
    }

    #[test]
    fn worst_picks_most_severe() {
        let statuses = [Status::Borderline, Status::Critical, Status::Normal];
        assert_eq!(Status::worst(statuses), Status::Critical);
        assert_eq!(Status::worst([]), Status::Normal);
    }

    #[test]
    fn serialises_lowercase() {
        let json = serde_json::to_string(&Status::Borderline).expect("serialise");
        assert_eq!(json, "\"borderline\"");
    }
}
