//! Clinical calculators.
//!
//! Each submodule is a pure function of its input: validate, look up, return. None of them
//! log at more than `debug` or touch the audit sink; that is the engine's job.

pub mod body;
pub mod cardiac_output;
pub mod cha2ds2_vasc;
pub mod framingham;
pub mod has_bled;
pub mod qtc;
pub mod vitals;

use crate::threshold::CheckTable;
use serde::{Deserialize, Serialize};

/// Sex used by sex-specific scoring tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

/// Every threshold table shipped with the calculators.
pub fn all_tables() -> Vec<&'static dyn CheckTable> {
    let mut tables = Vec::new();
    tables.extend(framingham::tables());
    tables.extend(cha2ds2_vasc::tables());
    tables.extend(has_bled::tables());
    tables.extend(qtc::tables());
    tables.extend(cardiac_output::tables());
    tables.extend(body::tables());
    tables.extend(vitals::tables());
    tables
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_shipped_table_is_strictly_monotonic() {
        for table in all_tables() {
            assert_eq!(table.check_table(), Ok(()), "{}", table.table_name());
        }
    }

    #[test]
    fn table_names_are_unique() {
        let tables = all_tables();
        let names: HashSet<_> = tables.iter().map(|t| t.table_name()).collect();
        assert_eq!(names.len(), tables.len());
    }

    #[test]
    fn gender_parses_lowercase_only() {
        let parsed: Gender = serde_json::from_str("\"female\"").expect("parse gender");
        assert_eq!(parsed, Gender::Female);
        assert!(serde_json::from_str::<Gender>("\"other\"").is_err());
    }
}
