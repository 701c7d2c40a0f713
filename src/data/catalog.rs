//! Fixed catalog of scenarios, periods, and climate indices.
//!
//! Every code that reaches a data source is first matched against these
//! lists; callers get the catalog's own `&'static str` back.

use crate::error::DataError;

/// Emission scenarios.
pub const SCENARIOS: [&str; 4] = ["ssp126", "ssp245", "ssp370", "ssp585"];

/// Projection periods.
pub const PERIODS: [&str; 3] = [
    "near-term_2021-2040",
    "mid-term_2041-2060",
    "long-term_2081-2100",
];

/// All climate index codes.
pub const INDEX_CODES: [&str; 27] = [
    "HD35", "HD30", "TX90p", "TN90p", "TX10p", "TN10p", "TXx", "TNx", "TXn", "TNn", "SU",
    "TR", "FD", "ID", "WSDI", "CSDI", "DTR", "CDD", "CWD", "R10mm", "R20mm", "R95p", "R99p",
    "Rx1day", "Rx5day", "PRCPTOT", "SDII",
];

/// Indices warmed first, in this order.
pub const PRIORITY_INDICES: [&str; 5] = ["HD35", "TX90p", "CDD", "R95p", "Rx1day"];

pub const DEFAULT_SCENARIO: &str = "ssp245";
pub const DEFAULT_PERIOD: &str = "near-term_2021-2040";

pub fn validate_scenario(scenario: &str) -> Result<&'static str, DataError> {
    SCENARIOS
        .iter()
        .copied()
        .find(|s| *s == scenario)
        .ok_or_else(|| DataError::UnknownScenario(scenario.to_string()))
}

pub fn validate_period(period: &str) -> Result<&'static str, DataError> {
    PERIODS
        .iter()
        .copied()
        .find(|p| *p == period)
        .ok_or_else(|| DataError::UnknownPeriod(period.to_string()))
}

pub fn validate_index_code(code: &str) -> Result<&'static str, DataError> {
    INDEX_CODES
        .iter()
        .copied()
        .find(|c| *c == code)
        .ok_or_else(|| DataError::UnknownIndex(code.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_sizes() {
        assert_eq!(INDEX_CODES.iter().collect::<HashSet<_>>().len(), 27);
        assert_eq!(SCENARIOS.len(), 4);
        assert_eq!(PERIODS.len(), 3);
    }

    #[test]
    fn priority_indices_are_known() {
        for code in PRIORITY_INDICES {
            assert!(validate_index_code(code).is_ok());
        }
    }

    #[test]
    fn defaults_are_known() {
        assert_eq!(validate_scenario(DEFAULT_SCENARIO).unwrap(), "ssp245");
        assert_eq!(validate_period(DEFAULT_PERIOD).unwrap(), "near-term_2021-2040");
    }

    #[test]
    fn rejects_unknown_codes() {
        assert!(matches!(
            validate_index_code("HD35; DROP TABLE climate"),
            Err(DataError::UnknownIndex(_))
        ));
        assert!(matches!(validate_index_code("hd35"), Err(DataError::UnknownIndex(_))));
        assert!(matches!(validate_scenario("ssp999"), Err(DataError::UnknownScenario(_))));
        assert!(matches!(validate_period("far-future"), Err(DataError::UnknownPeriod(_))));
    }
}
