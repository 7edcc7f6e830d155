use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Cohort label derived from a document name, e.g. `WS23_24_MA_Informatik_DE`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CohortId(String);

impl CohortId {
    pub fn new(id: impl Into<String>) -> Self {
        CohortId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Leading semester code such as `WS23_`, if the identifier is long enough.
    pub fn semester_prefix(&self, len: usize) -> Option<&str> {
        match self.0.char_indices().nth(len) {
            Some((i, _)) => Some(&self.0[..i]),
            None if self.0.chars().count() == len => Some(&self.0),
            None => None,
        }
    }
}

impl fmt::Display for CohortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One grade step of a cohort's distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GradeRow {
    pub note: Decimal,
    pub anzahl: u32,
    pub prozent: Decimal,
    pub kumuliert: Decimal,
}

impl GradeRow {
    pub fn note_f64(&self) -> f64 {
        self.note.to_f64().unwrap_or_default()
    }
}

/// Normalized grade table, rows in ascending `Note` order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeTable {
    pub rows: Vec<GradeRow>,
}

impl GradeTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn total_count(&self) -> u64 {
        self.rows.iter().map(|r| u64::from(r.anzahl)).sum()
    }

    /// True if `Kumuliert` never decreases and ends within `tolerance` of 100.
    pub fn cumulative_is_consistent(&self, tolerance: Decimal) -> bool {
        let monotone = self
            .rows
            .windows(2)
            .all(|w| w[0].kumuliert <= w[1].kumuliert);
        let complete = self
            .rows
            .last()
            .map(|r| (r.kumuliert - Decimal::ONE_HUNDRED).abs() <= tolerance)
            .unwrap_or(false);
        monotone && complete
    }

    /// Count-weighted mean and population standard deviation of the grades.
    pub fn summary(&self) -> GradeSummary {
        let graduates = self.total_count();
        if graduates == 0 {
            return GradeSummary {
                graduates,
                mean: None,
                std_dev: None,
            };
        }

        let n = graduates as f64;
        let mean = self
            .rows
            .iter()
            .map(|r| r.note_f64() * f64::from(r.anzahl))
            .sum::<f64>()
            / n;
        let variance = self
            .rows
            .iter()
            .map(|r| f64::from(r.anzahl) * (r.note_f64() - mean).powi(2))
            .sum::<f64>()
            / n;

        GradeSummary {
            graduates,
            mean: Some(mean),
            std_dev: Some(variance.sqrt()),
        }
    }
}

/// Descriptive statistics shown next to every distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradeSummary {
    pub graduates: u64,
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
}

/// Display title -> absolute document location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog(pub BTreeMap<String, String>);

impl Catalog {
    pub fn get(&self, title: &str) -> Option<&str> {
        self.0.get(title).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// A loaded table together with the cohort it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadedCohort {
    pub cohort: CohortId,
    pub location: String,
    pub table: GradeTable,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn row(note: Decimal, anzahl: u32, prozent: Decimal, kumuliert: Decimal) -> GradeRow {
        GradeRow {
            note,
            anzahl,
            prozent,
            kumuliert,
        }
    }

    #[test]
    fn test_semester_prefix() {
        let id = CohortId::new("WS23_24_BA_TEST_DE");
        assert_eq!(id.semester_prefix(5), Some("WS23_"));
        assert_eq!(CohortId::new("SS22").semester_prefix(5), None);
        assert_eq!(CohortId::new("SS22_").semester_prefix(5), Some("SS22_"));
    }

    #[test]
    fn test_cumulative_consistency() {
        let table = GradeTable {
            rows: vec![
                row(dec!(1.0), 1, dec!(25), dec!(25)),
                row(dec!(2.0), 2, dec!(50), dec!(75)),
                row(dec!(3.0), 1, dec!(25), dec!(99.99)),
            ],
        };
        assert!(table.cumulative_is_consistent(dec!(0.1)));
        assert!(!table.cumulative_is_consistent(dec!(0.001)));
    }

    #[test]
    fn test_cumulative_decrease_detected() {
        let table = GradeTable {
            rows: vec![
                row(dec!(1.0), 1, dec!(60), dec!(60)),
                row(dec!(2.0), 1, dec!(40), dec!(50)),
            ],
        };
        assert!(!table.cumulative_is_consistent(dec!(100)));
    }

    #[test]
    fn test_empty_table_is_not_consistent() {
        assert!(!GradeTable::default().cumulative_is_consistent(dec!(1)));
    }

    #[test]
    fn test_summary_weighted() {
        let table = GradeTable {
            rows: vec![
                row(dec!(1.0), 1, dec!(25), dec!(25)),
                row(dec!(2.0), 2, dec!(50), dec!(75)),
                row(dec!(3.0), 1, dec!(25), dec!(100)),
            ],
        };
        let s = table.summary();
        assert_eq!(s.graduates, 4);
        assert!((s.mean.unwrap() - 2.0).abs() < 1e-9);
        assert!((s.std_dev.unwrap() - 0.5_f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_summary_empty() {
        let s = GradeTable::default().summary();
        assert_eq!(s.graduates, 0);
        assert!(s.mean.is_none());
        assert!(s.std_dev.is_none());
    }

    #[test]
    fn test_row_serializes_with_column_names() {
        let json = serde_json::to_value(row(dec!(1.0), 3, dec!(0.65), dec!(0.65))).unwrap();
        assert_eq!(json["Note"], "1.0");
        assert_eq!(json["Anzahl"], 3);
        assert_eq!(json["Kumuliert"], "0.65");
    }
}
