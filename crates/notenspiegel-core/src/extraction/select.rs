use crate::extraction::table::RawTable;
use serde::{Deserialize, Serialize};

/// Picks the grade table out of everything found in a document.
pub trait TableSelector: Send + Sync {
    fn select<'a>(&self, tables: &'a [RawTable]) -> Option<&'a RawTable>;

    /// Name of this strategy (for diagnostics).
    fn strategy_name(&self) -> &str;
}

/// Take the first table found on any page.
///
/// Matches the one known source layout. A document with several tables
/// yields whichever comes first, even if it lacks the grade columns.
pub struct FirstTableStrategy;

impl TableSelector for FirstTableStrategy {
    fn select<'a>(&self, tables: &'a [RawTable]) -> Option<&'a RawTable> {
        tables.first()
    }

    fn strategy_name(&self) -> &str {
        "first-table"
    }
}

/// Take the first table whose header holds every expected column once the
/// leading label columns are dropped.
pub struct HeaderMatchStrategy {
    pub expected: Vec<String>,
    pub leading_columns: usize,
}

impl TableSelector for HeaderMatchStrategy {
    fn select<'a>(&self, tables: &'a [RawTable]) -> Option<&'a RawTable> {
        tables.iter().find(|t| {
            let header: Vec<&str> = t
                .header
                .iter()
                .skip(self.leading_columns)
                .map(|h| h.trim())
                .collect();
            self.expected.iter().all(|col| header.contains(&col.as_str()))
        })
    }

    fn strategy_name(&self) -> &str {
        "header-match"
    }
}

/// Strategy choice as it appears in configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionStrategy {
    #[default]
    FirstTable,
    HeaderMatch,
}

impl SelectionStrategy {
    pub fn build(self, expected: &[String], leading_columns: usize) -> Box<dyn TableSelector> {
        match self {
            SelectionStrategy::FirstTable => Box::new(FirstTableStrategy),
            SelectionStrategy::HeaderMatch => Box::new(HeaderMatchStrategy {
                expected: expected.to_vec(),
                leading_columns,
            }),
        }
    }
}
