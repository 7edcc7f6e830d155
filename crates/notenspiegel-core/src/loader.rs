use crate::config::SourceConfig;
use crate::error::NotenspiegelError;
use crate::extraction::select::TableSelector;
use crate::extraction::table::extract_tables;
use crate::extraction::PdfExtractor;
use crate::fetch::Fetcher;
use crate::model::{CohortId, GradeTable, LoadedCohort};
use crate::parsing::{derive_cohort_id, normalize_table};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

/// Allowed gap between the last `Kumuliert` value and 100.
const CUMULATIVE_TOLERANCE: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// Loads one grade table from one document location.
///
/// The cohort identifier is derived on construction; the table becomes
/// available once `load_data` has succeeded.
pub struct TableLoader {
    location: String,
    cohort: Option<CohortId>,
    leading_columns: usize,
    expected_columns: Vec<String>,
    selector: Box<dyn TableSelector>,
    table: Option<GradeTable>,
}

impl TableLoader {
    pub fn new(location: &str, config: &SourceConfig) -> Result<Self, NotenspiegelError> {
        let location = location.trim().to_string();
        let cohort = derive_cohort_id(&location, &config.marker, &config.suffix)?;
        debug!(%location, %cohort, "cohort derived");

        Ok(TableLoader {
            location,
            cohort: Some(cohort),
            leading_columns: config.leading_columns_to_drop,
            expected_columns: config.expected_columns.clone(),
            selector: config
                .table_selection
                .build(&config.expected_columns, config.leading_columns_to_drop),
            table: None,
        })
    }

    /// Replace the table selection strategy.
    pub fn with_selector(mut self, selector: Box<dyn TableSelector>) -> Self {
        self.selector = selector;
        self
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Fetch the document and extract its grade table.
    pub fn load_data(
        &mut self,
        fetcher: &dyn Fetcher,
        extractor: &dyn PdfExtractor,
    ) -> Result<(), NotenspiegelError> {
        let pdf_bytes = fetcher.fetch(&self.location)?;
        self.load_bytes(&pdf_bytes, extractor)
    }

    /// Extract the grade table from already fetched PDF bytes.
    pub fn load_bytes(
        &mut self,
        pdf_bytes: &[u8],
        extractor: &dyn PdfExtractor,
    ) -> Result<(), NotenspiegelError> {
        let pages = extractor.extract_pages(pdf_bytes)?;
        let tables = extract_tables(&pages, &self.expected_columns);
        debug!(
            backend = extractor.backend_name(),
            pages = pages.len(),
            tables = tables.len(),
            "extraction finished"
        );

        let raw = self
            .selector
            .select(&tables)
            .ok_or_else(|| NotenspiegelError::NoTable(self.location.clone()))?;
        debug!(
            strategy = self.selector.strategy_name(),
            page = raw.page_number,
            columns = raw.column_count(),
            "table selected"
        );

        let table = normalize_table(raw, self.leading_columns)?;
        if !table.cumulative_is_consistent(CUMULATIVE_TOLERANCE) {
            warn!(
                location = %self.location,
                "cumulative percentages are not monotone or do not reach 100"
            );
        }

        info!(location = %self.location, rows = table.len(), "table loaded");
        self.table = Some(table);
        Ok(())
    }

    pub fn get_table(&self) -> Result<&GradeTable, NotenspiegelError> {
        self.table
            .as_ref()
            .ok_or_else(|| NotenspiegelError::State("call load_data() first".into()))
    }

    pub fn get_cohort_identifier(&self) -> Option<&CohortId> {
        self.cohort.as_ref()
    }

    /// Consume the loader, handing table and identifier to the caller.
    pub fn into_loaded(self) -> Result<LoadedCohort, NotenspiegelError> {
        let table = self
            .table
            .ok_or_else(|| NotenspiegelError::State("call load_data() first".into()))?;
        let cohort = self
            .cohort
            .ok_or_else(|| NotenspiegelError::State("cohort identifier missing".into()))?;
        Ok(LoadedCohort {
            cohort,
            location: self.location,
            table,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_is_trimmed() {
        let loader = TableLoader::new(
            "  https://www.sle.kit.edu/ECTS_Tab_WS23_24_BA_TEST_DE.pdf\n",
            &SourceConfig::default(),
        )
        .unwrap();
        assert_eq!(
            loader.location(),
            "https://www.sle.kit.edu/ECTS_Tab_WS23_24_BA_TEST_DE.pdf"
        );
        assert_eq!(
            loader.get_cohort_identifier().map(|c| c.as_str()),
            Some("WS23_24_BA_TEST_DE")
        );
    }

    #[test]
    fn test_construction_fails_without_marker() {
        let err = TableLoader::new("https://www.sle.kit.edu/a.pdf", &SourceConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, NotenspiegelError::Parse(_)));
    }

    #[test]
    fn test_table_before_load_is_state_error() {
        let loader = TableLoader::new("ECTS_Tab_WS23_24_BA_TEST_DE.pdf", &SourceConfig::default())
            .unwrap();
        assert!(matches!(
            loader.get_table().unwrap_err(),
            NotenspiegelError::State(_)
        ));
        assert!(matches!(
            loader.into_loaded().unwrap_err(),
            NotenspiegelError::State(_)
        ));
    }

    #[test]
    fn test_tolerance_constant() {
        assert_eq!(CUMULATIVE_TOLERANCE.to_string(), "0.5");
    }
}
