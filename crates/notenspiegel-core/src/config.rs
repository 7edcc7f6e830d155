use crate::error::NotenspiegelError;
use crate::extraction::select::SelectionStrategy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Everything the core needs to know about the upstream publisher.
///
/// Passed by reference into `Guard`, `CatalogScraper` and `TableLoader`.
/// Fields missing from a JSON config file fall back to the KIT defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Trusted origin. Every document location must start with this literally.
    pub host: String,
    /// Page listing all published grade tables.
    pub index_url: String,
    /// Token that precedes the cohort identifier in a document name.
    pub marker: String,
    /// File suffix that terminates the cohort identifier.
    pub suffix: String,
    /// Catalog titles not starting with this are unrelated links.
    pub title_prefix: String,
    pub semester_prefix_len: usize,
    /// Legacy semesters whose documents use the old layout without a cumulative column.
    pub excluded_semesters: Vec<String>,
    /// Token separating several locations in one line of user input.
    pub separator: String,
    /// Row-label columns preceding `Note` in the source table.
    pub leading_columns_to_drop: usize,
    pub expected_columns: Vec<String>,
    /// How the grade table is picked when a document holds several tables.
    pub table_selection: SelectionStrategy,
    pub request_timeout_secs: u64,
    pub politeness_delay_ms: u64,
    pub max_workers: usize,
    pub catalog_cache_ttl_secs: u64,
    /// pdftotext binary, looked up on `PATH` unless a path is given.
    pub pdftotext_program: String,
}

pub const COL_NOTE: &str = "Note";
pub const COL_ANZAHL: &str = "Anzahl";
pub const COL_PROZENT: &str = "Prozent";
pub const COL_KUMULIERT: &str = "Kumuliert";

const LEGACY_SEMESTERS: &[&str] = &[
    "SS22_", "WS21_", "SS21_", "WS20_", "SS20_", "WS19_", "SS19_", "WS18_", "SS18_", "WS17_",
    "SS17_", "WS16_", "SS16_", "WS15_", "SS15_", "WS14_", "SS14_", "WS13_", "SS13_",
];

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig {
            host: "https://www.sle.kit.edu".into(),
            index_url: "https://www.sle.kit.edu/nachstudium/ects-einstufungstabellen.php".into(),
            marker: "ECTS_Tab_".into(),
            suffix: ".pdf".into(),
            title_prefix: "ECTS".into(),
            semester_prefix_len: 5,
            excluded_semesters: LEGACY_SEMESTERS.iter().map(|s| s.to_string()).collect(),
            separator: "$".into(),
            leading_columns_to_drop: 1,
            expected_columns: [COL_NOTE, COL_ANZAHL, COL_PROZENT, COL_KUMULIERT]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            table_selection: SelectionStrategy::FirstTable,
            request_timeout_secs: 30,
            politeness_delay_ms: 1000,
            max_workers: 4,
            catalog_cache_ttl_secs: 600,
            pdftotext_program: "pdftotext".into(),
        }
    }
}

impl SourceConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn politeness_delay(&self) -> Duration {
        Duration::from_millis(self.politeness_delay_ms)
    }

    pub fn catalog_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.catalog_cache_ttl_secs)
    }

    pub fn is_excluded_semester(&self, semester: &str) -> bool {
        self.excluded_semesters.iter().any(|s| s == semester)
    }
}

/// Load a config from a JSON file.
pub fn load_config(path: &Path) -> Result<SourceConfig, NotenspiegelError> {
    let content = std::fs::read_to_string(path).map_err(|e| NotenspiegelError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let config: SourceConfig =
        serde_json::from_str(&content).map_err(|e| NotenspiegelError::ConfigLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_config(&config)?;
    Ok(config)
}

/// Parse a config from a JSON string (no file path context).
pub fn parse_config_str(json: &str) -> Result<SourceConfig, NotenspiegelError> {
    let config: SourceConfig = serde_json::from_str(json)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn validate_config(config: &SourceConfig) -> Result<(), NotenspiegelError> {
    if config.host.is_empty() {
        return Err(NotenspiegelError::ConfigInvalid(
            "host must not be empty".into(),
        ));
    }
    if config.marker.is_empty() {
        return Err(NotenspiegelError::ConfigInvalid(
            "marker must not be empty".into(),
        ));
    }
    if config.separator.is_empty() {
        return Err(NotenspiegelError::ConfigInvalid(
            "separator must not be empty".into(),
        ));
    }
    if config.pdftotext_program.trim().is_empty() {
        return Err(NotenspiegelError::ConfigInvalid(
            "pdftotext_program must not be empty".into(),
        ));
    }
    if config.max_workers == 0 {
        return Err(NotenspiegelError::ConfigInvalid(
            "max_workers must be at least 1".into(),
        ));
    }
    for col in [COL_NOTE, COL_ANZAHL, COL_PROZENT, COL_KUMULIERT] {
        if !config.expected_columns.iter().any(|c| c == col) {
            return Err(NotenspiegelError::ConfigInvalid(format!(
                "expected_columns must contain '{}'",
                col
            )));
        }
    }
    Ok(())
}
