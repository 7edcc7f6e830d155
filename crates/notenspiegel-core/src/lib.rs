pub mod catalog;
pub mod config;
pub mod error;
pub mod extraction;
pub mod fetch;
pub mod guard;
pub mod loader;
pub mod model;
pub mod parsing;
pub mod pipeline;

use config::SourceConfig;
use error::NotenspiegelError;
use extraction::PdfExtractor;
use fetch::FileFetcher;
use loader::TableLoader;
use model::LoadedCohort;
use std::path::Path;

/// Offline entry point: extract the grade table from a local PDF.
///
/// The cohort identifier is derived from the file name. No guard check and
/// no network access.
pub fn parse_file(
    path: &Path,
    extractor: &dyn PdfExtractor,
    config: &SourceConfig,
) -> Result<LoadedCohort, NotenspiegelError> {
    let mut loader = TableLoader::new(&path.to_string_lossy(), config)?;
    loader.load_data(&FileFetcher, extractor)?;
    loader.into_loaded()
}
