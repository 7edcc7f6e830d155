use notenspiegel_core::config::SourceConfig;
use notenspiegel_core::error::NotenspiegelError;
use notenspiegel_core::extraction::pdftotext::PdftotextExtractor;
use notenspiegel_core::fetch::HttpFetcher;
use notenspiegel_core::pipeline::{load_cohorts, load_cohorts_parallel, split_locations};
use tracing::info;

use crate::output;

pub fn run(
    config: &SourceConfig,
    input: &str,
    parallel: bool,
    output_format: &str,
) -> Result<(), NotenspiegelError> {
    let locations: Vec<String> = split_locations(input, &config.separator)?
        .into_iter()
        .map(|l| l.trim().to_string())
        .collect();

    let extractor = PdftotextExtractor::from_config(config);
    if !extractor.is_available() {
        return Err(NotenspiegelError::PdftotextNotFound);
    }

    info!(locations = locations.len(), parallel, "loading cohorts");
    let fetcher = HttpFetcher::new(config)?;
    let cohorts = if parallel {
        load_cohorts_parallel(&locations, config, &fetcher, &extractor)?
    } else {
        load_cohorts(&locations, config, &fetcher, &extractor)?
    };

    match output_format {
        "json" => output::json::print(&cohorts)?,
        _ => output::table::print_cohorts(&cohorts),
    }

    Ok(())
}
