use notenspiegel_core::catalog::CatalogScraper;
use notenspiegel_core::config::SourceConfig;
use notenspiegel_core::error::NotenspiegelError;
use notenspiegel_core::fetch::HttpFetcher;
use std::sync::Arc;

use crate::output;

pub fn run(
    config: &SourceConfig,
    index_url: Option<&str>,
    output_format: &str,
) -> Result<(), NotenspiegelError> {
    let fetcher = Arc::new(HttpFetcher::new(config)?);
    let scraper = CatalogScraper::new(config.clone(), fetcher);
    let catalog = scraper.scrape_catalog(index_url.unwrap_or(&config.index_url))?;

    match output_format {
        "json" => output::json::print(&catalog)?,
        _ => output::table::print_catalog(&catalog),
    }

    Ok(())
}
