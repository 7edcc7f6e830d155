use crate::config::SourceConfig;
use crate::error::NotenspiegelError;
use crate::fetch::Fetcher;
use crate::model::Catalog;
use crate::parsing::derive_cohort_id;
use scraper::{Html, Selector};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{debug, info};

/// Discovers published grade tables from the index page.
///
/// Results are cached per index URL for `catalog_cache_ttl_secs`; the page
/// changes a few times per semester at most.
pub struct CatalogScraper {
    config: SourceConfig,
    fetcher: Arc<dyn Fetcher>,
    cache: Mutex<HashMap<String, (Instant, Catalog)>>,
}

impl CatalogScraper {
    pub fn new(config: SourceConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        CatalogScraper {
            config,
            fetcher,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Catalog for `index_url`, served from cache while fresh.
    pub fn scrape_catalog(&self, index_url: &str) -> Result<Catalog, NotenspiegelError> {
        let ttl = self.config.catalog_cache_ttl();
        {
            let cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
            if let Some((fetched_at, catalog)) = cache.get(index_url) {
                if fetched_at.elapsed() < ttl {
                    debug!(index_url, "catalog served from cache");
                    return Ok(catalog.clone());
                }
            }
        }
        self.refresh_catalog(index_url)
    }

    /// Fetch and parse `index_url`, bypassing and then updating the cache.
    pub fn refresh_catalog(&self, index_url: &str) -> Result<Catalog, NotenspiegelError> {
        info!(index_url, "scraping catalog");
        let html = self.fetcher.fetch_text(index_url)?;
        let catalog = parse_catalog(&html, &self.config)?;
        info!(entries = catalog.len(), "catalog scraped");

        self.cache
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(index_url.to_string(), (Instant::now(), catalog.clone()));
        Ok(catalog)
    }
}

/// Extract `display title -> absolute location` from index page markup.
///
/// Only elements carrying both `title` and `href` are considered, and of those
/// only titles starting with the configured prefix. Legacy semesters are
/// dropped by their five-character prefix (e.g. `SS22_`).
pub fn parse_catalog(html: &str, config: &SourceConfig) -> Result<Catalog, NotenspiegelError> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("[title][href]")
        .map_err(|e| NotenspiegelError::Extraction(format!("invalid selector: {:?}", e)))?;

    let mut catalog = Catalog::default();
    for element in document.select(&selector) {
        let (Some(title), Some(href)) = (element.value().attr("title"), element.value().attr("href"))
        else {
            continue;
        };

        if !title.starts_with(&config.title_prefix) {
            continue;
        }

        let cohort = derive_cohort_id(title, &config.marker, &config.suffix)?;
        let excluded = cohort
            .semester_prefix(config.semester_prefix_len)
            .is_some_and(|semester| config.is_excluded_semester(semester));
        if excluded {
            debug!(%cohort, "skipping legacy semester");
            continue;
        }

        let location = format!("{}{}", config.host, href);
        catalog.0.insert(cohort.to_string(), location);
    }

    Ok(catalog)
}
