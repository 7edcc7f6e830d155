use crate::config::SourceConfig;
use crate::error::NotenspiegelError;
use crate::extraction::PdfExtractor;
use crate::fetch::Fetcher;
use crate::guard::Guard;
use crate::loader::TableLoader;
use crate::model::LoadedCohort;
use tracing::{info, warn};

/// Split one line of user input into locations. Empty segments are kept.
///
/// `"URL1$URL2"` -> `["URL1", "URL2"]`, `"URL1$$URL2"` -> `["URL1", "", "URL2"]`.
pub fn split_locations(input: &str, separator: &str) -> Result<Vec<String>, NotenspiegelError> {
    if separator.is_empty() {
        return Err(NotenspiegelError::ConfigInvalid(
            "separator must not be empty".into(),
        ));
    }
    Ok(input.split(separator).map(|s| s.to_string()).collect())
}

/// Reject the whole batch if any location is off the trusted host.
fn guard_all(locations: &[String], config: &SourceConfig) -> Result<(), NotenspiegelError> {
    let guard = Guard::new(config);
    match locations.iter().find(|loc| !guard.check_input(loc)) {
        Some(rejected) => {
            warn!(location = %rejected, "untrusted location rejected");
            Err(NotenspiegelError::UntrustedLocation(rejected.clone()))
        }
        None => Ok(()),
    }
}

fn load_one(
    location: &str,
    config: &SourceConfig,
    fetcher: &dyn Fetcher,
    extractor: &dyn PdfExtractor,
) -> Result<LoadedCohort, NotenspiegelError> {
    let mut loader = TableLoader::new(location, config)?;
    loader.load_data(fetcher, extractor)?;
    loader.into_loaded()
}

/// Load several cohorts one after another.
///
/// All locations pass the guard before the first fetch. Consecutive fetches
/// are spaced by `politeness_delay_ms`. The first failure is returned.
pub fn load_cohorts(
    locations: &[String],
    config: &SourceConfig,
    fetcher: &dyn Fetcher,
    extractor: &dyn PdfExtractor,
) -> Result<Vec<LoadedCohort>, NotenspiegelError> {
    guard_all(locations, config)?;

    let mut cohorts = Vec::with_capacity(locations.len());
    for (i, location) in locations.iter().enumerate() {
        if i > 0 {
            std::thread::sleep(config.politeness_delay());
        }
        cohorts.push(load_one(location, config, fetcher, extractor)?);
    }

    info!(cohorts = cohorts.len(), "all cohorts loaded");
    Ok(cohorts)
}

/// Load several cohorts with at most `max_workers` concurrent fetches.
///
/// Same contract as [`load_cohorts`]; results keep input order. Batches of
/// `max_workers` are separated by the politeness delay.
pub fn load_cohorts_parallel(
    locations: &[String],
    config: &SourceConfig,
    fetcher: &dyn Fetcher,
    extractor: &dyn PdfExtractor,
) -> Result<Vec<LoadedCohort>, NotenspiegelError> {
    guard_all(locations, config)?;

    let mut cohorts = Vec::with_capacity(locations.len());
    for (i, batch) in locations.chunks(config.max_workers.max(1)).enumerate() {
        if i > 0 {
            std::thread::sleep(config.politeness_delay());
        }

        let results: Vec<Result<LoadedCohort, NotenspiegelError>> = std::thread::scope(|s| {
            let handles: Vec<_> = batch
                .iter()
                .map(|location| s.spawn(move || load_one(location, config, fetcher, extractor)))
                .collect();
            handles
                .into_iter()
                .map(|h| {
                    h.join().unwrap_or_else(|_| {
                        Err(NotenspiegelError::Extraction("worker thread panicked".into()))
                    })
                })
                .collect()
        });

        for result in results {
            cohorts.push(result?);
        }
    }

    info!(cohorts = cohorts.len(), "all cohorts loaded");
    Ok(cohorts)
}
