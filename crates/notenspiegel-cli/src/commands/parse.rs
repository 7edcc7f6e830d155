use notenspiegel_core::config::SourceConfig;
use notenspiegel_core::error::NotenspiegelError;
use notenspiegel_core::extraction::pdftotext::PdftotextExtractor;
use std::path::PathBuf;

use crate::output;

pub fn run(
    config: &SourceConfig,
    pdf_file: PathBuf,
    output_format: &str,
    output_file: Option<PathBuf>,
) -> Result<(), NotenspiegelError> {
    let extractor = PdftotextExtractor::from_config(config);
    let cohort = notenspiegel_core::parse_file(&pdf_file, &extractor, config)?;

    match output_file {
        Some(path) => {
            // Always write JSON when saving to file
            let json = serde_json::to_string_pretty(&cohort)?;
            std::fs::write(&path, json)?;
            eprintln!(
                "Parsed {} ({} grade steps), written to {}",
                cohort.cohort,
                cohort.table.len(),
                path.display()
            );
        }
        None => match output_format {
            "json" => output::json::print(&cohort)?,
            _ => output::table::print_cohorts(std::slice::from_ref(&cohort)),
        },
    }

    Ok(())
}
