use crate::config::SourceConfig;
use crate::error::NotenspiegelError;
use crate::extraction::{PageContent, PdfExtractor};
use std::io::Write;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Text extraction through poppler's `pdftotext`.
///
/// Runs `pdftotext -layout -enc UTF-8` so the grade table keeps its column
/// alignment and umlauts in titles survive.
pub struct PdftotextExtractor {
    program: String,
}

impl PdftotextExtractor {
    pub fn new() -> Self {
        Self::with_program("pdftotext")
    }

    /// Use a specific binary, e.g. `/opt/poppler/bin/pdftotext`.
    pub fn with_program(program: impl Into<String>) -> Self {
        PdftotextExtractor {
            program: program.into(),
        }
    }

    pub fn from_config(config: &SourceConfig) -> Self {
        Self::with_program(config.pdftotext_program.as_str())
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// True if the binary can be started (`-v` prints its version to stderr).
    pub fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("-v")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }

    fn command(&self, input: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(["-layout", "-enc", "UTF-8", "-q"])
            .arg(input)
            .arg("-");
        cmd
    }
}

impl Default for PdftotextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfExtractor for PdftotextExtractor {
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageContent>, NotenspiegelError> {
        let mut input = tempfile::Builder::new()
            .prefix("notenspiegel-")
            .suffix(".pdf")
            .tempfile()
            .map_err(|e| NotenspiegelError::Extraction(format!("temp file: {}", e)))?;
        input
            .write_all(pdf_bytes)
            .and_then(|_| input.flush())
            .map_err(|e| NotenspiegelError::Extraction(format!("temp file: {}", e)))?;

        let output = self.command(input.path()).output().map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => NotenspiegelError::PdftotextNotFound,
            _ => NotenspiegelError::Extraction(format!("{} did not start: {}", self.program, e)),
        })?;

        if !output.status.success() {
            return Err(NotenspiegelError::PdftotextFailed {
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let text = String::from_utf8(output.stdout)
            .map_err(|e| NotenspiegelError::Extraction(format!("output is not UTF-8: {}", e)))?;
        let pages = split_pages(&text);
        debug!(
            program = %self.program,
            pages = pages.len(),
            bytes = pdf_bytes.len(),
            "text extracted"
        );
        Ok(pages)
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}

/// One `PageContent` per form-feed separated page. A trailing empty page
/// after the last form feed is dropped; the first page is always kept.
fn split_pages(text: &str) -> Vec<PageContent> {
    text.split('\x0c')
        .enumerate()
        .map(|(i, page)| PageContent {
            page_number: i + 1,
            lines: page.lines().map(str::to_string).collect(),
        })
        .filter(|p| p.page_number == 1 || !p.lines.is_empty())
        .collect()
}
