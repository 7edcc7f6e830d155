use std::fmt;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum NotenspiegelError {
    #[error("failed to fetch {url}: {reason}")]
    Network { url: String, reason: String },

    #[error("failed to parse location: {0}")]
    Parse(String),

    #[error("unrecognized table layout: {0}. Only the newer documents with a 'Kumuliert' column are supported.")]
    Schema(String),

    #[error("{0}")]
    State(String),

    #[error("no table found in {0}")]
    NoTable(String),

    #[error("location '{0}' is not on the trusted host")]
    UntrustedLocation(String),

    #[error("PDF extraction failed: {0}")]
    Extraction(String),

    #[error("pdftotext not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftotextNotFound,

    #[error("pdftotext failed with exit code {code}: {stderr}")]
    PdftotextFailed { code: i32, stderr: String },

    #[error("failed to load config from {path}: {reason}")]
    ConfigLoad { path: PathBuf, reason: String },

    #[error("invalid config: {0}")]
    ConfigInvalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coarse error category, stable enough for callers to map onto messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Parse,
    Schema,
    State,
    NoTable,
    Untrusted,
    Extraction,
    Config,
    Io,
}

impl NotenspiegelError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            NotenspiegelError::Network { .. } => ErrorKind::Network,
            NotenspiegelError::Parse(_) => ErrorKind::Parse,
            NotenspiegelError::Schema(_) => ErrorKind::Schema,
            NotenspiegelError::State(_) => ErrorKind::State,
            NotenspiegelError::NoTable(_) => ErrorKind::NoTable,
            NotenspiegelError::UntrustedLocation(_) => ErrorKind::Untrusted,
            NotenspiegelError::Extraction(_)
            | NotenspiegelError::PdftotextNotFound
            | NotenspiegelError::PdftotextFailed { .. } => ErrorKind::Extraction,
            NotenspiegelError::ConfigLoad { .. } | NotenspiegelError::ConfigInvalid(_) => {
                ErrorKind::Config
            }
            NotenspiegelError::Io(_) | NotenspiegelError::Json(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn network(url: &str, reason: impl fmt::Display) -> Self {
        NotenspiegelError::Network {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_are_distinguishable() {
        assert_eq!(
            NotenspiegelError::network("https://x", "timeout").kind(),
            ErrorKind::Network
        );
        assert_eq!(NotenspiegelError::Parse("x".into()).kind(), ErrorKind::Parse);
        assert_eq!(NotenspiegelError::Schema("x".into()).kind(), ErrorKind::Schema);
        assert_eq!(NotenspiegelError::State("x".into()).kind(), ErrorKind::State);
        assert_eq!(NotenspiegelError::NoTable("x".into()).kind(), ErrorKind::NoTable);
        assert_eq!(
            NotenspiegelError::PdftotextNotFound.kind(),
            ErrorKind::Extraction
        );
    }

    #[test]
    fn test_network_message_names_url() {
        let err = NotenspiegelError::network("https://www.sle.kit.edu/a.pdf", "HTTP 404");
        assert_eq!(
            err.to_string(),
            "failed to fetch https://www.sle.kit.edu/a.pdf: HTTP 404"
        );
    }
}
