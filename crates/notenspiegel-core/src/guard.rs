use crate::config::SourceConfig;
use tracing::debug;

/// Origin check run on every location before anything is fetched.
///
/// The match is a literal, case-sensitive prefix test against the configured
/// host. No scheme normalization: `www.sle.kit.edu/...` and
/// `//www.sle.kit.edu/...` are both rejected.
#[derive(Debug, Clone)]
pub struct Guard {
    host: String,
}

impl Guard {
    pub fn new(config: &SourceConfig) -> Self {
        Guard {
            host: config.host.clone(),
        }
    }

    pub fn check_input(&self, location: &str) -> bool {
        let trusted = !location.is_empty() && location.starts_with(&self.host);
        debug!(location, trusted, "guard check");
        trusted
    }
}
