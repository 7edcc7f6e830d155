use notenspiegel_core::config::SourceConfig;
use notenspiegel_core::error::NotenspiegelError;
use notenspiegel_core::guard::Guard;

pub fn run(config: &SourceConfig, location: &str) -> Result<(), NotenspiegelError> {
    if !Guard::new(config).check_input(location) {
        return Err(NotenspiegelError::UntrustedLocation(location.to_string()));
    }
    println!("trusted: {location}");
    Ok(())
}
