use notenspiegel_core::error::NotenspiegelError;
use serde::Serialize;

pub fn print<T: Serialize + ?Sized>(value: &T) -> Result<(), NotenspiegelError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
