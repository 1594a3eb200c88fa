use anyhow::Result;
use serde::Serialize;

pub mod departments;
pub mod employees;
pub mod products;

/// Prints an entity as pretty JSON
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
