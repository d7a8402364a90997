pub mod add_source;
pub mod delete_source;
pub mod fetch;
pub mod get_source;
pub mod list;
pub mod run;
pub mod set_priority;

use anyhow::{anyhow, Result};
use uuid::Uuid;

/// Parse a source id argument
fn parse_id(id: &str) -> Result<Uuid> {
    Uuid::parse_str(id).map_err(|_| anyhow!("'{}' is not a valid source id", id))
}
