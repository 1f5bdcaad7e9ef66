//! JSON output for command results

use crate::outcome::Outcome;
use serde::Serialize;

/// Print an outcome as a pretty `{data, error}` envelope on stdout
///
/// Returns an error only when no data could be produced.
pub fn print_outcome<T: Serialize>(outcome: Outcome<T>) -> anyhow::Result<()> {
    let failed = outcome.value().is_none();
    let envelope = outcome.into_envelope();
    println!("{}", serde_json::to_string_pretty(&envelope)?);

    if failed {
        anyhow::bail!(envelope.error.unwrap_or_else(|| "no data".to_string()));
    }
    Ok(())
}
