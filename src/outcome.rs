//! Degrade-not-fail results
//!
//! Every aggregation stage hands back an [`Outcome`]: a clean value, a value
//! produced from partially degraded inputs together with an advisory error,
//! or a failure with no usable data. The HTTP-facing shape is [`Envelope`].

use serde::Serialize;

/// Separator used when merging error strings from independent branches
pub const ERROR_SEPARATOR: &str = " | ";

/// Result of a stage that prefers partial data over no data
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// All inputs were healthy
    Ok(T),
    /// Value is usable but some inputs failed
    Degraded { value: T, error: String },
    /// Nothing usable could be produced
    Failed(String),
}

impl<T> Outcome<T> {
    /// Build an outcome from a value and any collected branch errors
    pub fn from_parts(value: T, errors: &[String]) -> Self {
        match merge_errors(errors) {
            Some(error) => Outcome::Degraded { value, error },
            None => Outcome::Ok(value),
        }
    }

    /// Borrow the value if one exists
    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Ok(value) | Outcome::Degraded { value, .. } => Some(value),
            Outcome::Failed(_) => None,
        }
    }

    /// Advisory or fatal error message
    pub fn error(&self) -> Option<&str> {
        match self {
            Outcome::Ok(_) => None,
            Outcome::Degraded { error, .. } | Outcome::Failed(error) => Some(error),
        }
    }

    /// Usable value produced alongside an advisory error
    pub fn is_degraded(&self) -> bool {
        matches!(self, Outcome::Degraded { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    /// Map the carried value, keeping the error untouched
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Ok(value) => Outcome::Ok(f(value)),
            Outcome::Degraded { value, error } => Outcome::Degraded {
                value: f(value),
                error,
            },
            Outcome::Failed(error) => Outcome::Failed(error),
        }
    }

    /// Split into the `{data, error}` pair exposed to callers
    pub fn into_envelope(self) -> Envelope<T> {
        match self {
            Outcome::Ok(value) => Envelope {
                data: Some(value),
                error: None,
            },
            Outcome::Degraded { value, error } => Envelope {
                data: Some(value),
                error: Some(error),
            },
            Outcome::Failed(error) => Envelope {
                data: None,
                error: Some(error),
            },
        }
    }
}

/// JSON-facing `{data, error}` pair
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
    pub error: Option<String>,
}

/// Join non-empty error strings with [`ERROR_SEPARATOR`]
pub fn merge_errors<S: AsRef<str>>(errors: &[S]) -> Option<String> {
    let parts: Vec<&str> = errors
        .iter()
        .map(|e| e.as_ref())
        .filter(|e| !e.is_empty())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(ERROR_SEPARATOR))
    }
}

/// Collect successes and failures of a joined fan-out separately
pub fn partition_results<T, E>(results: Vec<Result<T, E>>) -> (Vec<T>, Vec<E>) {
    let mut ok = Vec::with_capacity(results.len());
    let mut failed = Vec::new();
    for result in results {
        match result {
            Ok(v) => ok.push(v),
            Err(e) => failed.push(e),
        }
    }
    (ok, failed)
}
