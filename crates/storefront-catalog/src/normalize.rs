//! Response-shape normalization at the fetch boundary.
//!
//! List endpoints answer in one of two shapes depending on whether the
//! backend view has pagination enabled:
//!
//! - paginated envelope: `{"count": 2, "next": null, "previous": null, "results": [...]}`
//! - bare list: `[...]`
//!
//! Callers never see the difference; both become a `Vec<T>`.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::CatalogError;

/// Parses a list response body into items, accepting either shape.
///
/// # Errors
///
/// - [`CatalogError::Deserialize`] if the body is not JSON or an item does
///   not match `T`.
/// - [`CatalogError::UnexpectedShape`] if the body is JSON but neither a list
///   nor an object with a `results` list.
pub fn normalize_list<T: DeserializeOwned>(
    body: &str,
    context: &str,
) -> Result<Vec<T>, CatalogError> {
    let value: Value = serde_json::from_str(body).map_err(|e| CatalogError::Deserialize {
        context: context.to_owned(),
        source: e,
    })?;

    let items = match value {
        Value::Array(items) => Value::Array(items),
        Value::Object(mut envelope) => match envelope.remove("results") {
            Some(results @ Value::Array(_)) => results,
            Some(Value::Null) => Value::Array(Vec::new()),
            Some(_) => {
                return Err(CatalogError::UnexpectedShape {
                    context: context.to_owned(),
                    reason: "`results` is not a list".to_owned(),
                })
            }
            None => {
                return Err(CatalogError::UnexpectedShape {
                    context: context.to_owned(),
                    reason: "object has no `results` field".to_owned(),
                })
            }
        },
        other => {
            return Err(CatalogError::UnexpectedShape {
                context: context.to_owned(),
                reason: format!("expected a list or paginated object, got {}", json_kind(&other)),
            })
        }
    };

    serde_json::from_value(items).map_err(|e| CatalogError::Deserialize {
        context: context.to_owned(),
        source: e,
    })
}

/// Parses a single-object detail response.
///
/// # Errors
///
/// Returns [`CatalogError::Deserialize`] if the body does not match `T`.
pub fn normalize_detail<T: DeserializeOwned>(body: &str, context: &str) -> Result<T, CatalogError> {
    serde_json::from_str(body).map_err(|e| CatalogError::Deserialize {
        context: context.to_owned(),
        source: e,
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
