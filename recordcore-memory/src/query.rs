//! A minimal selector executor.
//!
//! Understands the equality subset of the JSON selector language: every
//! top-level `"field": value` pair must equal the same attribute of the
//! stored document. Operators (`$eq`, `$gt`, ...) are rejected rather than
//! silently mis-evaluated.

use serde_json::{Map, Value};
use thiserror::Error;

/// Why a query string could not be executed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// The query is not JSON.
    #[error("query is not valid JSON: {0}")]
    Json(String),

    /// The query has no `selector` object.
    #[error("query has no 'selector' object")]
    MissingSelector,

    /// The selector uses an operator this executor does not implement.
    #[error("unsupported selector operator '{0}'")]
    UnsupportedOperator(String),
}

/// A parsed equality selector.
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    criteria: Map<String, Value>,
}

impl Selector {
    /// Parses `{"selector": {...}}`.
    pub fn parse(query: &str) -> Result<Self, SelectorError> {
        let document: Value =
            serde_json::from_str(query).map_err(|error| SelectorError::Json(error.to_string()))?;

        let criteria = match document.get("selector") {
            Some(Value::Object(criteria)) => criteria.clone(),
            _ => return Err(SelectorError::MissingSelector),
        };

        for (field, value) in &criteria {
            if field.starts_with('$') {
                return Err(SelectorError::UnsupportedOperator(field.clone()));
            }
            if let Value::Object(condition) = value {
                if let Some(operator) = condition.keys().find(|key| key.starts_with('$')) {
                    return Err(SelectorError::UnsupportedOperator(operator.clone()));
                }
            }
        }

        Ok(Self { criteria })
    }

    /// Whether `document` satisfies every criterion.
    pub fn matches(&self, document: &Value) -> bool {
        self.criteria
            .iter()
            .all(|(field, expected)| document.get(field) == Some(expected))
    }
}
