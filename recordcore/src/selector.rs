//! Rich-query selectors.
//!
//! Attribute lookups are delegated to the ledger's query executor as a JSON
//! document `{"selector": {"docType": <family>, "<field>": <value>}}`. The
//! document is built with `serde_json` so that values are always escaped. The
//! discriminator comes first and a caller field of the same name is dropped.

use crate::types::{DocType, FieldName};
use serde_json::{json, Map, Value};
use std::fmt;

/// JSON name of the discriminator attribute.
pub const DOC_TYPE_FIELD: &str = "docType";

/// An equality selector scoped to one record family.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorQuery {
    doc_type: DocType,
    criteria: Vec<(FieldName, Value)>,
}

impl SelectorQuery {
    /// Starts a selector matching every record of `doc_type`.
    pub const fn for_doc_type(doc_type: DocType) -> Self {
        Self {
            doc_type,
            criteria: Vec::new(),
        }
    }

    /// Adds an equality criterion on a top-level field.
    #[must_use]
    pub fn with_field(mut self, field: FieldName, value: impl Into<Value>) -> Self {
        self.criteria.push((field, value.into()));
        self
    }

    /// The family this selector is scoped to.
    pub const fn doc_type(&self) -> &DocType {
        &self.doc_type
    }

    /// Builds the JSON document sent to the executor.
    pub fn to_json(&self) -> Value {
        let mut selector = Map::new();
        selector.insert(
            DOC_TYPE_FIELD.to_string(),
            Value::String(self.doc_type.to_string()),
        );
        for (field, value) in &self.criteria {
            if field.as_str() != DOC_TYPE_FIELD {
                selector.insert(field.to_string(), value.clone());
            }
        }
        json!({ "selector": selector })
    }
}

impl fmt::Display for SelectorQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}
