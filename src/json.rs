//! JSON format parser implementation.
//!
//! Accepted shapes, tried in order:
//!
//! 1. a top-level array of objects;
//! 2. an object with exactly one property whose value is an array
//!    (`{"references": [...]}`);
//! 3. any other object, taken as a single reference.
//!
//! Keys go through the [`FieldMapper`] alias table like CSV headers do.
//!
//! # Example
//!
//! ```
//! use bibnorm::{JsonParser, ReferenceParser};
//!
//! let input = r#"{"referencias": [{"titulo": "Macunaíma", "ano": 1928}]}"#;
//! let references = JsonParser::new().parse(input).unwrap();
//! assert_eq!(references[0].title, "Macunaíma");
//! assert_eq!(references[0].year.as_deref(), Some("1928"));
//! ```

use crate::field_map::{FieldMapper, RawRecord};
use crate::{CitationStyle, ImportSource, Reference, ReferenceError, ReferenceParser, Result};
use serde_json::{Map, Value};
use tracing::debug;

/// Parser for JSON reference collections.
#[derive(Debug, Clone, Default)]
pub struct JsonParser {
    mapper: FieldMapper,
    style: CitationStyle,
}

impl JsonParser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the style given to elements without a `style` key.
    #[must_use]
    pub fn with_style(mut self, style: CitationStyle) -> Self {
        self.style = style;
        self
    }

    /// Replaces the key alias table.
    #[must_use]
    pub fn with_mapper(mut self, mapper: FieldMapper) -> Self {
        self.mapper = mapper;
        self
    }

    fn element_to_reference(&self, element: Value) -> Reference {
        let Value::Object(object) = element else {
            debug!("non-object JSON element, producing an empty record");
            return Reference {
                style: self.style,
                import_source: Some(ImportSource::Json),
                ..Default::default()
            };
        };

        let mut raw = RawRecord::new();
        for (key, value) in object {
            if let Some(value) = value_to_string(value) {
                raw.push(key, value);
            }
        }

        let mut reference = self.mapper.to_reference(raw, self.style);
        if reference.import_source.is_none() {
            reference.import_source = Some(ImportSource::Json);
        }
        reference
    }
}

/// Picks the element list out of a parsed document.
fn into_elements(document: Value) -> Result<Vec<Value>> {
    match document {
        Value::Array(elements) => Ok(elements),
        Value::Object(object) => Ok(single_array_property(object)),
        other => Err(ReferenceError::InvalidInput(format!(
            "expected a JSON array or object, found {}",
            kind_name(&other)
        ))),
    }
}

fn single_array_property(object: Map<String, Value>) -> Vec<Value> {
    let is_wrapper = object.len() == 1 && object.values().all(Value::is_array);
    if !is_wrapper {
        return vec![Value::Object(object)];
    }
    match object.into_iter().next() {
        Some((_, Value::Array(elements))) => elements,
        _ => Vec::new(),
    }
}

/// Stringifies a scalar value. Arrays of strings are joined with `"; "`.
fn value_to_string(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.into_iter().filter_map(value_to_string).collect();
            Some(parts.join("; "))
        }
        Value::Object(_) => None,
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl ReferenceParser for JsonParser {
    /// # Errors
    ///
    /// [`ReferenceError::Json`] for malformed text and
    /// [`ReferenceError::InvalidInput`] for a scalar document.
    fn parse(&self, input: &str) -> Result<Vec<Reference>> {
        let document: Value = serde_json::from_str(input)?;
        let elements = into_elements(document)?;
        debug!(elements = elements.len(), "parsed JSON document");
        Ok(elements
            .into_iter()
            .map(|element| self.element_to_reference(element))
            .collect())
    }
}
