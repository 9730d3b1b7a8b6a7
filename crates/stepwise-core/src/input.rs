//! Input sequence model.
//!
//! Elements are stored untyped and checked lazily by the processor, so a
//! sequence built from JSON may hold non-numeric values until they are
//! reached.

use serde_json::Value;

use crate::error::ProcessError;

/// An ordered, read-only sequence of elements to process.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSequence {
    items: Vec<Value>,
}

impl InputSequence {
    /// Build a sequence from a dynamic value.
    ///
    /// Fails with [`ProcessError::InvalidInput`] unless the value is an array.
    /// Elements are not inspected here.
    pub fn from_value(value: Value) -> Result<Self, ProcessError> {
        match value {
            Value::Array(items) => Ok(Self { items }),
            other => Err(ProcessError::InvalidInput(format!(
                "got {}",
                value_kind(&other)
            ))),
        }
    }

    /// Parse a sequence from JSON text.
    ///
    /// ```
    /// use stepwise_core::input::InputSequence;
    ///
    /// let seq = InputSequence::parse("[1, 2.5, 3]").unwrap();
    /// assert_eq!(seq.len(), 3);
    /// assert!(InputSequence::parse("{\"a\": 1}").is_err());
    /// ```
    pub fn parse(json: &str) -> Result<Self, ProcessError> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| ProcessError::InvalidInput(format!("malformed JSON: {e}")))?;
        Self::from_value(value)
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the sequence has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Numeric value of the element at `index`.
    ///
    /// Returns `None` if the index is out of range or the element is not a number.
    #[must_use]
    pub fn number_at(&self, index: usize) -> Option<f64> {
        self.items.get(index).and_then(Value::as_f64)
    }

    /// Raw element at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }
}

impl<T: Into<f64>> FromIterator<T> for InputSequence {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter
                .into_iter()
                .map(|n| {
                    // Non-finite floats have no JSON number form.
                    serde_json::Number::from_f64(n.into()).map_or(Value::Null, Value::Number)
                })
                .collect(),
        }
    }
}

impl From<Vec<f64>> for InputSequence {
    fn from(values: Vec<f64>) -> Self {
        values.into_iter().collect()
    }
}

impl TryFrom<Value> for InputSequence {
    type Error = ProcessError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
