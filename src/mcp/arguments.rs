//! `key=value` tool arguments

use serde_json::{Map, Value};

/// Decode `raw` as JSON when it is valid JSON, otherwise keep it as a string.
///
/// `3` becomes a number and `{"a":1}` an object, while `bob` or `007` stay
/// strings.
pub fn coerce_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Arguments for `tools/call`, in command-line order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolArguments {
    values: Map<String, Value>,
}

impl ToolArguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `key=value` pairs, splitting on the first `=`.
    ///
    /// Later keys overwrite earlier ones. Entries without `=` are returned
    /// separately so the caller can report them.
    pub fn parse<I, S>(pairs: I) -> (Self, Vec<String>)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut args = Self::new();
        let mut skipped = Vec::new();

        for pair in pairs {
            let pair = pair.as_ref();
            match pair.split_once('=') {
                Some((key, value)) => args.insert(key, coerce_value(value)),
                None => skipped.push(pair.to_string()),
            }
        }

        (args, skipped)
    }

    pub fn insert(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.values)
    }
}
