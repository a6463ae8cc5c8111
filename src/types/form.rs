use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single form field value: free text or a toggle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FormValue {
    Flag(bool),
    Text(String),
}

impl FormValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FormValue::Text(s) => Some(s),
            FormValue::Flag(_) => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            FormValue::Flag(b) => Some(*b),
            FormValue::Text(_) => None,
        }
    }
}

impl From<&str> for FormValue {
    fn from(value: &str) -> Self {
        FormValue::Text(value.to_string())
    }
}

impl From<String> for FormValue {
    fn from(value: String) -> Self {
        FormValue::Text(value)
    }
}

impl From<bool> for FormValue {
    fn from(value: bool) -> Self {
        FormValue::Flag(value)
    }
}

/// Field name → value. Arbitrary keys are accepted; ordering is by key so
/// snapshots serialize deterministically.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(transparent)]
pub struct FormState {
    fields: BTreeMap<String, FormValue>,
}

impl FormState {
    /// Form values a fresh session starts with.
    pub fn initial() -> Self {
        let mut form = Self::default();
        form.set("fullName", FormValue::from(""));
        form.set("email", FormValue::from(""));
        form.set("notifications", FormValue::Flag(true));
        form
    }

    pub fn get(&self, key: &str) -> Option<&FormValue> {
        self.fields.get(key)
    }

    pub fn set(&mut self, key: &str, value: FormValue) {
        self.fields.insert(key.to_string(), value);
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FormValue)> {
        self.fields.iter()
    }
}
