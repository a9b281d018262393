use std::collections::BTreeMap;
use once_cell::sync::Lazy;

use regex::Regex;

use crate::api::FieldMessages;

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));
static ZIP: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{5}$").expect("valid zip regex"));

pub fn is_valid_email(value: &str) -> bool {
    EMAIL.is_match(value.trim())
}

pub fn is_valid_zip(value: &str) -> bool {
    ZIP.is_match(value.trim())
}

/// Strip everything but ASCII digits: `"(512) 555-0100"` becomes `"5125550100"`.
pub fn phone_digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

pub fn is_valid_phone(value: &str) -> bool {
    phone_digits(value).len() == 10
}

/// Per-field validation messages, one per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Record `message` unless the field already has an error; the first
    /// failing rule wins.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_insert_with(|| message.into());
    }

    pub fn remove(&mut self, field: &str) {
        self.0.remove(field);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Add `message` when `value` is blank. Returns whether the value is present.
    pub fn require(&mut self, field: &str, value: &str, message: &str) -> bool {
        if value.trim().is_empty() {
            self.add(field, message);
            false
        } else {
            true
        }
    }

    pub fn check(&mut self, field: &str, ok: bool, message: &str) {
        if !ok {
            self.add(field, message);
        }
    }

    /// Fold server-side 422 messages in, keeping the first message per field.
    pub fn merge_server(&mut self, errors: &FieldMessages) {
        for (field, messages) in errors {
            if let Some(first) = messages.first() {
                self.add(field, first.clone());
            }
        }
    }
}
