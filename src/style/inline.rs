//! Inline style map: CSS property name → value.

use std::collections::BTreeMap;

/// Inline style properties of one element, kept sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Style {
    properties: BTreeMap<String, String>,
}

impl Style {
    /// Create an empty style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to `value`, or remove it when `value` is `None`.
    pub fn set(&mut self, name: &str, value: Option<&str>) {
        match value {
            Some(value) => {
                self.properties.insert(name.to_owned(), value.to_owned());
            }
            None => {
                self.properties.remove(name);
            }
        }
    }

    /// The value of `name`, if set.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    /// Remove `name`, returning its previous value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.properties.remove(name)
    }

    /// Whether `name` is set.
    pub fn has(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    /// Iterate over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Number of set properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether no properties are set.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}
