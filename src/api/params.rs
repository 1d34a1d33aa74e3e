//! Ordered request parameter set
//!
//! Parameters keep their insertion order so the encoded body is stable.
//! List-valued parameters use the MWS `Prefix.Member.N` convention.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestParameters {
    values: IndexMap<String, String>,
}

impl RequestParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a single parameter, replacing any previous value
    pub fn set(&mut self, name: impl Into<String>, value: impl ToString) -> &mut Self {
        self.values.insert(name.into(), value.to_string());
        self
    }

    /// Builder-style variant of [`set`](Self::set)
    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(|v| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.values.shift_remove(name)
    }

    /// Remove every parameter whose name starts with `prefix`
    pub fn remove_prefix(&mut self, prefix: &str) {
        self.values.retain(|name, _| !name.starts_with(prefix));
    }

    /// Replace a list parameter, e.g. `ReportTypeList.Type.1`, `ReportTypeList.Type.2`
    pub fn set_list<I, S>(&mut self, prefix: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        let list_root = prefix.split('.').next().unwrap_or(prefix).to_string();
        self.remove_prefix(&format!("{}.", list_root));
        for (i, value) in values.into_iter().enumerate() {
            self.values.insert(format!("{}.{}", prefix, i + 1), value.to_string());
        }
        self
    }

    /// Copy the named parameters that are present into a new set
    pub fn pick<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut picked = Self::new();
        for name in names {
            if let Some(value) = self.values.get(name) {
                picked.values.insert(name.to_string(), value.clone());
            }
        }
        picked
    }

    /// Copy every parameter of `other` into this set, overwriting duplicates
    pub fn merge(&mut self, other: &RequestParameters) {
        for (name, value) in &other.values {
            self.values.insert(name.clone(), value.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Encode as an `application/x-www-form-urlencoded` body
    pub fn to_form_body(&self) -> String {
        self.values
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for RequestParameters {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.set(k, v);
        }
        params
    }
}
