//! Translation lookup
//!
//! Catalogs are JSON objects, optionally nested; nested keys are joined with
//! dots (`{"step": {"about": {"title": ".."}}}` serves `step.about.title`).
//! Lookups of unknown keys return the key itself.

use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const EMBEDDED_EN: &str = include_str!("../assets/locales/en.json");

#[derive(Debug, Clone, Default)]
pub struct Translator {
    entries: HashMap<String, String>,
}

impl Translator {
    /// The English catalog shipped with the binary
    pub fn embedded() -> Result<Self> {
        Self::from_json(EMBEDDED_EN).context("embedded English catalog is malformed")
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let mut translator = Self::default();
        translator.merge_json(json)?;
        Ok(translator)
    }

    /// Merge entries over the current ones; later catalogs win
    pub fn merge_json(&mut self, json: &str) -> Result<()> {
        let value: Value = serde_json::from_str(json)?;
        let Value::Object(map) = value else {
            return Err(anyhow!("translation catalog must be a JSON object"));
        };
        for (key, value) in map {
            flatten_into(&mut self.entries, key, value);
        }
        Ok(())
    }

    pub fn merge_file(&mut self, path: &Path) -> Result<()> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading translations from {}", path.display()))?;
        self.merge_json(&content)
            .with_context(|| format!("parsing translations from {}", path.display()))
    }

    /// Translate `key`, falling back to the key itself
    pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
        self.entries.get(key).map(String::as_str).unwrap_or(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

fn flatten_into(entries: &mut HashMap<String, String>, prefix: String, value: Value) {
    match value {
        Value::String(s) => {
            entries.insert(prefix, s);
        }
        Value::Object(map) => {
            for (key, value) in map {
                flatten_into(entries, format!("{prefix}.{key}"), value);
            }
        }
        // Numbers and booleans are kept as their JSON text
        Value::Number(_) | Value::Bool(_) => {
            entries.insert(prefix, value.to_string());
        }
        Value::Null | Value::Array(_) => {}
    }
}
