//! Form values scoped to one page, and the aggregate record across steps

use super::catalog::{FieldDef, FieldKind, PageDef};
use super::step::StepId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Value of a single field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
    Choice(Option<String>),
}

impl FieldValue {
    /// Empty value for a field of the given kind
    pub fn empty_for(kind: &FieldKind) -> Self {
        match kind {
            FieldKind::Text | FieldKind::Secret => FieldValue::Text(String::new()),
            FieldKind::Flag => FieldValue::Flag(false),
            FieldKind::Choice(_) => FieldValue::Choice(None),
        }
    }

    /// A value the user has not provided: empty text, unchecked flag, no choice
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Flag(b) => !b,
            FieldValue::Choice(c) => c.is_none(),
        }
    }

    pub fn as_text(&self) -> &str {
        match self {
            FieldValue::Text(s) => s,
            FieldValue::Choice(Some(c)) => c,
            _ => "",
        }
    }

    pub fn as_flag(&self) -> bool {
        matches!(self, FieldValue::Flag(true))
    }

    pub fn as_choice(&self) -> Option<&str> {
        match self {
            FieldValue::Choice(c) => c.as_deref(),
            _ => None,
        }
    }

    /// Reset to the empty value of the same kind
    pub fn cleared(&self) -> Self {
        match self {
            FieldValue::Text(_) => FieldValue::Text(String::new()),
            FieldValue::Flag(_) => FieldValue::Flag(false),
            FieldValue::Choice(_) => FieldValue::Choice(None),
        }
    }
}

/// Mapping from field name to value for one page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormValues {
    fields: BTreeMap<String, FieldValue>,
}

impl FormValues {
    /// Empty values for every field the page declares
    pub fn for_page(page: &PageDef) -> Self {
        let fields = page
            .fields()
            .map(|field| (field.name.to_string(), FieldValue::empty_for(&field.kind)))
            .collect();
        Self { fields }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn text(&self, name: &str) -> &str {
        self.get(name).map(FieldValue::as_text).unwrap_or("")
    }

    pub fn flag(&self, name: &str) -> bool {
        self.get(name).is_some_and(FieldValue::as_flag)
    }

    pub fn choice(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_choice)
    }

    pub fn is_blank(&self, name: &str) -> bool {
        self.get(name).map_or(true, FieldValue::is_blank)
    }

    /// Set a field, returning the previous value
    pub fn set(&mut self, name: &str, value: FieldValue) -> Option<FieldValue> {
        self.fields.insert(name.to_string(), value)
    }

    pub fn set_text(&mut self, name: &str, value: impl Into<String>) -> Option<FieldValue> {
        self.set(name, FieldValue::Text(value.into()))
    }

    /// Reset a field to its empty value, keeping its kind
    pub fn clear(&mut self, name: &str) {
        if let Some(value) = self.fields.get_mut(name) {
            *value = value.cleared();
        }
    }

    pub fn clear_all<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) {
        for name in names {
            self.clear(name);
        }
    }

    /// Copy text values from `sources` into `targets`, pairwise
    pub fn mirror(&mut self, sources: &[&str], targets: &[&str]) {
        for (source, target) in sources.iter().zip(targets) {
            let value = self.text(source).to_string();
            self.set_text(target, value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FieldDef {
    /// Current value of this field in `values`, or its empty value
    pub fn value_in(&self, values: &FormValues) -> FieldValue {
        values
            .get(self.name)
            .cloned()
            .unwrap_or_else(|| FieldValue::empty_for(&self.kind))
    }
}

/// Union of every step's committed values, one owner per step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateApplication {
    steps: BTreeMap<StepId, FormValues>,
}

impl AggregateApplication {
    /// Record the values a step handed over on successful advance
    pub fn commit(&mut self, step: StepId, values: FormValues) {
        self.steps.insert(step, values);
    }

    pub fn get(&self, step: StepId) -> Option<&FormValues> {
        self.steps.get(&step)
    }

    /// Committed steps in wizard order
    pub fn iter(&self) -> impl Iterator<Item = (StepId, &FormValues)> {
        self.steps.iter().map(|(step, values)| (*step, values))
    }

    pub fn contains(&self, step: StepId) -> bool {
        self.steps.contains_key(&step)
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::catalog::page_def;
    use crate::wizard::step::Route;

    #[test]
    fn test_for_page_creates_empty_values() {
        let page = page_def(Route::Step(StepId::AboutYou));
        let values = FormValues::for_page(page);
        assert_eq!(values.len(), page.fields().count());
        assert_eq!(values.text("practiceName"), "");
        assert!(!values.flag("shippingSameAsBilling"));
        assert_eq!(values.choice("practiceType"), None);
    }

    #[test]
    fn test_blank_detection() {
        assert!(FieldValue::Text("   ".to_string()).is_blank());
        assert!(FieldValue::Flag(false).is_blank());
        assert!(FieldValue::Choice(None).is_blank());
        assert!(!FieldValue::Choice(Some("ACH".to_string())).is_blank());
    }

    #[test]
    fn test_unknown_field_is_blank() {
        let values = FormValues::default();
        assert!(values.is_blank("missing"));
        assert_eq!(values.text("missing"), "");
    }

    #[test]
    fn test_clear_keeps_kind() {
        let mut values = FormValues::default();
        values.set("flag", FieldValue::Flag(true));
        values.set("choice", FieldValue::Choice(Some("ACH".to_string())));
        values.clear_all(["flag", "choice"]);
        assert_eq!(values.get("flag"), Some(&FieldValue::Flag(false)));
        assert_eq!(values.get("choice"), Some(&FieldValue::Choice(None)));
    }

    #[test]
    fn test_mirror_copies_pairwise() {
        let mut values = FormValues::default();
        values.set_text("a", "one");
        values.set_text("b", "two");
        values.mirror(&["a", "b"], &["x", "y"]);
        assert_eq!(values.text("x"), "one");
        assert_eq!(values.text("y"), "two");
    }

    #[test]
    fn test_aggregate_commit_replaces_values() {
        let mut aggregate = AggregateApplication::default();
        let mut first = FormValues::default();
        first.set_text("practiceName", "Old");
        aggregate.commit(StepId::AboutYou, first);

        let mut second = FormValues::default();
        second.set_text("practiceName", "New");
        aggregate.commit(StepId::AboutYou, second);

        assert_eq!(
            aggregate.get(StepId::AboutYou).map(|v| v.text("practiceName")),
            Some("New")
        );
    }

    #[test]
    fn test_aggregate_iterates_in_step_order() {
        let mut aggregate = AggregateApplication::default();
        aggregate.commit(StepId::TaxExemption, FormValues::default());
        aggregate.commit(StepId::AboutYou, FormValues::default());
        let order: Vec<_> = aggregate.iter().map(|(step, _)| step).collect();
        assert_eq!(order, vec![StepId::AboutYou, StepId::TaxExemption]);
    }

    #[test]
    fn test_serializes_untagged() {
        let mut values = FormValues::default();
        values.set_text("email", "a@b.com");
        values.set("terms", FieldValue::Flag(true));
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"{"fields":{"email":"a@b.com","terms":true}}"#);
    }
}
