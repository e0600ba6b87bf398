//! Synchronous, local field validation
//!
//! Error messages are translation keys; the renderer looks them up.

use super::catalog::{FieldDef, FieldFormat, FieldKind, PageDef, TAX_CATEGORY_FIELDS, EXEMPTION_EXEMPT};
use super::step::{Route, StepId};
use super::values::FormValues;
use super::visibility::{self, VisibilitySet};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

static CARD_EXPIRY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(0[1-9]|1[0-2])/\d{2}$").expect("expiry pattern is valid"));

const PASSWORD_MIN_LENGTH: usize = 8;
const PASSWORD_SPECIALS: &str = "@$!%*?&";

/// Field errors of one page, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    errors: BTreeMap<String, &'static str>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Translation key of the field's error, if any
    pub fn error(&self, field: &str) -> Option<&'static str> {
        self.errors.get(field).copied()
    }

    pub fn insert(&mut self, field: &str, message_key: &'static str) {
        self.errors.entry(field.to_string()).or_insert(message_key);
    }

    /// Drop a field's error once the user edits it; it is not re-checked
    /// until the next submit attempt
    pub fn clear_field(&mut self, field: &str) {
        self.errors.remove(field);
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &'static str)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// First unmet password requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordIssue {
    TooShort,
    MissingUppercase,
    MissingLowercase,
    MissingDigit,
    MissingSpecial,
}

impl PasswordIssue {
    pub fn message_key(self) -> &'static str {
        match self {
            Self::TooShort => "validation.password.length",
            Self::MissingUppercase => "validation.password.uppercase",
            Self::MissingLowercase => "validation.password.lowercase",
            Self::MissingDigit => "validation.password.digit",
            Self::MissingSpecial => "validation.password.special",
        }
    }
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

/// Check the password policy: length, upper, lower, digit and a special character
pub fn check_password(value: &str) -> Result<(), PasswordIssue> {
    if value.chars().count() < PASSWORD_MIN_LENGTH {
        return Err(PasswordIssue::TooShort);
    }
    if !value.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(PasswordIssue::MissingUppercase);
    }
    if !value.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(PasswordIssue::MissingLowercase);
    }
    if !value.chars().any(|c| c.is_ascii_digit()) {
        return Err(PasswordIssue::MissingDigit);
    }
    if !value.chars().any(|c| PASSWORD_SPECIALS.contains(c)) {
        return Err(PasswordIssue::MissingSpecial);
    }
    Ok(())
}

/// Digits after dropping spaces, dashes, dots and parentheses
fn digits_only(value: &str) -> Option<String> {
    let stripped: String = value
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
        .collect();
    stripped
        .chars()
        .all(|c| c.is_ascii_digit())
        .then_some(stripped)
}

fn check_format(format: FieldFormat, value: &str, values: &FormValues) -> Option<&'static str> {
    match format {
        FieldFormat::Email if !is_valid_email(value) => Some("validation.email"),
        FieldFormat::Password => check_password(value).err().map(PasswordIssue::message_key),
        FieldFormat::Matches(other) if values.text(other) != value => Some("validation.mismatch"),
        FieldFormat::Digits { min, max } => match digits_only(value) {
            Some(digits) if (min..=max).contains(&digits.len()) => None,
            _ => Some("validation.digits"),
        },
        FieldFormat::Date if NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").is_err() => {
            Some("validation.date")
        }
        FieldFormat::CardExpiry if !CARD_EXPIRY_PATTERN.is_match(value.trim()) => {
            Some("validation.cardExpiry")
        }
        _ => None,
    }
}

fn validate_field(field: &FieldDef, values: &FormValues) -> Option<&'static str> {
    let blank = values.is_blank(field.name);
    if blank {
        return field.required.then_some("validation.required");
    }
    match field.kind {
        FieldKind::Text | FieldKind::Secret => field
            .format
            .and_then(|format| check_format(format, values.text(field.name), values)),
        FieldKind::Flag | FieldKind::Choice(_) => None,
    }
}

/// Checks that span several fields of a page
fn validate_page_rules(page: Route, values: &FormValues, result: &mut ValidationResult) {
    if page == Route::Step(StepId::TaxExemption)
        && values.choice("exemptionStatus") == Some(EXEMPTION_EXEMPT)
        && TAX_CATEGORY_FIELDS.iter().all(|field| !values.flag(field))
    {
        result.insert(TAX_CATEGORY_FIELDS[0], "validation.taxCategory");
    }
}

fn validate_fields<'a>(
    page: &PageDef,
    fields: impl Iterator<Item = &'a FieldDef>,
    values: &FormValues,
    visibility: &VisibilitySet,
) -> ValidationResult {
    let mut result = ValidationResult::default();
    for field in fields.filter(|field| visibility.is_enabled(field.name)) {
        if let Some(message) = validate_field(field, values) {
            result.insert(field.name, message);
        }
    }
    validate_page_rules(page.route, values, &mut result);
    result
}

/// Validate every visible, enabled field of the page
pub fn validate(page: &PageDef, values: &FormValues, visibility: &VisibilitySet) -> ValidationResult {
    validate_fields(page, page.fields(), values, visibility)
}

/// Validate only the fields of one section
pub fn validate_section(
    page: &PageDef,
    section: &str,
    values: &FormValues,
    visibility: &VisibilitySet,
) -> ValidationResult {
    let Some(section) = page.section(section) else {
        return ValidationResult::default();
    };
    let mut result = validate_fields(page, section.fields.iter(), values, visibility);
    // Page rules may flag fields outside this section
    let owned: Vec<&str> = section.field_names().collect();
    result.errors.retain(|field, _| owned.contains(&field.as_str()));
    result
}

/// Whether the page's primary action may proceed
pub fn can_advance(page: &PageDef, values: &FormValues) -> bool {
    let visibility = visibility::resolve(page.route, values);
    validate(page, values, &visibility).is_valid()
}
