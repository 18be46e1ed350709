//! Declarative per-field form validation.
//!
//! Every entity form is described by a table of [`FieldRules`]. A table is
//! evaluated uniformly against raw form values, so leads and clients share one
//! evaluator and differ only in their tables.

use std::{collections::HashMap, fmt, str::FromStr};

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type FormData = HashMap<String, String>;

pub const MIN_NAME_LENGTH: usize = 2;
pub const MAX_NAME_LENGTH: usize = 50;
pub const DATE_FORMAT: &str = "%Y-%m-%d";

static PHONE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9\-\+\(\)\s]+$").expect("valid phone regex"));
static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));
static DOMAIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9\-\.]+\.[a-zA-Z]{2,}$").expect("valid domain regex")
});
static DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date regex"));
static PRICE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+(\.\d{1,2})?$").expect("valid price regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    Phone,
    Domain,
    Price,
}

impl Pattern {
    fn regex(self) -> &'static Regex {
        match self {
            Pattern::Phone => &PHONE,
            Pattern::Domain => &DOMAIN,
            Pattern::Price => &PRICE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    MinLength(usize),
    MaxLength(usize),
    Email,
    Pattern(Pattern),
    /// Numeric value must be at least this much.
    Min(u32),
    OneOf(&'static [&'static str]),
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Required,
    Format,
    MinLength,
    MaxLength,
    Range,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FieldError {
    pub field: String,
    pub kind: ErrorKind,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn field(&self, name: &str) -> Option<&FieldError> {
        self.0.iter().find(|error| error.field == name)
    }
}

impl From<FieldError> for ValidationErrors {
    fn from(error: FieldError) -> Self {
        Self(vec![error])
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.0.iter().map(|error| error.field.as_str()).collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Rules for one form field, checked in order.
#[derive(Debug, Clone, Copy)]
pub struct FieldRules {
    pub field: &'static str,
    pub label: &'static str,
    pub rules: &'static [Rule],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Every field is checked; absent fields count as empty.
    Full,
    /// Only the fields present in the form are checked.
    Partial,
}

pub fn validate(table: &[FieldRules], form: &FormData, mode: Mode) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    for entry in table {
        let value = match (form.get(entry.field), mode) {
            (Some(value), _) => value.trim(),
            (None, Mode::Full) => "",
            (None, Mode::Partial) => continue,
        };
        if let Some(error) = check_field(entry, value) {
            errors.push(error);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Returns the first rule violation for `value`, if any.
pub fn check_field(entry: &FieldRules, value: &str) -> Option<FieldError> {
    entry
        .rules
        .iter()
        .find_map(|rule| check_rule(*rule, value).map(|kind| error_for(entry, *rule, kind)))
}

fn check_rule(rule: Rule, value: &str) -> Option<ErrorKind> {
    if value.is_empty() {
        return (rule == Rule::Required).then_some(ErrorKind::Required);
    }

    let passes = match rule {
        Rule::Required => true,
        Rule::MinLength(min) => value.chars().count() >= min,
        Rule::MaxLength(max) => value.chars().count() <= max,
        Rule::Email => EMAIL.is_match(value),
        Rule::Pattern(pattern) => pattern.regex().is_match(value),
        Rule::Min(min) => {
            return match BigDecimal::from_str(value) {
                Ok(number) if number >= BigDecimal::from(min) => None,
                Ok(_) => Some(ErrorKind::Range),
                Err(_) => Some(ErrorKind::Format),
            }
        }
        Rule::OneOf(allowed) => allowed.contains(&value),
        Rule::Date => DATE.is_match(value) && NaiveDate::parse_from_str(value, DATE_FORMAT).is_ok(),
    };

    if passes {
        None
    } else {
        Some(match rule {
            Rule::MinLength(_) => ErrorKind::MinLength,
            Rule::MaxLength(_) => ErrorKind::MaxLength,
            _ => ErrorKind::Format,
        })
    }
}

fn error_for(entry: &FieldRules, rule: Rule, kind: ErrorKind) -> FieldError {
    let label = entry.label;
    let message = match (rule, kind) {
        (_, ErrorKind::Required) => format!("{label} is required"),
        (Rule::MinLength(min), _) => format!("{label} must be at least {min} characters"),
        (Rule::MaxLength(max), _) => format!("{label} must be at most {max} characters"),
        (Rule::Min(min), ErrorKind::Range) => format!("{label} must be at least {min}"),
        (Rule::Email, _) => "Email address is not valid".to_string(),
        (Rule::Date, _) => format!("{label} must be a date in YYYY-MM-DD format"),
        (Rule::OneOf(allowed), _) => format!("{label} must be one of: {}", allowed.join(", ")),
        _ => format!("{label} is not valid"),
    };
    FieldError::new(entry.field, kind, message)
}

/// Flattens a JSON form submission into raw field values.
///
/// Strings are kept as-is, other scalars use their JSON text and `null`
/// becomes an empty value.
pub fn form_from_json(body: Map<String, Value>) -> FormData {
    body.into_iter()
        .map(|(field, value)| {
            let raw = match value {
                Value::Null => String::new(),
                Value::String(text) => text,
                other => other.to_string(),
            };
            (field, raw)
        })
        .collect()
}

/// Trimmed value of `field`, `None` when absent.
pub fn text(form: &FormData, field: &str) -> Option<String> {
    form.get(field).map(|value| value.trim().to_string())
}

/// Like [`text`], but an empty value clears the field (`Some(None)`).
pub fn optional_text(form: &FormData, field: &str) -> Option<Option<String>> {
    text(form, field).map(|value| (!value.is_empty()).then_some(value))
}

/// Parses a field that already passed validation, reporting a format error otherwise.
pub fn parsed<T: FromStr>(form: &FormData, entry: &FieldRules) -> Result<Option<T>, FieldError> {
    let Some(value) = text(form, entry.field) else {
        return Ok(None);
    };
    value
        .parse()
        .map(Some)
        .map_err(|_| FieldError::new(entry.field, ErrorKind::Format, format!("{} is not valid", entry.label)))
}
