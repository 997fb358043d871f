//! Field-level validation evaluator.
//!
//! [`evaluate`] walks a field's rules in declaration order and reports the
//! first one that triggers. It never aggregates: a field shows at most one
//! message at a time.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::schema::{FieldId, FieldValue, Form, FormField, FormValues, RuleKind, ValidationRule};

const PASSWORD_MIN_LEN: usize = 8;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    // local@domain.tld, no whitespace or extra '@' in any part
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// Evaluate `value` against the field's rules.
///
/// Returns the first triggering rule's message (its custom message when set,
/// otherwise the rule's default), or `None` when every rule passes.
pub fn evaluate(field: &FormField, value: &FieldValue) -> Option<String> {
    field
        .validation_rules
        .iter()
        .find_map(|rule| check_rule(field, rule, value))
}

/// First message for every field of `form` that currently fails.
///
/// Derived fields are skipped; their value is computed, not entered. Fields
/// missing from `values` are evaluated as empty.
pub fn validate_form(form: &Form, values: &FormValues) -> Vec<(FieldId, String)> {
    form.fields
        .iter()
        .filter(|field| !field.is_derived)
        .filter_map(|field| {
            let value = values.get(&field.id).unwrap_or(&FieldValue::Empty);
            evaluate(field, value).map(|message| (field.id.clone(), message))
        })
        .collect()
}

fn check_rule(field: &FormField, rule: &ValidationRule, value: &FieldValue) -> Option<String> {
    let message = |default: String| Some(rule.message.clone().unwrap_or(default));

    match rule.kind {
        RuleKind::Required => {
            if field.required && value.is_blank() {
                return message("This field is required".to_string());
            }
        }
        RuleKind::MinLength => {
            let limit = rule.value.as_ref()?;
            let text = value.as_text().filter(|s| !s.is_empty())?;
            if (text.chars().count() as f64) < limit.as_number()? {
                return message(format!("Minimum length is {} characters", limit));
            }
        }
        RuleKind::MaxLength => {
            let limit = rule.value.as_ref()?;
            let text = value.as_text().filter(|s| !s.is_empty())?;
            if (text.chars().count() as f64) > limit.as_number()? {
                return message(format!("Maximum length is {} characters", limit));
            }
        }
        RuleKind::Email => {
            if value.is_present() && !EMAIL_PATTERN.is_match(&value.to_text()) {
                return message("Please enter a valid email address".to_string());
            }
        }
        RuleKind::Password => {
            if value.is_present() {
                let text = value.to_text();
                if text.chars().count() < PASSWORD_MIN_LEN {
                    return message(format!(
                        "Password must be at least {} characters long",
                        PASSWORD_MIN_LEN
                    ));
                }
                if !text.chars().any(|c| c.is_ascii_digit()) {
                    return message("Password must contain at least one number".to_string());
                }
            }
        }
        RuleKind::Custom => {
            // Placeholder semantics: equality with the configured value.
            let expected = rule.value.as_ref().filter(|param| param.is_set())?;
            if !expected.matches(value) {
                return message("Custom validation failed".to_string());
            }
        }
    }

    None
}
