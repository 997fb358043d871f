//! Parsing helpers for flag values.

use chrono::NaiveDate;
use formdeck_core::{FieldType, FieldValue, RuleKind, RuleParam, SelectOption, ValidationRule};

/// Parse a boolean flag value (true/false, yes/no, on/off, 1/0).
pub fn parse_bool(value: &str) -> anyhow::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "on" | "1" => Ok(true),
        "false" | "no" | "n" | "off" | "0" => Ok(false),
        _ => Err(anyhow::anyhow!(
            "Invalid boolean: {} (expected true or false)",
            value
        )),
    }
}

/// Parse a field type name.
pub fn parse_field_type(value: &str) -> anyhow::Result<FieldType> {
    Ok(value.parse::<FieldType>()?)
}

/// Parse a choice option as `LABEL=VALUE`. A bare `LABEL` uses the label
/// as its value.
pub fn parse_option(value: &str) -> anyhow::Result<SelectOption> {
    let (label, option_value) = match value.split_once('=') {
        Some((label, option_value)) => (label.trim(), option_value.trim()),
        None => (value.trim(), value.trim()),
    };
    if label.is_empty() {
        return Err(anyhow::anyhow!("Invalid option: {} (label is empty)", value));
    }
    Ok(SelectOption::new(label, option_value))
}

/// Parse a validation rule as `KIND[:VALUE[:MESSAGE]]`.
///
/// The message may itself contain colons. An empty VALUE is left unset, so
/// `required::Tell us your name` sets only a message.
pub fn parse_rule(value: &str) -> anyhow::Result<ValidationRule> {
    let mut parts = value.splitn(3, ':');
    let kind_text = parts.next().unwrap_or_default();
    let kind: RuleKind = kind_text.parse()?;
    let mut rule = ValidationRule::new(kind);

    if let Some(param) = parts.next().map(str::trim).filter(|p| !p.is_empty()) {
        let param = match param.parse::<f64>().ok().filter(|n| n.is_finite()) {
            Some(number) => RuleParam::Number(number),
            None => RuleParam::Text(param.to_string()),
        };
        if matches!(kind, RuleKind::MinLength | RuleKind::MaxLength) && param.as_number().is_none()
        {
            return Err(anyhow::anyhow!(
                "Invalid rule: {} ({} needs a number)",
                value,
                kind
            ));
        }
        rule = rule.with_value(param);
    }

    if let Some(message) = parts.next().filter(|m| !m.trim().is_empty()) {
        rule = rule.with_message(message);
    }

    Ok(rule)
}

/// Split `FIELD=VALUE`. The value may be empty.
pub fn parse_assignment(value: &str) -> anyhow::Result<(&str, &str)> {
    match value.split_once('=') {
        Some((field, field_value)) if !field.trim().is_empty() => Ok((field.trim(), field_value)),
        _ => Err(anyhow::anyhow!(
            "Invalid assignment: {} (expected FIELD=VALUE)",
            value
        )),
    }
}

/// Interpret raw input for a field of `field_type`.
///
/// Checkboxes take booleans, numbers take decimal numbers, and dates take
/// `YYYY-MM-DD`. Blank input for a number or date stays blank text, like an
/// emptied input box.
pub fn parse_value(field_type: FieldType, raw: &str) -> anyhow::Result<FieldValue> {
    match field_type {
        FieldType::Checkbox => Ok(FieldValue::Bool(parse_bool(raw)?)),
        FieldType::Number | FieldType::Date if raw.trim().is_empty() => Ok(FieldValue::text("")),
        FieldType::Number => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(FieldValue::Number)
            .ok_or_else(|| anyhow::anyhow!("Invalid number: {}", raw)),
        FieldType::Date => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map(FieldValue::Date)
            .map_err(|_| anyhow::anyhow!("Invalid date (expected YYYY-MM-DD): {}", raw)),
        FieldType::Text | FieldType::Textarea | FieldType::Select | FieldType::Radio => {
            Ok(FieldValue::text(raw))
        }
    }
}

/// Interpret a `--default` value; empty input clears the default.
pub fn parse_default(field_type: FieldType, raw: &str) -> anyhow::Result<Option<FieldValue>> {
    if raw.is_empty() {
        return Ok(None);
    }
    parse_value(field_type, raw).map(Some)
}
