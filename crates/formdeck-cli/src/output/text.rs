//! Table rows and cells for forms and fields.

use formdeck_core::{FieldValue, Form, FormField, FormValues, PreviewSession, ValidationRule};

use crate::ui::theme::{BULLET, DERIVED_FROM};
use crate::ui::{id_cell, short_id, single_line, truncate, UiContext};

/// Rule summary, e.g. `required, minLength 3, email`.
pub fn rules_cell(rules: &[ValidationRule]) -> String {
    rules
        .iter()
        .map(|rule| match &rule.value {
            Some(value) => format!("{} {}", rule.kind, value),
            None => rule.kind.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Flags for a field: required marker, derivation, options, default.
pub fn flags_cell(form: &Form, field: &FormField, unicode: bool) -> String {
    let mut flags = Vec::new();
    if field.required {
        flags.push("required".to_string());
    }
    if field.is_derived {
        let parents: Vec<String> = field
            .parent_fields
            .iter()
            .map(|id| match form.field(id) {
                Some(parent) => parent.label.clone(),
                None => short_id(id.as_str()),
            })
            .collect();
        let mut derived = format!(
            "derived {} {}",
            DERIVED_FROM.get(unicode),
            parents.join(", ")
        );
        if let Some(formula) = &field.derived_formula {
            derived.push_str(&format!(" ({})", formula));
        }
        flags.push(derived);
    }
    if !field.options.is_empty() {
        let values: Vec<&str> = field.options.iter().map(|o| o.value.as_str()).collect();
        flags.push(format!("options {}", values.join("|")));
    }
    if let Some(default) = &field.default_value {
        flags.push(format!("default {}", default));
    }
    flags.join(&format!(" {} ", BULLET.get(unicode)))
}

/// One row per field of the form being edited.
pub fn field_rows(ctx: &UiContext, form: &Form) -> Vec<Vec<String>> {
    form.fields
        .iter()
        .map(|field| {
            vec![
                field.order.to_string(),
                id_cell(ctx, field.id.as_str()),
                field.field_type.to_string(),
                single_line(&field.label),
                rules_cell(&field.validation_rules),
                flags_cell(form, field, ctx.unicode),
            ]
        })
        .collect()
}

/// One row per field of a preview: label, displayed value, visible message.
pub fn preview_rows(
    ctx: &UiContext,
    session: &PreviewSession,
    shown: &FormValues,
) -> Vec<Vec<String>> {
    session
        .form()
        .fields
        .iter()
        .map(|field| {
            let label = if field.required {
                format!("{} *", single_line(&field.label))
            } else {
                single_line(&field.label)
            };
            let value = shown.get(&field.id).unwrap_or(&FieldValue::Empty);
            let status = match session.error(&field.id) {
                Some(message) => message.to_string(),
                None if field.is_derived => "derived".to_string(),
                None => String::new(),
            };
            vec![
                id_cell(ctx, field.id.as_str()),
                label,
                field.field_type.to_string(),
                truncate(&single_line(&value.to_text()), 40),
                status,
            ]
        })
        .collect()
}
