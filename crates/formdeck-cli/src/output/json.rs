//! JSON output shapes.

use formdeck_core::{Form, FormSummary, FormValues, PreviewSession};

/// A saved form as listed, with its counts.
pub fn form_listing_json(form: &Form) -> serde_json::Value {
    let summary = FormSummary::of(form);
    serde_json::json!({
        "id": form.id,
        "name": form.name,
        "created_at": form.created_at,
        "updated_at": form.updated_at,
        "summary": summary_json(&summary),
    })
}

pub fn summary_json(summary: &FormSummary) -> serde_json::Value {
    let type_counts: serde_json::Map<String, serde_json::Value> = summary
        .type_counts
        .iter()
        .map(|(field_type, count)| (field_type.to_string(), serde_json::json!(count)))
        .collect();
    serde_json::json!({
        "total_fields": summary.total_fields,
        "required_fields": summary.required_fields,
        "derived_fields": summary.derived_fields,
        "type_counts": type_counts,
    })
}

/// Preview state: each field's displayed value and visible message.
pub fn preview_json(session: &PreviewSession, shown: &FormValues) -> serde_json::Value {
    let form = session.form();
    let fields: Vec<serde_json::Value> = form
        .fields
        .iter()
        .map(|field| {
            serde_json::json!({
                "id": field.id,
                "label": field.label,
                "type": field.field_type,
                "required": field.required,
                "derived": field.is_derived,
                "value": shown.get(&field.id),
                "error": session.error(&field.id),
            })
        })
        .collect();
    serde_json::json!({
        "form": { "id": form.id, "name": form.name },
        "fields": fields,
        "summary": summary_json(&FormSummary::of(form)),
        "valid": session.is_valid(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use formdeck_core::{FieldType, FieldValue, FormField, RuleKind, ValidationRule};

    #[test]
    fn test_listing_counts_by_type() {
        let mut form = Form::new();
        form.name = "Contact".to_string();
        form.fields = vec![
            FormField::new(FieldType::Text),
            FormField::new(FieldType::Text),
            FormField::new(FieldType::Date),
        ];

        let value = form_listing_json(&form);
        assert_eq!(value["name"], "Contact");
        assert_eq!(value["summary"]["total_fields"], 3);
        assert_eq!(value["summary"]["type_counts"]["text"], 2);
        assert_eq!(value["summary"]["type_counts"]["date"], 1);
    }

    #[test]
    fn test_preview_reports_touched_errors_only() {
        let mut name = FormField::new(FieldType::Text);
        name.validation_rules.push(ValidationRule::new(RuleKind::Required));
        let mut nick = FormField::new(FieldType::Text);
        nick.validation_rules.push(ValidationRule::new(RuleKind::Required));
        let mut form = Form::new();
        form.fields = vec![name.clone(), nick];

        let mut session = PreviewSession::new(&form);
        session.change(&name.id, FieldValue::text(""));
        let shown = session.display_values();

        let value = preview_json(&session, &shown);
        assert_eq!(value["valid"], false);
        assert_eq!(value["fields"][0]["error"], "This field is required");
        assert!(value["fields"][1]["error"].is_null());
        assert_eq!(value["fields"][0]["value"], "");
    }
}
