//! Resolve user-typed ids and prefixes to stored ids.
//!
//! An exact id always wins. Otherwise a prefix matching exactly one id is
//! expanded; several matches are an error. Input matching nothing is passed
//! through unchanged so the core reports it as an unknown id.

use formdeck_core::{FieldId, Form, FormId};

fn resolve_prefix<'a>(
    ids: impl Iterator<Item = &'a str> + Clone,
    input: &str,
    kind: &str,
) -> anyhow::Result<String> {
    let input = input.trim();
    if input.is_empty() {
        return Err(anyhow::anyhow!("Empty {} id", kind));
    }
    if ids.clone().any(|id| id == input) {
        return Ok(input.to_string());
    }

    let matches: Vec<&str> = ids.filter(|id| id.starts_with(input)).collect();
    match matches.as_slice() {
        [] => Ok(input.to_string()),
        [only] => Ok((*only).to_string()),
        many => Err(anyhow::anyhow!(
            "Ambiguous {} id '{}' matches {} {}s.\nHint: Type more characters of the id.",
            kind,
            input,
            many.len(),
            kind
        )),
    }
}

/// Resolve a field of `form` by id or unique id prefix.
pub fn resolve_field_id(form: &Form, input: &str) -> anyhow::Result<FieldId> {
    resolve_prefix(form.fields.iter().map(|f| f.id.as_str()), input, "field").map(FieldId::from)
}

/// Resolve a field by id, unique id prefix, or (case-insensitive) unique label.
pub fn resolve_field_ref(form: &Form, input: &str) -> anyhow::Result<FieldId> {
    let id = resolve_field_id(form, input)?;
    if form.field(&id).is_some() {
        return Ok(id);
    }

    let wanted = input.trim().to_lowercase();
    let by_label: Vec<&FieldId> = form
        .fields
        .iter()
        .filter(|f| f.label.trim().to_lowercase() == wanted)
        .map(|f| &f.id)
        .collect();
    match by_label.as_slice() {
        [only] => Ok((*only).clone()),
        [] => Ok(id),
        _ => Err(anyhow::anyhow!(
            "Several fields are labelled '{}'.\nHint: Use the field id instead.",
            input.trim()
        )),
    }
}

/// Resolve a saved form by id or unique id prefix.
pub fn resolve_form_id(forms: &[Form], input: &str) -> anyhow::Result<FormId> {
    resolve_prefix(forms.iter().map(|f| f.id.as_str()), input, "form").map(FormId::from)
}
