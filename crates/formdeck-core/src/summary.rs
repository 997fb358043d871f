//! At-a-glance counts for a form.

use serde::Serialize;

use crate::schema::{FieldType, Form};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormSummary {
    pub total_fields: usize,
    pub required_fields: usize,
    pub derived_fields: usize,
    /// Field count per type, in order of first appearance
    pub type_counts: Vec<(FieldType, usize)>,
}

impl FormSummary {
    pub fn of(form: &Form) -> Self {
        let mut type_counts: Vec<(FieldType, usize)> = Vec::new();
        for field in &form.fields {
            match type_counts.iter_mut().find(|(t, _)| *t == field.field_type) {
                Some((_, count)) => *count += 1,
                None => type_counts.push((field.field_type, 1)),
            }
        }

        Self {
            total_fields: form.fields.len(),
            required_fields: form.fields.iter().filter(|f| f.required).count(),
            derived_fields: form.fields.iter().filter(|f| f.is_derived).count(),
            type_counts,
        }
    }

    /// e.g. `2 text, 1 date`
    pub fn type_breakdown(&self) -> String {
        self.type_counts
            .iter()
            .map(|(field_type, count)| format!("{} {}", count, field_type))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
