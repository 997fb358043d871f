//! Typed partial updates for form fields.
//!
//! A [`FieldPatch`] names only the attributes it changes. After it is merged
//! into a copy of the field, [`check_field`] verifies the result still makes
//! sense for the field's type and its place in the form before the editor
//! commits it.

use std::collections::HashSet;

use crate::error::{FormError, Result};
use crate::schema::{
    FieldId, FieldType, FieldValue, Form, FormField, RuleKind, SelectOption, ValidationRule,
};

/// Attribute changes for one field. `None` leaves an attribute as it is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldPatch {
    pub field_type: Option<FieldType>,
    pub label: Option<String>,
    pub placeholder: Option<String>,
    pub required: Option<bool>,
    pub validation_rules: Option<Vec<ValidationRule>>,
    pub is_derived: Option<bool>,
    pub parent_fields: Option<Vec<FieldId>>,
    /// `Some(None)` clears the formula
    pub derived_formula: Option<Option<String>>,
    pub options: Option<Vec<SelectOption>>,
    /// `Some(None)` clears the default value
    pub default_value: Option<Option<FieldValue>>,
}

impl FieldPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field_type(mut self, field_type: FieldType) -> Self {
        self.field_type = Some(field_type);
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn validation_rules(mut self, rules: Vec<ValidationRule>) -> Self {
        self.validation_rules = Some(rules);
        self
    }

    pub fn derived(mut self, is_derived: bool) -> Self {
        self.is_derived = Some(is_derived);
        self
    }

    pub fn parent_fields(mut self, parents: Vec<FieldId>) -> Self {
        self.parent_fields = Some(parents);
        self
    }

    pub fn derived_formula(mut self, formula: Option<String>) -> Self {
        self.derived_formula = Some(formula);
        self
    }

    pub fn options(mut self, options: Vec<SelectOption>) -> Self {
        self.options = Some(options);
        self
    }

    pub fn default_value(mut self, value: Option<FieldValue>) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Merge these changes into `field`.
    ///
    /// Switching to a type without options drops any options the field had.
    pub fn apply_to(&self, field: &mut FormField) {
        if let Some(field_type) = self.field_type {
            field.field_type = field_type;
            if !field_type.has_options() {
                field.options.clear();
            }
        }
        if let Some(label) = &self.label {
            field.label = label.clone();
        }
        if let Some(placeholder) = &self.placeholder {
            field.placeholder = placeholder.clone();
        }
        if let Some(required) = self.required {
            field.required = required;
        }
        if let Some(rules) = &self.validation_rules {
            field.validation_rules = rules.clone();
        }
        if let Some(is_derived) = self.is_derived {
            field.is_derived = is_derived;
        }
        if let Some(parents) = &self.parent_fields {
            field.parent_fields = parents.clone();
        }
        if let Some(formula) = &self.derived_formula {
            field.derived_formula = formula.clone();
        }
        if let Some(options) = &self.options {
            field.options = options.clone();
        }
        if let Some(value) = &self.default_value {
            field.default_value = value.clone();
        }
    }
}

/// Check a merged `field` against its type and against `form`.
///
/// `field` is treated as replacing the form's field with the same id.
pub fn check_field(form: &Form, field: &FormField) -> Result<()> {
    if !field.options.is_empty() && !field.field_type.has_options() {
        return Err(FormError::InvalidInput(format!(
            "Options are only allowed on select and radio fields, not {}",
            field.field_type
        )));
    }

    for rule in &field.validation_rules {
        if matches!(rule.kind, RuleKind::MinLength | RuleKind::MaxLength) {
            if let Some(param) = &rule.value {
                if param.as_number().is_none() {
                    return Err(FormError::InvalidInput(format!(
                        "{} needs a numeric value, got '{}'",
                        rule.kind, param
                    )));
                }
            }
        }
    }

    if field.parent_fields.contains(&field.id) {
        return Err(FormError::InvalidInput(
            "A field cannot depend on itself".to_string(),
        ));
    }
    // Parents the stored field already lists are not re-checked, so a stale
    // reference does not block unrelated edits.
    let existing = form
        .field(&field.id)
        .map(|stored| stored.parent_fields.as_slice())
        .unwrap_or(&[]);
    if let Some(unknown) = field
        .parent_fields
        .iter()
        .find(|p| form.field(p).is_none() && !existing.contains(p))
    {
        return Err(FormError::InvalidInput(format!(
            "Unknown parent field '{}'",
            unknown
        )));
    }

    if field.is_derived {
        if let Some(cycle) = find_cycle(form, field) {
            let path = cycle
                .iter()
                .map(|id| id.as_str())
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(FormError::DependencyCycle(path));
        }
    }

    Ok(())
}

/// Parents that `id` depends on, with `candidate` standing in for its id.
fn dependencies<'a>(form: &'a Form, candidate: &'a FormField, id: &FieldId) -> &'a [FieldId] {
    if id == &candidate.id {
        return &candidate.parent_fields;
    }
    match form.field(id) {
        Some(field) if field.is_derived => &field.parent_fields,
        _ => &[],
    }
}

/// A dependency path from `candidate` back to itself, if one exists.
fn find_cycle<'a>(form: &'a Form, candidate: &'a FormField) -> Option<Vec<&'a FieldId>> {
    let mut visited: HashSet<&'a FieldId> = HashSet::new();
    let mut stack: Vec<Vec<&'a FieldId>> = vec![vec![&candidate.id]];

    while let Some(path) = stack.pop() {
        let last = path[path.len() - 1];
        for next in dependencies(form, candidate, last) {
            if next == &candidate.id {
                let mut cycle = path.clone();
                cycle.push(next);
                return Some(cycle);
            }
            if visited.insert(next) {
                let mut extended = path.clone();
                extended.push(next);
                stack.push(extended);
            }
        }
    }
    None
}
