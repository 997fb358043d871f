//! Preview sessions: live values, touched state, and messages for one form.
//!
//! A session is ephemeral. It copies the form it previews so edits to the
//! in-progress form do not shift values under an open preview.

use std::collections::{HashMap, HashSet};

use chrono::{Local, NaiveDate};

use crate::derive::resolve_all;
use crate::schema::{FieldId, FieldType, FieldValue, Form, FormField, FormValues};
use crate::validation::{evaluate, validate_form};

/// Value a field starts with when a preview opens.
///
/// The field's default value when set; otherwise unchecked for checkboxes,
/// the first option for choice fields, and empty for everything else.
pub fn initial_value(field: &FormField) -> FieldValue {
    if let Some(default) = &field.default_value {
        return default.clone();
    }
    match field.field_type {
        FieldType::Checkbox => FieldValue::Bool(false),
        FieldType::Select | FieldType::Radio => field
            .options
            .first()
            .map(|option| FieldValue::text(option.value.clone()))
            .unwrap_or_else(|| FieldValue::text("")),
        _ => FieldValue::text(""),
    }
}

#[derive(Debug, Clone)]
pub struct PreviewSession {
    form: Form,
    values: FormValues,
    touched: HashSet<FieldId>,
    errors: HashMap<FieldId, String>,
}

impl PreviewSession {
    pub fn new(form: &Form) -> Self {
        let values = form
            .fields
            .iter()
            .map(|field| (field.id.clone(), initial_value(field)))
            .collect();
        Self {
            form: form.clone(),
            values,
            touched: HashSet::new(),
            errors: HashMap::new(),
        }
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    /// Stored value for a field, before derivation.
    pub fn value(&self, id: &FieldId) -> Option<&FieldValue> {
        self.values.get(id)
    }

    /// Record a new value for a field and re-validate it.
    ///
    /// Returns `false` for unknown ids and derived fields, whose input is
    /// disabled.
    pub fn change(&mut self, id: &FieldId, value: FieldValue) -> bool {
        let Some(field) = self.form.field(id) else {
            return false;
        };
        if field.is_derived {
            return false;
        }
        let message = evaluate(field, &value);
        self.values.insert(id.clone(), value);
        self.touched.insert(id.clone());
        self.set_error(id, message);
        true
    }

    /// Mark a field touched and validate what it currently holds.
    pub fn blur(&mut self, id: &FieldId) {
        let Some(field) = self.form.field(id) else {
            return;
        };
        self.touched.insert(id.clone());
        if !field.is_derived {
            let value = self.values.get(id).unwrap_or(&FieldValue::Empty);
            let message = evaluate(field, value);
            self.set_error(id, message);
        }
    }

    pub fn is_touched(&self, id: &FieldId) -> bool {
        self.touched.contains(id)
    }

    /// Message to show for a field: only once it has been touched.
    pub fn error(&self, id: &FieldId) -> Option<&str> {
        if !self.is_touched(id) {
            return None;
        }
        self.errors.get(id).map(String::as_str)
    }

    /// Displayed values for every field as of today.
    pub fn display_values(&self) -> FormValues {
        self.display_values_at(Local::now().date_naive())
    }

    /// Displayed values for every field as of `today`.
    pub fn display_values_at(&self, today: NaiveDate) -> FormValues {
        resolve_all(&self.form, &self.values, today)
    }

    /// Touch every field and validate the whole form.
    ///
    /// Returns the first message of each failing field, in field order.
    pub fn submit(&mut self) -> Vec<(FieldId, String)> {
        let failures = validate_form(&self.form, &self.values);
        self.touched = self.form.fields.iter().map(|f| f.id.clone()).collect();
        self.errors = failures.iter().cloned().collect();
        failures
    }

    pub fn is_valid(&self) -> bool {
        validate_form(&self.form, &self.values).is_empty()
    }

    fn set_error(&mut self, id: &FieldId, message: Option<String>) {
        match message {
            Some(message) => {
                self.errors.insert(id.clone(), message);
            }
            None => {
                self.errors.remove(id);
            }
        }
    }
}
