//! Derived-field resolution.
//!
//! A derived field's formula is free text matched against a small closed set
//! of patterns. Only one pattern is recognized today (age from a date of
//! birth); any other formula is echoed back as the displayed value.

use std::collections::HashSet;

use chrono::{Datelike, Local, NaiveDate};

use crate::schema::{FieldId, FieldValue, Form, FormField, FormValues};

/// Resolve a field's displayed value as of today's local date.
pub fn resolve(field: &FormField, values: &FormValues) -> FieldValue {
    resolve_at(field, values, Local::now().date_naive())
}

/// Resolve a field's displayed value as of `today`.
///
/// Non-derived fields, and derived fields missing parents or a formula, pass
/// their own value from `values` through unchanged.
pub fn resolve_at(field: &FormField, values: &FormValues, today: NaiveDate) -> FieldValue {
    if !field.derives_value() {
        return own_value(field, values);
    }
    let formula = field.derived_formula.as_deref().unwrap_or_default();

    if is_age_formula(formula) {
        let birth = field
            .parent_fields
            .first()
            .and_then(|parent| values.get(parent))
            .and_then(FieldValue::as_date);
        if let Some(birth) = birth {
            return FieldValue::Number(f64::from(age_on(birth, today)));
        }
    }

    FieldValue::text(formula)
}

/// Displayed values for every field of `form`, in field order.
///
/// Derived parents are resolved before their children. A field reached again
/// while its own parents are being resolved falls back to pass-through.
pub fn resolve_all(form: &Form, values: &FormValues, today: NaiveDate) -> FormValues {
    let mut resolver = ChainResolver {
        form,
        values,
        today,
        resolved: FormValues::with_capacity(form.fields.len()),
        visiting: HashSet::new(),
    };
    for field in &form.fields {
        resolver.resolve(field);
    }
    resolver.resolved
}

struct ChainResolver<'a> {
    form: &'a Form,
    values: &'a FormValues,
    today: NaiveDate,
    resolved: FormValues,
    visiting: HashSet<&'a FieldId>,
}

impl<'a> ChainResolver<'a> {
    fn resolve(&mut self, field: &'a FormField) -> FieldValue {
        if let Some(done) = self.resolved.get(&field.id) {
            return done.clone();
        }
        if !field.derives_value() {
            let value = own_value(field, self.values);
            self.resolved.insert(field.id.clone(), value.clone());
            return value;
        }
        if !self.visiting.insert(&field.id) {
            tracing::debug!(field = %field.id, "derivation cycle; passing value through");
            return own_value(field, self.values);
        }

        let form = self.form;
        let mut parents = FormValues::with_capacity(field.parent_fields.len());
        for parent_id in &field.parent_fields {
            let value = match form.field(parent_id) {
                Some(parent) if parent.derives_value() => self.resolve(parent),
                _ => self.values.get(parent_id).cloned().unwrap_or_default(),
            };
            parents.insert(parent_id.clone(), value);
        }

        let value = resolve_at(field, &parents, self.today);
        self.visiting.remove(&field.id);
        self.resolved.insert(field.id.clone(), value.clone());
        value
    }
}

fn own_value(field: &FormField, values: &FormValues) -> FieldValue {
    values.get(&field.id).cloned().unwrap_or_default()
}

fn is_age_formula(formula: &str) -> bool {
    let lower = formula.to_lowercase();
    lower.contains("age") && lower.contains("date")
}

/// Whole calendar years between `birth` and `today`.
fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}
