//! Form mutation engine.
//!
//! [`FormState`] holds the single in-progress form and the saved collection.
//! Every operation runs to completion and either applies, leaves the state
//! unchanged (unknown id, no form in progress), or returns an error without
//! touching anything.

use crate::error::{FormError, Result, SaveRejection};
use crate::patch::{check_field, FieldPatch};
use crate::schema::{FieldId, FieldType, Form, FormField, FormId};

/// Result of a mutation that is allowed to be a silent no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Outcome<T = ()> {
    Applied(T),
    Unchanged,
}

impl<T> Outcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    pub fn applied(self) -> Option<T> {
        match self {
            Self::Applied(value) => Some(value),
            Self::Unchanged => None,
        }
    }
}

/// In-progress form plus the saved collection.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    current: Option<Form>,
    saved: Vec<Form>,
    /// Bumped whenever `saved` changes
    revision: u64,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing saved collection with nothing in progress.
    pub fn with_saved(saved: Vec<Form>) -> Self {
        Self {
            current: None,
            saved,
            revision: 0,
        }
    }

    pub fn current_form(&self) -> Option<&Form> {
        self.current.as_ref()
    }

    pub fn saved_forms(&self) -> &[Form] {
        &self.saved
    }

    pub fn find_saved(&self, id: &FormId) -> Option<&Form> {
        self.saved.iter().find(|form| &form.id == id)
    }

    /// Counter that changes every time the saved collection does.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Put back an in-progress form kept by the host between sessions.
    ///
    /// Field order is renumbered so a hand-edited snapshot cannot break the
    /// order invariant.
    pub fn restore_current(&mut self, form: Option<Form>) {
        self.current = form.map(|mut form| {
            form.renumber();
            form
        });
    }

    /// Create a fresh, empty in-progress form unless one already exists.
    pub fn initialize(&mut self) -> Outcome<FormId> {
        if self.current.is_some() {
            return Outcome::Unchanged;
        }
        let form = Form::new();
        let id = form.id.clone();
        self.current = Some(form);
        Outcome::Applied(id)
    }

    /// Add a field of `field_type`, directly after `after` when that field
    /// exists, otherwise at the end.
    pub fn add_field(
        &mut self,
        field_type: FieldType,
        after: Option<&FieldId>,
    ) -> Outcome<FieldId> {
        let Some(form) = self.current.as_mut() else {
            tracing::debug!("add_field with no form in progress");
            return Outcome::Unchanged;
        };

        let field = FormField::new(field_type);
        let id = field.id.clone();
        match after.and_then(|after| form.position(after)) {
            Some(index) => form.fields.insert(index + 1, field),
            None => form.fields.push(field),
        }
        form.renumber();
        form.touch();
        Outcome::Applied(id)
    }

    /// Merge `patch` into the identified field.
    ///
    /// # Errors
    ///
    /// Returns `FormError::InvalidInput` or `FormError::DependencyCycle` when
    /// the merged field fails [`check_field`]; the form is left untouched.
    pub fn update_field(&mut self, id: &FieldId, patch: &FieldPatch) -> Result<Outcome> {
        let Some(form) = self.current.as_mut() else {
            return Ok(Outcome::Unchanged);
        };
        let Some(index) = form.position(id) else {
            tracing::debug!(field = %id, "update_field: unknown field");
            return Ok(Outcome::Unchanged);
        };

        let mut candidate = form.fields[index].clone();
        patch.apply_to(&mut candidate);
        check_field(form, &candidate)?;

        form.fields[index] = candidate;
        form.touch();
        Ok(Outcome::Applied(()))
    }

    /// Remove the identified field and close the gap in `order`.
    pub fn delete_field(&mut self, id: &FieldId) -> Outcome {
        let Some(form) = self.current.as_mut() else {
            return Outcome::Unchanged;
        };
        let Some(index) = form.position(id) else {
            tracing::debug!(field = %id, "delete_field: unknown field");
            return Outcome::Unchanged;
        };

        form.fields.remove(index);
        for field in &mut form.fields {
            field.parent_fields.retain(|parent| parent != id);
        }
        form.renumber();
        form.touch();
        Outcome::Applied(())
    }

    /// Move the field at position `from` to position `to`.
    ///
    /// # Errors
    ///
    /// Returns `FormError::IndexOutOfRange` if either index is not a valid
    /// position in the current field list.
    pub fn reorder_fields(&mut self, from: usize, to: usize) -> Result<Outcome> {
        let Some(form) = self.current.as_mut() else {
            return Ok(Outcome::Unchanged);
        };
        let len = form.fields.len();
        if let Some(index) = [from, to].into_iter().find(|index| *index >= len) {
            return Err(FormError::IndexOutOfRange { index, len });
        }

        let moved = form.fields.remove(from);
        form.fields.insert(to, moved);
        form.renumber();
        form.touch();
        Ok(Outcome::Applied(()))
    }

    /// Commit the in-progress form to the saved collection under `name`.
    ///
    /// Replaces a saved form with the same id, otherwise appends. The
    /// in-progress slot is cleared on success.
    ///
    /// # Errors
    ///
    /// Returns `FormError::SavePrecondition` when the name is blank, the form
    /// has no fields, or nothing is in progress. State is left untouched.
    pub fn save_form(&mut self, name: &str) -> Result<FormId> {
        let form = self.current.as_ref().ok_or(SaveRejection::NoCurrentForm)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(SaveRejection::MissingName.into());
        }
        if form.fields.is_empty() {
            return Err(SaveRejection::NoFields.into());
        }

        let Some(mut form) = self.current.take() else {
            return Err(SaveRejection::NoCurrentForm.into());
        };
        form.name = name.to_string();
        form.touch();
        let id = form.id.clone();

        match self.saved.iter().position(|saved| saved.id == form.id) {
            Some(index) => self.saved[index] = form,
            None => self.saved.push(form),
        }
        self.revision += 1;
        Ok(id)
    }

    /// Copy a saved form into the in-progress slot.
    pub fn load_form(&mut self, id: &FormId) -> Outcome {
        match self.find_saved(id).cloned() {
            Some(form) => {
                self.current = Some(form);
                Outcome::Applied(())
            }
            None => {
                tracing::debug!(form = %id, "load_form: unknown form");
                Outcome::Unchanged
            }
        }
    }

    /// Drop the in-progress form, if any.
    pub fn clear_current_form(&mut self) -> Outcome {
        match self.current.take() {
            Some(_) => Outcome::Applied(()),
            None => Outcome::Unchanged,
        }
    }

    /// Remove a form from the saved collection.
    pub fn delete_saved_form(&mut self, id: &FormId) -> Outcome {
        let before = self.saved.len();
        self.saved.retain(|form| &form.id != id);
        if self.saved.len() == before {
            return Outcome::Unchanged;
        }
        self.revision += 1;
        Outcome::Applied(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldValue, RuleKind, SelectOption, ValidationRule};
    use crate::validation::evaluate;

    fn state_with_fields(count: usize) -> (FormState, Vec<FieldId>) {
        let mut state = FormState::new();
        let _ = state.initialize();
        let ids = (0..count)
            .map(|_| state.add_field(FieldType::Text, None).applied().unwrap())
            .collect();
        (state, ids)
    }

    fn current_ids(state: &FormState) -> Vec<FieldId> {
        state
            .current_form()
            .unwrap()
            .fields
            .iter()
            .map(|f| f.id.clone())
            .collect()
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let mut state = FormState::new();
        let first = state.initialize().applied().unwrap();
        assert_eq!(state.initialize(), Outcome::Unchanged);
        assert_eq!(state.current_form().unwrap().id, first);
        assert!(state.current_form().unwrap().name.is_empty());
    }

    #[test]
    fn test_add_field_without_form_is_noop() {
        let mut state = FormState::new();
        assert_eq!(state.add_field(FieldType::Text, None), Outcome::Unchanged);
    }

    #[test]
    fn test_add_field_after_inserts_and_renumbers() {
        let (mut state, ids) = state_with_fields(3);
        let new_id = state
            .add_field(FieldType::Radio, Some(&ids[0]))
            .applied()
            .unwrap();

        let form = state.current_form().unwrap();
        assert_eq!(form.fields[1].id, new_id);
        assert_eq!(form.fields[1].label, "New radio field");
        assert!(form.has_contiguous_order());

        let missing = FieldId::from("nope");
        let appended = state
            .add_field(FieldType::Date, Some(&missing))
            .applied()
            .unwrap();
        let form = state.current_form().unwrap();
        assert_eq!(form.fields.last().unwrap().id, appended);
    }

    #[test]
    fn test_mutations_refresh_updated_at() {
        let (mut state, ids) = state_with_fields(1);
        let created = state.current_form().unwrap().created_at;
        let before = state.current_form().unwrap().updated_at;
        std::thread::sleep(std::time::Duration::from_millis(5));
        state
            .update_field(&ids[0], &FieldPatch::new().label("Renamed"))
            .unwrap()
            .applied()
            .unwrap();
        let form = state.current_form().unwrap();
        assert!(form.updated_at > before);
        assert_eq!(form.created_at, created);
    }

    #[test]
    fn test_update_unknown_field_is_noop() {
        let (mut state, _) = state_with_fields(1);
        let snapshot = state.current_form().cloned();
        let outcome = state
            .update_field(&FieldId::from("ghost"), &FieldPatch::new().label("x"))
            .unwrap();
        assert_eq!(outcome, Outcome::Unchanged);
        assert_eq!(state.current_form().cloned(), snapshot);
    }

    #[test]
    fn test_rejected_update_leaves_field_untouched() {
        let (mut state, ids) = state_with_fields(1);
        let snapshot = state.current_form().cloned();
        let patch = FieldPatch::new()
            .label("Changed")
            .options(vec![SelectOption::new("A", "a")]);
        assert!(state.update_field(&ids[0], &patch).is_err());
        assert_eq!(state.current_form().cloned(), snapshot);
    }

    #[test]
    fn test_update_rejects_dependency_cycle() {
        let (mut state, ids) = state_with_fields(2);
        state
            .update_field(
                &ids[0],
                &FieldPatch::new()
                    .derived(true)
                    .parent_fields(vec![ids[1].clone()]),
            )
            .unwrap()
            .applied()
            .unwrap();
        let err = state
            .update_field(
                &ids[1],
                &FieldPatch::new()
                    .derived(true)
                    .parent_fields(vec![ids[0].clone()]),
            )
            .unwrap_err();
        assert!(matches!(err, FormError::DependencyCycle(_)));
    }

    #[test]
    fn test_delete_renumbers() {
        let (mut state, ids) = state_with_fields(4);
        assert!(state.delete_field(&ids[1]).is_applied());
        let form = state.current_form().unwrap();
        assert_eq!(form.fields.len(), 3);
        assert!(form.has_contiguous_order());
        assert_eq!(state.delete_field(&ids[1]), Outcome::Unchanged);
    }

    #[test]
    fn test_delete_parent_keeps_dependents_editable() {
        let (mut state, ids) = state_with_fields(2);
        let (dob, age) = (ids[0].clone(), ids[1].clone());
        let derive = FieldPatch::new()
            .derived(true)
            .parent_fields(vec![dob.clone()])
            .derived_formula(Some("Age from Date of Birth".to_string()));
        state.update_field(&age, &derive).unwrap().applied().unwrap();

        assert!(state.delete_field(&dob).is_applied());
        let field = state.current_form().unwrap().field(&age).unwrap();
        assert!(field.parent_fields.is_empty());

        let outcome = state
            .update_field(&age, &FieldPatch::new().label("Age"))
            .unwrap();
        assert!(outcome.is_applied());
        assert_eq!(state.current_form().unwrap().field(&age).unwrap().label, "Age");
    }

    #[test]
    fn test_reorder_moves_single_item() {
        let (mut state, ids) = state_with_fields(4);
        state.reorder_fields(0, 2).unwrap().applied().unwrap();
        assert_eq!(
            current_ids(&state),
            vec![ids[1].clone(), ids[2].clone(), ids[0].clone(), ids[3].clone()]
        );
        assert!(state.current_form().unwrap().has_contiguous_order());
    }

    #[test]
    fn test_reorder_round_trip() {
        for (i, j) in [(0, 1), (1, 0), (0, 3), (3, 1), (2, 3)] {
            let (mut state, ids) = state_with_fields(4);
            state.reorder_fields(i, j).unwrap().applied().unwrap();
            state.reorder_fields(j, i).unwrap().applied().unwrap();
            assert_eq!(current_ids(&state), ids, "round trip {} <-> {}", i, j);
        }
    }

    #[test]
    fn test_reorder_out_of_range_rejected() {
        let (mut state, ids) = state_with_fields(2);
        let err = state.reorder_fields(0, 2).unwrap_err();
        assert!(matches!(err, FormError::IndexOutOfRange { index: 2, len: 2 }));
        assert!(state.reorder_fields(5, 0).is_err());
        assert_eq!(current_ids(&state), ids);
    }

    #[test]
    fn test_order_invariant_over_mixed_sequence() {
        let (mut state, ids) = state_with_fields(3);
        let steps: Vec<Box<dyn Fn(&mut FormState)>> = vec![
            Box::new(|s: &mut FormState| {
                let _ = s.add_field(FieldType::Number, None);
            }),
            Box::new(|s: &mut FormState| {
                let _ = s.reorder_fields(3, 0);
            }),
            Box::new(move |s: &mut FormState| {
                let _ = s.delete_field(&ids[1]);
            }),
            Box::new(|s: &mut FormState| {
                let first = s.current_form().unwrap().fields[0].id.clone();
                let _ = s.add_field(FieldType::Checkbox, Some(&first));
            }),
            Box::new(|s: &mut FormState| {
                let _ = s.reorder_fields(1, 3);
            }),
        ];
        for step in steps {
            step(&mut state);
            assert!(state.current_form().unwrap().has_contiguous_order());
        }
        assert_eq!(state.current_form().unwrap().fields.len(), 4);
    }

    #[test]
    fn test_save_flow_end_to_end() {
        let mut state = FormState::new();
        let _ = state.initialize();
        let id = state.add_field(FieldType::Text, None).applied().unwrap();
        state
            .update_field(&id, &FieldPatch::new().label("Name").required(true))
            .unwrap()
            .applied()
            .unwrap();

        let before = state.current_form().cloned();
        let err = state.save_form("").unwrap_err();
        assert_eq!(err.to_string(), "Please enter a form name");
        assert_eq!(state.current_form().cloned(), before);
        assert!(state.saved_forms().is_empty());
        assert!(state.save_form("   ").is_err());

        let revision = state.revision();
        state.save_form("My Form").unwrap();
        assert_eq!(state.saved_forms().len(), 1);
        assert_eq!(state.saved_forms()[0].name, "My Form");
        assert!(state.current_form().is_none());
        assert!(state.revision() > revision);
    }

    #[test]
    fn test_save_requires_fields() {
        let mut state = FormState::new();
        let _ = state.initialize();
        let err = state.save_form("Empty").unwrap_err();
        assert!(matches!(
            err,
            FormError::SavePrecondition(SaveRejection::NoFields)
        ));
        assert!(state.current_form().is_some());
    }

    #[test]
    fn test_save_without_current_form() {
        let mut state = FormState::new();
        assert!(matches!(
            state.save_form("Anything"),
            Err(FormError::SavePrecondition(SaveRejection::NoCurrentForm))
        ));
    }

    #[test]
    fn test_load_copies_and_save_upserts() {
        let (mut state, _) = state_with_fields(1);
        let form_id = state.save_form("Original").unwrap();

        assert!(state.load_form(&form_id).is_applied());
        let _ = state.add_field(FieldType::Number, None);
        // saved copy unaffected by edits in progress
        assert_eq!(state.find_saved(&form_id).unwrap().fields.len(), 1);

        state.save_form("Edited").unwrap();
        assert_eq!(state.saved_forms().len(), 1);
        let saved = state.find_saved(&form_id).unwrap();
        assert_eq!(saved.name, "Edited");
        assert_eq!(saved.fields.len(), 2);
    }

    #[test]
    fn test_load_unknown_form_is_noop() {
        let mut state = FormState::new();
        assert_eq!(state.load_form(&FormId::from("missing")), Outcome::Unchanged);
        assert!(state.current_form().is_none());
    }

    #[test]
    fn test_clear_and_delete_saved() {
        let (mut state, _) = state_with_fields(1);
        let form_id = state.save_form("One").unwrap();
        let _ = state.load_form(&form_id);
        assert!(state.clear_current_form().is_applied());
        assert_eq!(state.clear_current_form(), Outcome::Unchanged);

        assert!(state.delete_saved_form(&form_id).is_applied());
        assert!(state.saved_forms().is_empty());
        assert_eq!(state.delete_saved_form(&form_id), Outcome::Unchanged);
    }

    #[test]
    fn test_updated_rules_flow_into_evaluation() {
        let (mut state, ids) = state_with_fields(1);
        let patch = FieldPatch::new()
            .required(true)
            .validation_rules(vec![ValidationRule::new(RuleKind::Required)]);
        state.update_field(&ids[0], &patch).unwrap().applied().unwrap();

        let field = state.current_form().unwrap().field(&ids[0]).unwrap();
        assert!(evaluate(field, &FieldValue::text("")).is_some());
    }
}
