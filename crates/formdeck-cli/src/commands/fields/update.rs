use formdeck_core::{FieldId, FieldPatch, Form, FormField, Outcome, RuleKind, ValidationRule};

use crate::app::AppContext;
use crate::cli::FieldUpdateArgs;
use crate::helpers::{
    parse_bool, parse_default, parse_field_type, parse_option, parse_rule, resolve_field_id,
};
use crate::ui::{id_cell, print, print_warning, receipt};

pub fn handle_update(ctx: &AppContext, args: &FieldUpdateArgs) -> anyhow::Result<()> {
    let mut workspace = ctx.open_workspace()?;
    let form = workspace.require_current()?;
    let field_id = resolve_field_id(form, &args.id)?;

    let ui_ctx = ctx.ui_context();
    let Some(field) = form.field(&field_id) else {
        if ui_ctx.mode.is_json() {
            println!("null");
        }
        print_warning(
            &ui_ctx,
            &format!("No field '{}' in the form; nothing changed", args.id),
        );
        return Ok(());
    };

    let mut patch = build_patch(field, args)?;
    if let Some(parents) = parent_ids(form, &args.parents)? {
        patch = patch.parent_fields(parents);
    }
    if patch.is_empty() {
        return Err(anyhow::anyhow!(
            "Nothing to update.\nHint: Pass at least one of --label, --required, --rule, --option, ..."
        ));
    }

    let outcome = workspace.apply(|state| state.update_field(&field_id, &patch))?;
    let updated = workspace
        .current_form()
        .and_then(|form| form.field(&field_id))
        .cloned();
    workspace.finish()?;

    let (Outcome::Applied(()), Some(field)) = (outcome, updated) else {
        print_warning(&ui_ctx, "Field was not changed");
        return Ok(());
    };

    if ui_ctx.mode.is_json() {
        println!("{}", serde_json::to_string_pretty(&field)?);
        return Ok(());
    }

    if !ctx.quiet() {
        let id = id_cell(&ui_ctx, field.id.as_str());
        let rules = field.validation_rules.len().to_string();
        print(
            &ui_ctx,
            &receipt(
                &ui_ctx,
                "Updated field",
                &[
                    ("ID", id.as_str()),
                    ("Type", field.field_type.as_str()),
                    ("Label", field.label.as_str()),
                    ("Rules", rules.as_str()),
                ],
            ),
        );
    }
    Ok(())
}

/// Translate flags into a patch against the field's current state.
///
/// New rules are appended to the existing list unless `--clear-rules` is
/// given. Marking a field required also adds a `required` rule when the
/// field has none, since only rules produce messages.
fn build_patch(field: &FormField, args: &FieldUpdateArgs) -> anyhow::Result<FieldPatch> {
    let mut patch = FieldPatch::new();

    let field_type = match &args.field_type {
        Some(raw) => {
            let field_type = parse_field_type(raw)?;
            patch = patch.field_type(field_type);
            field_type
        }
        None => field.field_type,
    };
    if let Some(label) = &args.label {
        patch = patch.label(label.as_str());
    }
    if let Some(placeholder) = &args.placeholder {
        patch = patch.placeholder(placeholder.as_str());
    }

    let required = args.required.as_deref().map(parse_bool).transpose()?;
    if let Some(required) = required {
        patch = patch.required(required);
    }
    if let Some(derived) = args.derived.as_deref().map(parse_bool).transpose()? {
        patch = patch.derived(derived);
    }
    if let Some(formula) = &args.formula {
        let formula = Some(formula.trim().to_string()).filter(|f| !f.is_empty());
        patch = patch.derived_formula(formula);
    }

    if !args.options.is_empty() {
        let options = args
            .options
            .iter()
            .map(|raw| parse_option(raw))
            .collect::<anyhow::Result<Vec<_>>>()?;
        patch = patch.options(options);
    }

    let mut rules = if args.clear_rules {
        Vec::new()
    } else {
        field.validation_rules.clone()
    };
    for raw in &args.rules {
        rules.push(parse_rule(raw)?);
    }
    if required == Some(true) && !rules.iter().any(|rule| rule.kind == RuleKind::Required) {
        rules.insert(0, ValidationRule::new(RuleKind::Required));
    }
    if args.clear_rules || rules != field.validation_rules {
        patch = patch.validation_rules(rules);
    }

    if let Some(raw) = &args.default {
        patch = patch.default_value(parse_default(field_type, raw)?);
    }

    Ok(patch)
}

fn parent_ids(form: &Form, inputs: &[String]) -> anyhow::Result<Option<Vec<FieldId>>> {
    if inputs.is_empty() {
        return Ok(None);
    }
    inputs
        .iter()
        .map(|input| resolve_field_id(form, input))
        .collect::<anyhow::Result<Vec<_>>>()
        .map(Some)
}
