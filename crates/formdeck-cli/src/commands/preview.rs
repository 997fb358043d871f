use formdeck_core::{FormSummary, PreviewSession};

use crate::app::AppContext;
use crate::cli::PreviewArgs;
use crate::helpers::{parse_assignment, parse_value, resolve_field_ref, resolve_form_id};
use crate::output::{preview_json, preview_rows};
use crate::ui::{
    badge, blank_line, display_name, header, kv, print, print_warning, table, Badge, Column,
};

const PREVIEW_COLUMNS: [Column; 5] = [
    Column::new("ID"),
    Column::new("Field"),
    Column::new("Type"),
    Column::new("Value"),
    Column::new("Message"),
];

pub fn handle_preview(ctx: &AppContext, args: &PreviewArgs) -> anyhow::Result<()> {
    let workspace = ctx.open_workspace()?;
    let form = match &args.id {
        Some(input) => {
            let form_id = resolve_form_id(workspace.saved_forms(), input)?;
            workspace
                .find_saved(&form_id)
                .ok_or_else(|| anyhow::anyhow!("No saved form '{}'", input))?
        }
        None => workspace.require_current()?,
    };
    let ui_ctx = ctx.ui_context();

    let mut session = PreviewSession::new(form);
    for assignment in &args.set {
        let (field_ref, raw) = parse_assignment(assignment)?;
        let field_id = resolve_field_ref(form, field_ref)?;
        let Some(field) = form.field(&field_id) else {
            print_warning(&ui_ctx, &format!("No field '{}'; value ignored", field_ref));
            continue;
        };
        let value = parse_value(field.field_type, raw)?;
        if !session.change(&field_id, value) {
            print_warning(
                &ui_ctx,
                &format!("'{}' is derived; its value is computed", field.label),
            );
        }
    }

    let failures = if args.submit {
        session.submit()
    } else {
        Vec::new()
    };
    let shown = session.display_values();

    if ui_ctx.mode.is_json() {
        println!(
            "{}",
            serde_json::to_string_pretty(&preview_json(&session, &shown))?
        );
    } else if !ctx.quiet() {
        let summary = FormSummary::of(form);
        print(&ui_ctx, &header(&ui_ctx, "preview", Some(display_name(&form.name))));
        blank_line(&ui_ctx);
        let rows = preview_rows(&ui_ctx, &session, &shown);
        print(&ui_ctx, &table(&ui_ctx, &PREVIEW_COLUMNS, &rows));
        blank_line(&ui_ctx);
        for (key, count) in [
            ("Total Fields", summary.total_fields),
            ("Required Fields", summary.required_fields),
            ("Derived Fields", summary.derived_fields),
        ] {
            print(&ui_ctx, &kv(&ui_ctx, key, &count.to_string()));
        }
        if args.submit && failures.is_empty() {
            blank_line(&ui_ctx);
            print(&ui_ctx, &badge(&ui_ctx, Badge::Ok, "All fields are valid"));
        }
    }

    if !failures.is_empty() {
        return Err(anyhow::anyhow!(
            "{} field(s) failed validation",
            failures.len()
        ));
    }
    Ok(())
}
