use crate::app::AppContext;
use crate::cli::FieldAddArgs;
use crate::helpers::{parse_field_type, resolve_field_id};
use crate::ui::{blank_line, hint, id_cell, print, print_warning, receipt};

pub fn handle_add(ctx: &AppContext, args: &FieldAddArgs) -> anyhow::Result<()> {
    let field_type = parse_field_type(&args.field_type)?;
    let mut workspace = ctx.open_workspace()?;
    let form = workspace.require_current()?;

    let after = args
        .after
        .as_deref()
        .map(|input| resolve_field_id(form, input))
        .transpose()?;
    let after_missing = after.as_ref().is_some_and(|id| form.field(id).is_none());

    let field_id = workspace
        .apply(|state| state.add_field(field_type, after.as_ref()))
        .applied()
        .ok_or_else(|| anyhow::anyhow!("No form in progress"))?;
    let field = workspace
        .current_form()
        .and_then(|form| form.field(&field_id))
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Field {} was not added", field_id))?;
    workspace.finish()?;

    let ui_ctx = ctx.ui_context();
    if after_missing {
        if let Some(after) = &args.after {
            print_warning(&ui_ctx, &format!("No field '{}'; added at the end", after));
        }
    }

    if ui_ctx.mode.is_json() {
        println!("{}", serde_json::to_string_pretty(&field)?);
        return Ok(());
    }

    if !ctx.quiet() {
        let id = id_cell(&ui_ctx, field.id.as_str());
        let position = field.order.to_string();
        print(
            &ui_ctx,
            &receipt(
                &ui_ctx,
                "Added field",
                &[
                    ("ID", id.as_str()),
                    ("Type", field.field_type.as_str()),
                    ("Label", field.label.as_str()),
                    ("Position", position.as_str()),
                ],
            ),
        );
        blank_line(&ui_ctx);
        print(
            &ui_ctx,
            &hint(
                &ui_ctx,
                &format!("formdeck field update {} --label <LABEL>", id),
            ),
        );
    }
    Ok(())
}
