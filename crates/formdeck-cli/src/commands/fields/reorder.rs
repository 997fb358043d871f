use crate::app::AppContext;
use crate::cli::FieldMoveArgs;
use crate::ui::{id_cell, print, receipt};

pub fn handle_move(ctx: &AppContext, args: &FieldMoveArgs) -> anyhow::Result<()> {
    let mut workspace = ctx.open_workspace()?;
    workspace.require_current()?;

    let _ = workspace.apply(|state| state.reorder_fields(args.from, args.to))?;
    let form = workspace.require_current()?.clone();
    workspace.finish()?;

    let ui_ctx = ctx.ui_context();
    if ui_ctx.mode.is_json() {
        let order: Vec<_> = form.fields.iter().map(|field| &field.id).collect();
        let output = serde_json::json!({ "order": order });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if !ctx.quiet() {
        let moved = &form.fields[args.to];
        let id = id_cell(&ui_ctx, moved.id.as_str());
        let from = args.from.to_string();
        let to = args.to.to_string();
        print(
            &ui_ctx,
            &receipt(
                &ui_ctx,
                "Moved field",
                &[
                    ("ID", id.as_str()),
                    ("Label", moved.label.as_str()),
                    ("From", from.as_str()),
                    ("To", to.as_str()),
                ],
            ),
        );
    }
    Ok(())
}
