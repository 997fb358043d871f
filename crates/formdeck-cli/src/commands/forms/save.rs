use crate::app::AppContext;
use crate::cli::SaveArgs;
use crate::ui::{blank_line, hint, id_cell, print, receipt};

pub fn handle_save(ctx: &AppContext, args: &SaveArgs) -> anyhow::Result<()> {
    let mut workspace = ctx.open_workspace()?;
    let form_id = workspace.apply(|state| state.save_form(&args.name))?;
    let form = workspace
        .find_saved(&form_id)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Saved form {} disappeared", form_id))?;
    workspace.finish()?;

    let ui_ctx = ctx.ui_context();
    if ui_ctx.mode.is_json() {
        println!("{}", serde_json::to_string_pretty(&form)?);
        return Ok(());
    }

    if !ctx.quiet() {
        let fields = form.fields.len().to_string();
        print(
            &ui_ctx,
            &receipt(
                &ui_ctx,
                "Saved form",
                &[
                    ("ID", id_cell(&ui_ctx, form.id.as_str()).as_str()),
                    ("Name", form.name.as_str()),
                    ("Fields", fields.as_str()),
                ],
            ),
        );
        blank_line(&ui_ctx);
        print(
            &ui_ctx,
            &hint(
                &ui_ctx,
                &format!(
                    "formdeck preview {}  \u{00B7}  formdeck list",
                    id_cell(&ui_ctx, form.id.as_str())
                ),
            ),
        );
    }
    Ok(())
}
