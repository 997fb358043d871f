use formdeck_core::Outcome;

use crate::app::AppContext;
use crate::ui::{blank_line, hint, id_cell, print, print_warning, receipt};

pub fn handle_new(ctx: &AppContext) -> anyhow::Result<()> {
    let mut workspace = ctx.open_workspace()?;
    let outcome = workspace.apply(|state| state.initialize());
    let form_id = workspace.require_current()?.id.clone();
    workspace.finish()?;

    let ui_ctx = ctx.ui_context();
    if ui_ctx.mode.is_json() {
        let output = serde_json::json!({
            "id": form_id,
            "created": outcome.is_applied(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    match outcome {
        Outcome::Applied(_) => {
            if !ctx.quiet() {
                let id = id_cell(&ui_ctx, form_id.as_str());
                print(
                    &ui_ctx,
                    &receipt(&ui_ctx, "Started a new form", &[("ID", id.as_str())]),
                );
                blank_line(&ui_ctx);
                print(&ui_ctx, &hint(&ui_ctx, "formdeck field add text"));
            }
        }
        Outcome::Unchanged => {
            print_warning(&ui_ctx, "A form is already in progress; keeping it");
            if !ctx.quiet() {
                print(&ui_ctx, &hint(&ui_ctx, "formdeck show  \u{00B7}  formdeck clear"));
            }
        }
    }
    Ok(())
}
