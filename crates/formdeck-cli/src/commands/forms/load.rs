use formdeck_core::Outcome;

use crate::app::AppContext;
use crate::cli::LoadArgs;
use crate::helpers::resolve_form_id;
use crate::ui::{id_cell, print, print_warning, receipt};

pub fn handle_load(ctx: &AppContext, args: &LoadArgs) -> anyhow::Result<()> {
    let mut workspace = ctx.open_workspace()?;
    let form_id = resolve_form_id(workspace.saved_forms(), &args.id)?;
    let outcome = workspace.apply(|state| state.load_form(&form_id));
    let loaded = workspace.current_form().cloned();
    workspace.finish()?;

    let ui_ctx = ctx.ui_context();
    match (outcome, loaded) {
        (Outcome::Applied(()), Some(form)) => {
            if ui_ctx.mode.is_json() {
                println!("{}", serde_json::to_string_pretty(&form)?);
            } else if !ctx.quiet() {
                let fields = form.fields.len().to_string();
                print(
                    &ui_ctx,
                    &receipt(
                        &ui_ctx,
                        "Loaded form",
                        &[
                            ("ID", id_cell(&ui_ctx, form.id.as_str()).as_str()),
                            ("Name", form.name.as_str()),
                            ("Fields", fields.as_str()),
                        ],
                    ),
                );
            }
        }
        _ => {
            if ui_ctx.mode.is_json() {
                println!("null");
            }
            print_warning(
                &ui_ctx,
                &format!("No saved form '{}'; nothing loaded", args.id),
            );
        }
    }
    Ok(())
}
