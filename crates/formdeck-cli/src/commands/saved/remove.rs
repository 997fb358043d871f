use dialoguer::Confirm;
use formdeck_core::Outcome;

use crate::app::AppContext;
use crate::cli::RemoveArgs;
use crate::helpers::resolve_form_id;
use crate::ui::{badge, display_name, print, print_warning, Badge, OutputMode};

pub fn handle_remove(ctx: &AppContext, args: &RemoveArgs) -> anyhow::Result<()> {
    let mut workspace = ctx.open_workspace()?;
    let form_id = resolve_form_id(workspace.saved_forms(), &args.id)?;
    let ui_ctx = ctx.ui_context();

    let Some(name) = workspace
        .find_saved(&form_id)
        .map(|form| display_name(&form.name).to_string())
    else {
        if ui_ctx.mode.is_json() {
            println!("{}", serde_json::json!({ "id": form_id, "deleted": false }));
        }
        print_warning(
            &ui_ctx,
            &format!("No saved form '{}'; nothing removed", args.id),
        );
        return Ok(());
    };

    if !args.yes {
        if !ui_ctx.is_interactive() {
            return Err(anyhow::anyhow!(
                "Refusing to delete '{}' without confirmation.\nHint: Pass --yes to delete without prompting.",
                name
            ));
        }
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete saved form '{}'?", name))
            .default(false)
            .interact()?;

        if !confirmed {
            if !ctx.quiet() {
                match ui_ctx.mode {
                    OutputMode::Pretty => {
                        print(&ui_ctx, &badge(&ui_ctx, Badge::Info, "Cancelled"));
                    }
                    OutputMode::Plain | OutputMode::Json => println!("status=cancelled"),
                }
            }
            return Ok(());
        }
    }

    let outcome = workspace.apply(|state| state.delete_saved_form(&form_id));
    workspace.finish()?;

    if ui_ctx.mode.is_json() {
        let output = serde_json::json!({ "id": form_id, "deleted": outcome.is_applied() });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if matches!(outcome, Outcome::Applied(())) && !ctx.quiet() {
        match ui_ctx.mode {
            OutputMode::Pretty => print(
                &ui_ctx,
                &badge(&ui_ctx, Badge::Ok, &format!("Deleted saved form '{}'", name)),
            ),
            OutputMode::Plain | OutputMode::Json => {
                println!("status=ok");
                println!("deleted={}", form_id);
            }
        }
    }
    Ok(())
}
