use formdeck_core::Outcome;

use crate::app::AppContext;
use crate::ui::{badge, print, print_warning, Badge, OutputMode};

pub fn handle_clear(ctx: &AppContext) -> anyhow::Result<()> {
    let mut workspace = ctx.open_workspace()?;
    let outcome = workspace.apply(|state| state.clear_current_form());
    workspace.finish()?;

    let ui_ctx = ctx.ui_context();
    if ui_ctx.mode.is_json() {
        let output = serde_json::json!({ "cleared": outcome.is_applied() });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    match outcome {
        Outcome::Applied(()) => {
            if !ctx.quiet() {
                match ui_ctx.mode {
                    OutputMode::Pretty => {
                        let message = "Discarded the form in progress";
                        print(&ui_ctx, &badge(&ui_ctx, Badge::Ok, message));
                    }
                    OutputMode::Plain | OutputMode::Json => {
                        println!("status=ok");
                    }
                }
            }
        }
        Outcome::Unchanged => print_warning(&ui_ctx, "No form in progress"),
    }
    Ok(())
}
