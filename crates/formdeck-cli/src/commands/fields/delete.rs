use formdeck_core::Outcome;

use crate::app::AppContext;
use crate::cli::FieldDeleteArgs;
use crate::helpers::resolve_field_id;
use crate::ui::{badge, print, print_warning, Badge, OutputMode};

pub fn handle_delete(ctx: &AppContext, args: &FieldDeleteArgs) -> anyhow::Result<()> {
    let mut workspace = ctx.open_workspace()?;
    let form = workspace.require_current()?;
    let field_id = resolve_field_id(form, &args.id)?;
    let label = form.field(&field_id).map(|field| field.label.clone());

    let outcome = workspace.apply(|state| state.delete_field(&field_id));
    workspace.finish()?;

    let ui_ctx = ctx.ui_context();
    if ui_ctx.mode.is_json() {
        let output = serde_json::json!({
            "id": field_id,
            "deleted": outcome.is_applied(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    match (outcome, label) {
        (Outcome::Applied(()), Some(label)) => {
            if !ctx.quiet() {
                match ui_ctx.mode {
                    OutputMode::Pretty => print(
                        &ui_ctx,
                        &badge(&ui_ctx, Badge::Ok, &format!("Deleted field '{}'", label)),
                    ),
                    OutputMode::Plain | OutputMode::Json => {
                        println!("status=ok");
                        println!("deleted={}", field_id);
                    }
                }
            }
        }
        _ => print_warning(
            &ui_ctx,
            &format!("No field '{}' in the form; nothing changed", args.id),
        ),
    }
    Ok(())
}
