use formdeck_core::FormSummary;

use crate::app::AppContext;
use crate::output::{field_rows, summary_json};
use crate::ui::{
    blank_line, display_name, format_datetime, header, hint, id_cell, kv, print, table, Column,
    OutputMode,
};

const FIELD_COLUMNS: [Column; 6] = [
    Column::new("#"),
    Column::new("ID"),
    Column::new("Type"),
    Column::new("Label"),
    Column::new("Rules"),
    Column::new("Details"),
];

pub fn handle_show(ctx: &AppContext) -> anyhow::Result<()> {
    let workspace = ctx.open_workspace()?;
    let ui_ctx = ctx.ui_context();

    let Some(form) = workspace.current_form() else {
        if ui_ctx.mode.is_json() {
            println!("null");
        } else if !ctx.quiet() {
            match ui_ctx.mode {
                OutputMode::Pretty => {
                    print(&ui_ctx, &header(&ui_ctx, "show", None));
                    blank_line(&ui_ctx);
                    print(&ui_ctx, &hint(&ui_ctx, "No form in progress. Run `formdeck new`."));
                }
                OutputMode::Plain | OutputMode::Json => println!("form=none"),
            }
        }
        return Ok(());
    };

    let summary = FormSummary::of(form);
    if ui_ctx.mode.is_json() {
        let output = serde_json::json!({
            "form": form,
            "summary": summary_json(&summary),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print(&ui_ctx, &header(&ui_ctx, "show", Some(display_name(&form.name))));
    print(&ui_ctx, &kv(&ui_ctx, "ID", &id_cell(&ui_ctx, form.id.as_str())));
    print(
        &ui_ctx,
        &kv(&ui_ctx, "Updated", &format_datetime(&form.updated_at, ui_ctx.mode.is_pretty())),
    );
    blank_line(&ui_ctx);

    if form.fields.is_empty() {
        print(&ui_ctx, &hint(&ui_ctx, "No fields yet. Run `formdeck field add text`."));
        return Ok(());
    }

    print(&ui_ctx, &table(&ui_ctx, &FIELD_COLUMNS, &field_rows(&ui_ctx, form)));
    blank_line(&ui_ctx);
    print(&ui_ctx, &kv(&ui_ctx, "Total Fields", &summary.total_fields.to_string()));
    print(&ui_ctx, &kv(&ui_ctx, "Required Fields", &summary.required_fields.to_string()));
    print(&ui_ctx, &kv(&ui_ctx, "Derived Fields", &summary.derived_fields.to_string()));
    Ok(())
}
