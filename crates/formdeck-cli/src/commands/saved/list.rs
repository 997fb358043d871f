use formdeck_core::FormSummary;

use crate::app::AppContext;
use crate::output::form_listing_json;
use crate::ui::{
    blank_line, display_name, format_datetime, header_with_context, hint, id_cell, print,
    simple_table, Column, OutputMode,
};

pub fn handle_list(ctx: &AppContext) -> anyhow::Result<()> {
    let workspace = ctx.open_workspace()?;
    let forms = workspace.saved_forms();
    let ui_ctx = ctx.ui_context();

    if ui_ctx.mode.is_json() {
        let json_output: Vec<_> = forms.iter().map(form_listing_json).collect();
        println!("{}", serde_json::to_string_pretty(&json_output)?);
        return Ok(());
    }

    let dir = workspace.dir().display().to_string();
    if forms.is_empty() {
        if !ctx.quiet() {
            match ui_ctx.mode {
                OutputMode::Pretty => {
                    print(
                        &ui_ctx,
                        &header_with_context(&ui_ctx, "list", None, Some(&dir)),
                    );
                    blank_line(&ui_ctx);
                    print(
                        &ui_ctx,
                        &hint(&ui_ctx, "No saved forms. Build one, then `formdeck save <NAME>`."),
                    );
                }
                OutputMode::Plain | OutputMode::Json => println!("count=0"),
            }
        }
        return Ok(());
    }

    let rows: Vec<Vec<String>> = forms
        .iter()
        .map(|form| {
            let summary = FormSummary::of(form);
            vec![
                id_cell(&ui_ctx, form.id.as_str()),
                display_name(&form.name).to_string(),
                summary.total_fields.to_string(),
                summary.type_breakdown(),
                format_datetime(&form.updated_at, ui_ctx.mode.is_pretty()),
            ]
        })
        .collect();

    match ui_ctx.mode {
        OutputMode::Pretty => {
            let count = format!("{} saved", forms.len());
            print(
                &ui_ctx,
                &header_with_context(&ui_ctx, "list", Some(&count), Some(&dir)),
            );
            blank_line(&ui_ctx);
            let columns = [
                Column::new("ID"),
                Column::new("Name"),
                Column::new("Fields"),
                Column::new("Types"),
                Column::new("Updated"),
            ];
            print(&ui_ctx, &simple_table(&ui_ctx, &columns, &rows));
            blank_line(&ui_ctx);
            print(
                &ui_ctx,
                &hint(&ui_ctx, "formdeck preview <ID>  \u{00B7}  formdeck load <ID>"),
            );
        }
        OutputMode::Plain | OutputMode::Json => {
            print(&ui_ctx, &simple_table(&ui_ctx, &[], &rows));
        }
    }
    Ok(())
}
