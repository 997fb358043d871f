//! Formdeck CLI - build, save, and preview forms from the terminal
//!
//! This is the command-line interface for Formdeck. It drives the editor
//! state and preview engine from `formdeck-core` and keeps the work in a
//! JSON data directory between invocations.

mod app;
mod cli;
mod commands;
mod config;
mod helpers;
mod logging;
mod output;
mod ui;

use clap::Parser;
use formdeck_core::VERSION;

use crate::app::AppContext;
use crate::cli::{Cli, Commands, FieldCommands};
use crate::commands::{fields, forms, misc, preview, saved};
use crate::ui::print_error;

fn main() {
    logging::init();
    let cli = Cli::parse();
    let ctx = AppContext::new(&cli);

    if let Err(e) = run(&ctx, &cli) {
        let ui_ctx = ctx.ui_context();
        let error_msg = format!("{}", e);
        let (message, hint) = split_error_hint(&error_msg);
        tracing::debug!(error = %error_msg, "command failed");
        print_error(&ui_ctx, message, hint);
        std::process::exit(1);
    }
}

/// Split "message\nHint: text" into its message and hint parts.
fn split_error_hint(error: &str) -> (&str, Option<&str>) {
    match error.split_once("\nHint: ") {
        Some((message, hint)) => (message, Some(hint.trim())),
        None => (error, None),
    }
}

fn run(ctx: &AppContext, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::New) => {
            forms::handle_new(ctx)?;
        }
        Some(Commands::Field(command)) => match command {
            FieldCommands::Add(args) => {
                fields::handle_add(ctx, args)?;
            }
            FieldCommands::Update(args) => {
                fields::handle_update(ctx, args)?;
            }
            FieldCommands::Delete(args) => {
                fields::handle_delete(ctx, args)?;
            }
            FieldCommands::Move(args) => {
                fields::handle_move(ctx, args)?;
            }
        },
        Some(Commands::Save(args)) => {
            forms::handle_save(ctx, args)?;
        }
        Some(Commands::Load(args)) => {
            forms::handle_load(ctx, args)?;
        }
        Some(Commands::Clear) => {
            forms::handle_clear(ctx)?;
        }
        Some(Commands::Show) => {
            forms::handle_show(ctx)?;
        }
        Some(Commands::List) => {
            saved::handle_list(ctx)?;
        }
        Some(Commands::Remove(args)) => {
            saved::handle_remove(ctx, args)?;
        }
        Some(Commands::Preview(args)) => {
            preview::handle_preview(ctx, args)?;
        }
        Some(Commands::Completions(args)) => {
            misc::handle_completions(args)?;
        }
        None => {
            println!("Formdeck v{}", VERSION);
            println!("\nQuickstart:");
            println!("  formdeck new");
            println!("  formdeck field add text");
            println!("  formdeck field update <id> --label \"Name\" --required true");
            println!("  formdeck save \"Contact\"");
            println!("  formdeck preview --set Name=Ada --submit");
            println!("\nRun `formdeck --help` for full usage.");
        }
    }

    Ok(())
}
