use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use formdeck_core::VERSION;

/// Formdeck - build data-entry forms, attach validation and derived fields,
/// and preview them from the terminal
#[derive(Parser)]
#[command(name = "formdeck")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding saved forms and the form in progress
    #[arg(long, global = true, env = "FORMDECK_DATA_DIR", value_name = "DIR")]
    pub data_dir: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Output format
    #[arg(long, global = true, value_name = "FORMAT")]
    pub format: Option<FormatArg>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Use ASCII symbols and table borders only
    #[arg(long, global = true)]
    pub ascii: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Plain,
    Pretty,
}

/// Arguments for the `field add` command
#[derive(Args)]
pub struct FieldAddArgs {
    /// Field type (text, number, textarea, select, radio, checkbox, date)
    #[arg(value_name = "TYPE")]
    pub field_type: String,

    /// Insert directly after this field (ID or unique prefix)
    #[arg(long, value_name = "ID")]
    pub after: Option<String>,
}

/// Arguments for the `field update` command
#[derive(Args)]
pub struct FieldUpdateArgs {
    /// Field ID (or unique prefix)
    #[arg(value_name = "ID")]
    pub id: String,

    /// Change the field type
    #[arg(long = "type", value_name = "TYPE")]
    pub field_type: Option<String>,

    /// Set the label
    #[arg(long)]
    pub label: Option<String>,

    /// Set the placeholder
    #[arg(long)]
    pub placeholder: Option<String>,

    /// Mark the field required (true/false)
    #[arg(long, value_name = "BOOL")]
    pub required: Option<String>,

    /// Mark the field derived (true/false)
    #[arg(long, value_name = "BOOL")]
    pub derived: Option<String>,

    /// Parent field of a derived field (repeatable; replaces the list)
    #[arg(long = "parent", value_name = "ID")]
    pub parents: Vec<String>,

    /// Derivation formula, e.g. "Age from Date of Birth" (empty clears)
    #[arg(long)]
    pub formula: Option<String>,

    /// Choice option as LABEL=VALUE (repeatable; replaces the list)
    #[arg(long = "option", value_name = "LABEL=VALUE")]
    pub options: Vec<String>,

    /// Validation rule as KIND[:VALUE[:MESSAGE]] (repeatable; appended)
    #[arg(long = "rule", value_name = "RULE")]
    pub rules: Vec<String>,

    /// Remove existing validation rules before appending new ones
    #[arg(long)]
    pub clear_rules: bool,

    /// Default value (empty clears)
    #[arg(long, value_name = "VALUE")]
    pub default: Option<String>,
}

/// Arguments for the `field delete` command
#[derive(Args)]
pub struct FieldDeleteArgs {
    /// Field ID (or unique prefix)
    #[arg(value_name = "ID")]
    pub id: String,
}

/// Arguments for the `field move` command
#[derive(Args)]
pub struct FieldMoveArgs {
    /// Current position (0-based)
    #[arg(value_name = "FROM")]
    pub from: usize,

    /// New position (0-based)
    #[arg(value_name = "TO")]
    pub to: usize,
}

#[derive(Subcommand)]
pub enum FieldCommands {
    /// Add a field to the form in progress
    Add(FieldAddArgs),

    /// Change attributes of a field
    Update(FieldUpdateArgs),

    /// Remove a field
    Delete(FieldDeleteArgs),

    /// Move a field to a new position
    Move(FieldMoveArgs),
}

/// Arguments for the `save` command
#[derive(Args)]
pub struct SaveArgs {
    /// Name to save the form under
    #[arg(value_name = "NAME")]
    pub name: String,
}

/// Arguments for the `load` command
#[derive(Args)]
pub struct LoadArgs {
    /// Saved form ID (or unique prefix)
    #[arg(value_name = "ID")]
    pub id: String,
}

/// Arguments for the `remove` command
#[derive(Args)]
pub struct RemoveArgs {
    /// Saved form ID (or unique prefix)
    #[arg(value_name = "ID")]
    pub id: String,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the `preview` command
#[derive(Args)]
pub struct PreviewArgs {
    /// Saved form to preview (defaults to the form in progress)
    #[arg(value_name = "ID")]
    pub id: Option<String>,

    /// Enter a value as FIELD=VALUE (field ID, prefix, or label; repeatable)
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    pub set: Vec<String>,

    /// Validate every field as if the form were submitted
    #[arg(long)]
    pub submit: bool,
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_name = "SHELL")]
    pub shell: Shell,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start a new form (keeps the current one if it exists)
    New,

    /// Edit fields of the form in progress
    #[command(subcommand)]
    Field(FieldCommands),

    /// Save the form in progress under a name
    Save(SaveArgs),

    /// Copy a saved form into the editor
    Load(LoadArgs),

    /// Discard the form in progress
    Clear,

    /// Show the form in progress
    Show,

    /// List saved forms
    List,

    /// Delete a saved form
    Remove(RemoveArgs),

    /// Fill in and validate a form
    Preview(PreviewArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}
