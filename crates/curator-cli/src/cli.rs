//! CLI command definitions and argument parsing.

use clap::{Args, Parser, Subcommand, ValueEnum};
use curator_domain::Split;
use std::path::PathBuf;

/// Curator - Manage annotated Input/Result datasets for agent training.
#[derive(Debug, Parser)]
#[command(name = "curator")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "CURATOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (ids and names only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage projects
    Project(ProjectArgs),

    /// Record counts per split
    Stats(ProjectRef),

    /// List the records of a split, or print one record
    Show(ShowArgs),

    /// Run a filter pipeline over a split
    Filter(FilterArgs),

    /// Change fields of one record by dotted path
    Modify(ModifyArgs),

    /// Append records from a JSON file
    Import(ImportArgs),

    /// Recover Input/Result pairs from free text
    Extract(ExtractArgs),

    /// Generate new records with a language model
    Generate(GenerateArgs),

    /// Manage a project's system prompts
    Prompt(PromptArgs),
}

/// Names the project a command works on.
#[derive(Debug, Args)]
pub struct ProjectRef {
    /// Project name
    #[arg(short, long)]
    pub project: String,
}

/// Split argument accepting `train`, `val` or `validation`.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SplitArg {
    /// Training collection
    Train,
    /// Validation collection
    #[value(alias = "validation")]
    Val,
}

impl From<SplitArg> for Split {
    fn from(split: SplitArg) -> Self {
        match split {
            SplitArg::Train => Split::Train,
            SplitArg::Val => Split::Validation,
        }
    }
}

/// Arguments for project management.
#[derive(Debug, Args)]
pub struct ProjectArgs {
    #[command(subcommand)]
    pub action: ProjectAction,
}

/// Project management actions.
#[derive(Debug, Subcommand)]
pub enum ProjectAction {
    /// Create a new project
    Create {
        /// Project name
        name: String,
        /// JSON Schema file for the Input half
        #[arg(long)]
        input_schema: Option<PathBuf>,
        /// JSON Schema file for the Result half
        #[arg(long)]
        result_schema: Option<PathBuf>,
    },

    /// List all projects
    List,

    /// Show a project's configuration and counts
    Show {
        /// Project name
        name: String,
    },

    /// Replace a project's schemas
    Edit {
        /// Project name
        name: String,
        /// New JSON Schema file for the Input half
        #[arg(long, required_unless_present = "result_schema")]
        input_schema: Option<PathBuf>,
        /// New JSON Schema file for the Result half
        #[arg(long)]
        result_schema: Option<PathBuf>,
    },

    /// Delete a project and all its data
    Delete {
        /// Project name
        name: String,
        /// Skip confirmation
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Arguments for the show command.
#[derive(Debug, Args)]
pub struct ShowArgs {
    #[command(flatten)]
    pub project: ProjectRef,

    /// Split to read
    #[arg(short, long, value_enum, default_value = "train")]
    pub split: SplitArg,

    /// Print only the record with this id
    #[arg(long)]
    pub id: Option<i64>,

    /// Maximum number of records to list
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the filter command.
#[derive(Debug, Args)]
pub struct FilterArgs {
    #[command(flatten)]
    pub project: ProjectRef,

    /// Split to filter
    #[arg(short, long, value_enum, default_value = "train")]
    pub split: SplitArg,

    /// Comma-separated tags that must all appear
    #[arg(long)]
    pub tags: Option<String>,

    /// Regular expression matched against each record's JSON
    #[arg(long)]
    pub regex: Option<String>,

    /// Natural-language query judged by the model
    #[arg(long)]
    pub semantic: Option<String>,

    /// Model for the semantic step
    #[arg(short, long)]
    pub model: Option<String>,

    /// JSON file holding a list of filter steps (replaces the flags above)
    #[arg(long, conflicts_with_all = ["tags", "regex", "semantic"])]
    pub steps: Option<PathBuf>,
}

/// Arguments for the modify command.
#[derive(Debug, Args)]
pub struct ModifyArgs {
    #[command(flatten)]
    pub project: ProjectRef,

    /// Split holding the record
    #[arg(short, long, value_enum, default_value = "train")]
    pub split: SplitArg,

    /// Id of the record to change
    #[arg(long)]
    pub id: i64,

    /// Assignment of the form PATH=VALUE (VALUE is JSON, or a plain string)
    #[arg(long = "set", value_name = "PATH=VALUE", required = true)]
    pub set: Vec<String>,
}

/// Arguments for the import command.
#[derive(Debug, Args)]
pub struct ImportArgs {
    #[command(flatten)]
    pub project: ProjectRef,

    /// Split to append to
    #[arg(short, long, value_enum, default_value = "train")]
    pub split: SplitArg,

    /// JSON file holding an array of records
    #[arg(long)]
    pub file: PathBuf,
}

/// Arguments for the extract command.
#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// File holding the text to scan
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Read the text from stdin
    #[arg(long, conflicts_with = "file")]
    pub stdin: bool,

    /// Project that receives reviewed pairs
    #[arg(short, long, requires = "review")]
    pub project: Option<String>,

    /// Review each pair interactively and save the accepted ones
    #[arg(long, requires = "project")]
    pub review: bool,
}

/// Generation mode.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GenerateMode {
    /// New pairs from the system prompt alone
    SelfInstruct,
    /// A Result for the given user input
    Forward,
    /// A record whose Result matches the given expected output
    Backward,
}

/// Arguments for the generate command.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub project: ProjectRef,

    /// Name of a saved system prompt
    #[arg(long, required_unless_present = "prompt_file", conflicts_with = "prompt_file")]
    pub prompt: Option<String>,

    /// File holding the system prompt
    #[arg(long)]
    pub prompt_file: Option<PathBuf>,

    /// Generation mode
    #[arg(long, value_enum, default_value = "self-instruct")]
    pub mode: GenerateMode,

    /// User input (forward) or expected output (backward)
    #[arg(long, required_if_eq_any = [("mode", "forward"), ("mode", "backward")])]
    pub input: Option<String>,

    /// Generation rounds (self-instruct only)
    #[arg(long)]
    pub rounds: Option<usize>,

    /// Model name
    #[arg(short, long)]
    pub model: Option<String>,

    /// Review results before saving them
    #[arg(long)]
    pub review: bool,

    /// Split that receives unreviewed results
    #[arg(short, long, value_enum, default_value = "train")]
    pub split: SplitArg,
}

/// Arguments for prompt management.
#[derive(Debug, Args)]
pub struct PromptArgs {
    #[command(flatten)]
    pub project: ProjectRef,

    #[command(subcommand)]
    pub action: PromptAction,
}

/// Prompt management actions.
#[derive(Debug, Subcommand)]
pub enum PromptAction {
    /// Save a prompt from a file or stdin
    Save {
        /// Prompt name
        name: String,
        /// File holding the text; stdin when absent
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// List saved prompts
    List,

    /// Print a prompt
    Show {
        /// Prompt name
        name: String,
    },

    /// Delete a prompt
    Delete {
        /// Prompt name
        name: String,
    },

    /// Write a self-instruct prompt built from the project schemas
    Scaffold {
        /// Name to save it under
        #[arg(default_value = "self_instruct")]
        name: String,
        /// Entries requested per call
        #[arg(long)]
        count: Option<usize>,
    },
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}
