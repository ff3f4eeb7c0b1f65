//! Command-line interface.

pub mod bind;
pub mod check;
pub mod completions;
pub mod output;
pub mod profile;
pub mod resolve;
pub mod secret;
pub mod session;
pub mod spawn;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::core::domain::AgentKind;
use crate::error::Result;

/// Sesame - credential resolution for coding-agent sessions.
#[derive(Parser)]
#[command(
    name = "sesame",
    about = "Resolve and inject API keys for coding-agent sessions",
    version
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Manage saved credentials
    Secret {
        #[command(subcommand)]
        action: SecretAction,
    },

    /// Inspect provider profiles
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Make a saved credential the default for a profile variable
    Bind {
        /// Profile id (e.g., deepseek)
        profile: String,
        /// Environment variable (e.g., DEEPSEEK_API_KEY)
        var: String,
        /// Saved credential id or unique prefix
        id: String,
    },

    /// Remove a default binding
    Unbind {
        /// Profile id
        profile: String,
        /// Environment variable
        var: String,
    },

    /// Show which source satisfies each credential of a profile
    Check(CheckArgs),

    /// Resolve credentials and launch an agent session
    Spawn(SpawnArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Saved credential subcommands.
#[derive(Subcommand)]
pub enum SecretAction {
    /// Save a new credential (prompts when VALUE is omitted)
    Add {
        /// Human-readable label
        #[arg(short, long)]
        label: Option<String>,
        /// Credential value
        value: Option<String>,
    },

    /// List saved credentials (values are never shown)
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a credential and its default bindings
    Rm {
        /// Credential id or unique prefix
        id: String,
    },

    /// Change a credential's label or value
    Edit {
        /// Credential id or unique prefix
        id: String,
        /// New label (empty string clears it)
        #[arg(short, long)]
        label: Option<String>,
        /// New value
        #[arg(long)]
        value: Option<String>,
    },
}

/// Profile subcommands.
#[derive(Subcommand)]
pub enum ProfileAction {
    /// List built-in and user profiles
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a profile's variables and bindings
    Show {
        /// Profile id
        id: String,
    },
}

/// Per-launch credential choices shared by `check` and `spawn`.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Use a saved credential for a variable (VAR=ID)
    #[arg(long = "use", value_name = "VAR=ID")]
    pub use_saved: Vec<String>,

    /// Rely on the machine environment for a variable
    #[arg(long, value_name = "VAR")]
    pub prefer_machine: Vec<String>,

    /// Value for this launch only (VAR=VALUE)
    #[arg(long, value_name = "VAR=VALUE")]
    pub once: Vec<String>,
}

#[derive(Args)]
pub struct CheckArgs {
    /// Profile id
    #[arg(short, long)]
    pub profile: String,

    #[command(flatten)]
    pub sources: SourceArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct SpawnArgs {
    /// Profile id
    #[arg(short, long)]
    pub profile: Option<String>,

    /// Working directory for the session (defaults to the current one)
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Agent to launch
    #[arg(short, long)]
    pub agent: Option<AgentKind>,

    /// Permission mode (agent-specific)
    #[arg(long)]
    pub permission_mode: Option<String>,

    /// Model mode (agent-specific)
    #[arg(long)]
    pub model: Option<String>,

    #[command(flatten)]
    pub sources: SourceArgs,

    /// Start from the saved draft
    #[arg(long)]
    pub resume: bool,

    /// Save the draft (encrypted) for `--resume`
    #[arg(long)]
    pub save_draft: bool,

    /// Never prompt; fail if a credential is missing
    #[arg(long)]
    pub no_input: bool,

    /// Print the request instead of launching
    #[arg(long)]
    pub dry_run: bool,
}

/// Execute a command and return the process exit code.
pub fn execute(command: Command) -> Result<i32> {
    use Command::*;

    let done = match command {
        Secret { action } => match action {
            SecretAction::Add { label, value } => secret::add(label.as_deref(), value),
            SecretAction::List { json } => secret::list(json),
            SecretAction::Rm { id } => secret::rm(&id),
            SecretAction::Edit { id, label, value } => {
                secret::edit(&id, label.as_deref(), value.as_deref())
            }
        },
        Profile { action } => match action {
            ProfileAction::List { json } => profile::list(json),
            ProfileAction::Show { id } => profile::show(&id),
        },
        Bind { profile, var, id } => bind::bind(&profile, &var, &id),
        Unbind { profile, var } => bind::unbind(&profile, &var),
        Check(args) => return check::execute(args),
        Spawn(args) => return spawn::execute(args),
        Completions { shell } => completions::execute(shell),
    };

    done.map(|()| 0)
}
