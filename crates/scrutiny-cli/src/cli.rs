//! Command-line surface for `scy`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "scy", about = "Track security-audit engagements", version)]
pub struct Cli {
    /// Only log errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Log debug output.
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Override the local data directory.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new audit engagement.
    Create(CreateArgs),
    /// List audits.
    List(ListArgs),
    /// Show one audit in full.
    Show { id: String },
    /// Edit fields of an audit.
    Edit(EditArgs),
    /// Move an audit to a new status.
    Status(StatusArgs),
    /// Delete an audit.
    Delete { id: String },
    /// Restore an audit from the archive.
    Restore { id: String },
    /// Print an audit's status log.
    History { id: String },
    /// Draft the coordination email for a contact.
    Email(EmailArgs),
    /// Sign in as a registered user.
    Login { email: String },
    /// Sign out.
    Logout,
    /// Show the signed-in user.
    Whoami,
    /// Manage the user roster.
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Audit name.
    #[arg(long)]
    pub name: String,

    /// Client the engagement is for.
    #[arg(long)]
    pub client: String,

    /// Free-text description.
    #[arg(long, default_value = "")]
    pub description: String,

    /// Contact, repeatable: `"First Last <email>"`, optionally prefixed
    /// with `mr:` or `ms:`.
    #[arg(long = "contact", required = true)]
    pub contacts: Vec<String>,

    /// Planned kickoff meeting (RFC 3339).
    #[arg(long)]
    pub meeting: Option<String>,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Show the archive view instead of active audits.
    #[arg(long)]
    pub archive: bool,

    /// Show everything, archived included.
    #[arg(long, conflicts_with = "archive")]
    pub all: bool,

    /// Only the signed-in user's audits.
    #[arg(long)]
    pub mine: bool,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    pub id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub client: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// New status (exact value, e.g. `InWriting`).
    #[arg(long)]
    pub status: Option<String>,

    /// New planned meeting (RFC 3339), or `clear` to remove it.
    #[arg(long)]
    pub meeting: Option<String>,

    /// Reason recorded on any log entries this edit appends.
    #[arg(long)]
    pub reason: Option<String>,
}

#[derive(Debug, Args)]
pub struct StatusArgs {
    pub id: String,

    /// Target status (exact value, e.g. `UnderReview`).
    pub status: String,

    #[arg(long)]
    pub reason: Option<String>,
}

#[derive(Debug, Args)]
pub struct EmailArgs {
    pub id: String,

    /// Contact id or first name; defaults to the audit's first contact.
    #[arg(long)]
    pub contact: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum UserAction {
    /// Register a user.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// `auditor`, `manager`, or `system_admin`.
        #[arg(long, default_value = "auditor")]
        role: String,
        #[arg(long)]
        admin: bool,
    },
    /// List registered users.
    List,
    /// Remove a user.
    Rm { email: String },
    /// Show recent system audit-log events.
    Log {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}
