use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "censo")]
#[command(about = "Offline-first membership census manager")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Optional path to local database file
    #[arg(long, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Quick capture: censo "Ana Morales"
    #[arg(trailing_var_arg = true)]
    pub member: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Register a new member
    #[command(alias = "new")]
    Add {
        /// Full name
        name: Vec<String>,
        /// Birth date (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        birth_date: Option<String>,
        /// National ID document number
        #[arg(long, value_name = "ID")]
        national_id: Option<String>,
        /// Gender (Masculino | Femenino)
        #[arg(long)]
        gender: Option<String>,
        /// Group classification (C, CC, CM, CG, J, S, N)
        #[arg(long)]
        group: Option<String>,
        /// Membership status (defaults to Activo)
        #[arg(long)]
        status: Option<String>,
    },
    /// List members from the local view
    List {
        /// Filter by membership status
        #[arg(long, value_enum, default_value_t = StatusFilter::All)]
        status: StatusFilter,
        /// Filter by display group
        #[arg(long)]
        group: Option<String>,
        /// Filter by name substring
        #[arg(long)]
        search: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit an existing member
    Edit {
        /// Record ID
        id: String,
        /// New full name
        #[arg(long)]
        name: Option<String>,
        /// New birth date (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        birth_date: Option<String>,
        /// New national ID document number
        #[arg(long, value_name = "ID")]
        national_id: Option<String>,
        /// New gender
        #[arg(long)]
        gender: Option<String>,
        /// New group classification
        #[arg(long)]
        group: Option<String>,
        /// New membership status
        #[arg(long)]
        status: Option<String>,
    },
    /// Delete a member
    Delete {
        /// Record ID
        id: String,
    },
    /// Drain the pending queue and refresh the local snapshot
    Sync,
    /// Show connection status and pending operations
    Status,
    /// Import members from a JSON draft file (requires connection)
    Import {
        /// Path to the draft file
        file: PathBuf,
    },
    /// Export members
    Export {
        /// Export format
        #[arg(long, value_enum, default_value_t = ExportFormatArg::Json)]
        format: ExportFormatArg,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Show census statistics
    Stats {
        /// Output as JSON-ish totals only
        #[arg(long)]
        json: bool,
    },
    /// Authenticate against the remote service
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Login with email/password and store the session locally
    Login {
        /// Account email
        #[arg(long, value_name = "EMAIL")]
        email: String,
    },
    /// Show the stored session
    Status,
    /// Clear the stored session
    Logout,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum StatusFilter {
    /// Everyone
    All,
    /// Active and temporarily withdrawn
    General,
    /// Archived only
    Archivado,
    /// Transferred only
    Trasladado,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ExportFormatArg {
    Json,
    Csv,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
