//! Clap derive structures for the `booknook` CLI.
//!
//! Defines the command tree, global flags, and shared value enums. Kept
//! free of workspace types so `build.rs` can include it for man pages.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// booknook -- browse, borrow, and run a lending library from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "booknook",
    version,
    about = "Browse and manage a BookNook lending library",
    long_about = "Command-line client for a BookNook library service.\n\n\
        Members browse the catalog, request books, and track loans.\n\
        Administrators manage users, inventory, and the request queue.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Library profile to use
    #[arg(long, short = 'p', env = "BOOKNOOK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API root URL (overrides profile)
    #[arg(long, short = 'u', env = "BOOKNOOK_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Where to keep the session token (overrides profile)
    #[arg(long, env = "BOOKNOOK_TOKEN_STORE", global = true)]
    pub token_store: Option<TokenStoreArg>,

    /// Token file path for the file store (overrides profile)
    #[arg(long, env = "BOOKNOOK_TOKEN_FILE", global = true)]
    pub token_file: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "BOOKNOOK_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "BOOKNOOK_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "BOOKNOOK_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Value Enums ──────────────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one id per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TokenStoreArg {
    /// File under the data directory
    File,
    /// OS credential store
    Keyring,
    /// Keep nothing between runs
    Memory,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RoleArg {
    User,
    Admin,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum StatusArg {
    #[default]
    All,
    Pending,
    Approved,
    Rejected,
    Returned,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and keep the session token
    Login(LoginArgs),

    /// Sign out and forget the session token
    Logout,

    /// Create a member account
    Register(RegisterArgs),

    /// Show who is signed in
    Whoami,

    /// View or edit your profile
    Profile(ProfileArgs),

    /// Browse the catalog and request books
    #[command(alias = "b")]
    Books(BooksArgs),

    /// Your requests, loans, and dashboard
    Me(MeArgs),

    /// Library administration
    Admin(AdminArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ACCOUNT
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account email (prompted when omitted)
    #[arg(long, short = 'e')]
    pub email: Option<String>,

    /// Read the password from the first line of stdin
    #[arg(long)]
    pub password_stdin: bool,
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// Username (prompted when omitted)
    #[arg(long)]
    pub username: Option<String>,

    /// Email (prompted when omitted)
    #[arg(long, short = 'e')]
    pub email: Option<String>,

    /// Read the password from the first line of stdin
    #[arg(long)]
    pub password_stdin: bool,
}

#[derive(Debug, Args)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub command: Option<ProfileCommand>,
}

#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// Show your profile (default)
    Show,

    /// Change username, email, or password
    Update {
        /// New username (keeps the current one when omitted)
        #[arg(long)]
        username: Option<String>,

        /// New email (keeps the current one when omitted)
        #[arg(long, short = 'e')]
        email: Option<String>,

        /// Prompt for the current and a new password
        #[arg(long)]
        change_password: bool,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  BOOKS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct BooksArgs {
    #[command(subcommand)]
    pub command: BooksCommand,
}

/// Page selection shared by catalog listings.
#[derive(Debug, Args)]
pub struct PageArgs {
    /// Page number, starting at 1
    #[arg(long, default_value = "1")]
    pub page: usize,

    /// Show every match instead of one page
    #[arg(long, short = 'a')]
    pub all: bool,
}

#[derive(Debug, Subcommand)]
pub enum BooksCommand {
    /// List the catalog, one page at a time
    #[command(alias = "ls")]
    List(PageArgs),

    /// Search titles and authors
    Search {
        /// Case-insensitive substring
        term: String,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Show one book
    Show {
        /// Book ID
        id: String,
    },

    /// A random handful of books
    Featured {
        /// Seed for the pick (random when omitted)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Request to borrow a book
    Borrow {
        /// Book ID
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ME
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct MeArgs {
    #[command(subcommand)]
    pub command: MeCommand,
}

#[derive(Debug, Subcommand)]
pub enum MeCommand {
    /// Your borrow requests
    Requests {
        /// Only show requests awaiting a decision
        #[arg(long)]
        pending: bool,
    },

    /// Books you currently have out
    Borrowed,

    /// Loans and pending requests at a glance
    Dashboard,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ADMIN
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AdminArgs {
    #[command(subcommand)]
    pub command: AdminCommand,
}

#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Statistics and queue heads at a glance
    Dashboard,

    /// Manage user accounts
    Users(AdminUsersArgs),

    /// Manage the book inventory
    Books(AdminBooksArgs),

    /// List borrow requests
    Requests {
        /// Only show one status
        #[arg(long, short = 's', default_value = "all")]
        status: StatusArg,
    },

    /// List requests awaiting a decision
    Pending,

    /// Approve a pending request
    Approve {
        /// Request ID
        id: String,

        /// Due date (YYYY-MM-DD); defaults to the profile's loan period
        #[arg(long)]
        due: Option<String>,
    },

    /// Reject a pending request
    Reject {
        /// Request ID
        id: String,
    },

    /// Record that a borrowed book came back
    Return {
        /// Request ID
        id: String,
    },

    /// Library statistics
    Stats,
}

#[derive(Debug, Args)]
pub struct AdminUsersArgs {
    #[command(subcommand)]
    pub command: AdminUsersCommand,
}

#[derive(Debug, Subcommand)]
pub enum AdminUsersCommand {
    /// List users
    #[command(alias = "ls")]
    List {
        /// Filter by username or email
        #[arg(long, short = 's')]
        search: Option<String>,
    },

    /// Create a user (password is prompted)
    Add {
        #[arg(long)]
        username: String,

        #[arg(long, short = 'e')]
        email: String,

        #[arg(long, default_value = "user")]
        role: RoleArg,
    },

    /// Edit a user
    Update {
        /// User ID
        id: String,

        #[arg(long)]
        username: String,

        #[arg(long, short = 'e')]
        email: String,

        #[arg(long)]
        role: RoleArg,

        /// Prompt for a new password
        #[arg(long)]
        reset_password: bool,
    },

    /// Delete a user
    #[command(alias = "rm")]
    Delete {
        /// User ID
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct AdminBooksArgs {
    #[command(subcommand)]
    pub command: AdminBooksCommand,
}

/// Fields shared by book create and update.
#[derive(Debug, Args)]
pub struct BookFields {
    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub author: String,

    #[arg(long)]
    pub year: Option<i32>,

    /// Cover image URL
    #[arg(long)]
    pub image_url: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum AdminBooksCommand {
    /// List the inventory
    #[command(alias = "ls")]
    List {
        /// Filter by title or author
        #[arg(long, short = 's')]
        search: Option<String>,
    },

    /// Add a book
    Add(BookFields),

    /// Edit a book
    Update {
        /// Book ID
        id: String,

        #[command(flatten)]
        fields: BookFields,
    },

    /// Delete a book
    #[command(alias = "rm")]
    Delete {
        /// Book ID
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current configuration
    Show,

    /// Print the config file path
    Path,

    /// Set a value on the active profile
    Set {
        /// Profile key (api_url, token_store, token_file, ca_cert,
        /// insecure, timeout, page_size, loan_period_days)
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
