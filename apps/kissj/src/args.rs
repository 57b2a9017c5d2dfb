//! # CLI Argument Definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "kissj")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Bootstrap checks for a KISSJ deployment")]
pub struct Cli {
    #[command(flatten)]
    pub location: Location,

    #[command(subcommand)]
    pub command: Command,
}

/// Where the deployment keeps its configuration and data.
#[derive(Debug, Clone, Args)]
pub struct Location {
    /// Directory holding the env file
    #[arg(long, env = "KISSJ_ENV_DIR", default_value = ".", global = true)]
    pub env_dir: PathBuf,

    /// Env file name inside the env directory
    #[arg(long, env = "KISSJ_ENV_FILE", default_value = ".env", global = true)]
    pub env_file: PathBuf,

    /// Sqlite database file, exported as DB_FULL_PATH
    #[arg(long, env = "KISSJ_DB_PATH", default_value = "var/db.sqlite", global = true)]
    pub db_path: PathBuf,

    /// Directory with the translation catalogs and the `translatable/` templates
    #[arg(long, env = "KISSJ_TEMPLATES_DIR", default_value = "src/Templates", global = true)]
    pub templates_dir: PathBuf,

    /// Root directory of the local file handler
    #[arg(long, env = "KISSJ_UPLOADS_DIR", default_value = "uploads", global = true)]
    pub uploads_dir: PathBuf,

    /// Read settings from the env file only, ignoring the process environment
    #[arg(long, global = true)]
    pub ignore_system_env: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load and validate the settings, then construct every service once
    Check,
    /// Send one message through the configured mailer
    SendMail(SendMail),
}

#[derive(Debug, Args)]
pub struct SendMail {
    /// Main recipient (only used when MAIL_SEND_MAIL_TO_MAIN_RECIPIENT is true)
    #[arg(long)]
    pub to: String,

    #[arg(long)]
    pub subject: String,

    /// Inline HTML body
    #[arg(long, required_unless_present = "template", conflicts_with = "template")]
    pub body: Option<String>,

    /// Template under `translatable/` to render as the body
    #[arg(long)]
    pub template: Option<String>,

    /// Locale the template is rendered in (defaults to DEFAULT_LOCALE)
    #[arg(long, requires = "template")]
    pub locale: Option<String>,
}
