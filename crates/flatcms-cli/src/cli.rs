use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "flatcms",
    about = "flatcms: a flat-file content manager for text and markdown documents",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Storage root; overrides the configuration file
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// List documents
    List,
    /// Print a document the way the server displays it
    Show(ShowArgs),
    /// Manage user credentials
    User(UserArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// Listen address; overrides the configuration file
    #[arg(long)]
    pub bind: Option<SocketAddr>,
}

#[derive(Args)]
pub struct ShowArgs {
    pub name: String,
    /// Print the stored text without rendering markdown
    #[arg(long)]
    pub raw: bool,
}

#[derive(Args)]
pub struct UserArgs {
    #[command(subcommand)]
    pub action: UserAction,
}

#[derive(Subcommand)]
pub enum UserAction {
    /// Add a user to the credential file
    Add {
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Check a username and password against the credential file
    Verify {
        username: String,
        #[arg(long)]
        password: String,
    },
}
