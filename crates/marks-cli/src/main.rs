//! marks CLI
//!
//! Command-line client for the marks bookmark service.

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use marks_core::{Config, UpdateBookmarkData};

mod commands;
mod context;
mod output;
mod prompt;

use context::Context;
use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "marks")]
#[command(about = "marks - bookmarks and folders from the command line")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use this config file instead of the default
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the session credential
    Session {
        #[command(subcommand)]
        command: SessionCommands,
    },
    /// Show where navigating to a path would lead
    Route {
        /// Path such as /, /login or /register
        path: String,
    },
    /// Manage bookmarks
    Bookmark {
        #[command(subcommand)]
        command: BookmarkCommands,
    },
    /// Manage folders
    Folder {
        #[command(subcommand)]
        command: FolderCommands,
    },
    /// Show or change the theme
    Theme {
        #[command(subcommand)]
        command: Option<ThemeCommands>,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum SessionCommands {
    /// Store a token issued by the server
    Login {
        /// Bearer token
        #[arg(long)]
        token: String,
        /// Signed-in user as JSON ({"_id", "email", "name"})
        #[arg(long)]
        user_json: Option<String>,
    },
    /// Forget the stored token
    Logout,
    /// Show whether a session is present
    Show,
}

#[derive(Subcommand)]
enum BookmarkCommands {
    /// List bookmarks
    #[command(alias = "ls")]
    List {
        /// Server-side search query
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Create a bookmark
    #[command(alias = "create")]
    Add {
        /// URL to save
        url: String,
        /// Title
        #[arg(short = 'T', long)]
        title: String,
        /// Description
        #[arg(short, long)]
        description: Option<String>,
        /// Tags to add
        #[arg(short, long)]
        tag: Vec<String>,
    },
    /// Change fields of a bookmark
    Edit {
        /// Bookmark ID (full or prefix)
        id: String,
        #[arg(short = 'T', long)]
        title: Option<String>,
        #[arg(short, long)]
        url: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        /// Replaces all tags
        #[arg(short, long)]
        tag: Vec<String>,
        /// Folder ID
        #[arg(short, long)]
        folder: Option<String>,
    },
    /// Delete a bookmark
    #[command(alias = "delete")]
    Rm {
        /// Bookmark ID (full or prefix)
        id: String,
    },
    /// Import bookmarks from a JSON export
    Import {
        /// File written by `marks bookmark export`
        file: PathBuf,
    },
    /// Export bookmarks as JSON
    Export {
        /// Output file (stdout when omitted)
        file: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum FolderCommands {
    /// List folders
    #[command(alias = "ls")]
    List,
    /// Create a folder
    #[command(alias = "create")]
    Add {
        /// Folder name
        name: String,
    },
    /// Rename a folder
    Rename {
        /// Folder ID (full or prefix)
        id: String,
        /// New name
        name: String,
    },
    /// Delete a folder
    #[command(alias = "delete")]
    Rm {
        /// Folder ID (full or prefix)
        id: String,
    },
}

#[derive(Subcommand, Clone)]
enum ThemeCommands {
    /// Show the active theme
    Show,
    /// Switch between light and dark
    Toggle,
    /// Set the theme explicitly
    Set {
        /// light or dark
        theme: String,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (api_url, data_dir, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config doesn't need local storage
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), cli.config.as_ref(), &output);
    }

    let config =
        Config::load_with_cli_override(cli.config.as_ref()).context("Failed to load configuration")?;
    init_logging(&config);

    let context = Context::open(config)?;

    match cli.command {
        Commands::Session { command } => handle_session_command(command, &context, &output),
        Commands::Route { path } => commands::route::check(&context, path, &output),
        Commands::Bookmark { command } => {
            context.require_session()?;
            handle_bookmark_command(command, &context, &output).await
        }
        Commands::Folder { command } => {
            context.require_session()?;
            handle_folder_command(command, &context, &output).await
        }
        Commands::Theme { command } => handle_theme_command(command, &context, &output),
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

fn handle_session_command(
    command: SessionCommands,
    context: &Context,
    output: &Output,
) -> Result<()> {
    match command {
        SessionCommands::Login { token, user_json } => {
            commands::session::login(context, token, user_json, output)
        }
        SessionCommands::Logout => commands::session::logout(context, output),
        SessionCommands::Show => commands::session::show(context, output),
    }
}

async fn handle_bookmark_command(
    command: BookmarkCommands,
    context: &Context,
    output: &Output,
) -> Result<()> {
    match command {
        BookmarkCommands::List { search } => commands::bookmark::list(context, search, output).await,
        BookmarkCommands::Add {
            url,
            title,
            description,
            tag,
        } => commands::bookmark::add(context, url, title, description, tag, output).await,
        BookmarkCommands::Edit {
            id,
            title,
            url,
            description,
            tag,
            folder,
        } => {
            let data = UpdateBookmarkData {
                title,
                url,
                description,
                tags: if tag.is_empty() { None } else { Some(tag) },
                folder,
            };
            commands::bookmark::edit(context, id, data, output).await
        }
        BookmarkCommands::Rm { id } => commands::bookmark::delete(context, id, output).await,
        BookmarkCommands::Import { file } => commands::bookmark::import(context, file, output).await,
        BookmarkCommands::Export { file } => commands::bookmark::export(context, file, output).await,
    }
}

async fn handle_folder_command(
    command: FolderCommands,
    context: &Context,
    output: &Output,
) -> Result<()> {
    match command {
        FolderCommands::List => commands::folder::list(context, output).await,
        FolderCommands::Add { name } => commands::folder::add(context, name, output).await,
        FolderCommands::Rename { id, name } => {
            commands::folder::rename(context, id, name, output).await
        }
        FolderCommands::Rm { id } => commands::folder::delete(context, id, output).await,
    }
}

fn handle_theme_command(
    command: Option<ThemeCommands>,
    context: &Context,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ThemeCommands::Show) | None => commands::theme::show(context, output),
        Some(ThemeCommands::Toggle) => commands::theme::toggle(context, output),
        Some(ThemeCommands::Set { theme }) => commands::theme::set(context, theme, output),
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Log to a file when MARKS_LOG is set; stdout stays clean for output
fn init_logging(config: &Config) {
    let Ok(log_level) = std::env::var("MARKS_LOG") else {
        return;
    };

    let log_path = config.log_path();
    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
            return;
        }
    };

    let env_filter = EnvFilter::new(format!("marks_core={},marks_cli={}", log_level, log_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();

    info!("Logging initialized to {:?}", log_path);
}
