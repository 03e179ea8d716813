//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use serde::Serialize;

use marks_core::{Bookmark, Folder, ImportSummary, Navigation, Route, Theme, User};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print a single bookmark
    pub fn print_bookmark(&self, bookmark: &Bookmark) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:          {}", bookmark.id);
                println!("Title:       {}", bookmark.title);
                println!("URL:         {}", bookmark.url);
                if let Some(ref desc) = bookmark.description {
                    println!("Description: {}", desc);
                }
                if !bookmark.tags.is_empty() {
                    println!("Tags:        {}", bookmark.tags.join(", "));
                }
                if let Some(ref folder) = bookmark.folder {
                    println!("Folder:      {}", folder);
                }
                if let Some(created) = bookmark.created_at {
                    println!("Created:     {}", created.format("%Y-%m-%d %H:%M"));
                }
            }
            OutputFormat::Json => print_json(bookmark),
            OutputFormat::Quiet => println!("{}", bookmark.id),
        }
    }

    /// Print a list of bookmarks
    pub fn print_bookmarks(&self, bookmarks: &[Bookmark]) {
        match self.format {
            OutputFormat::Human => {
                if bookmarks.is_empty() {
                    println!("No bookmarks found.");
                    return;
                }
                for bookmark in bookmarks {
                    let tags = if bookmark.tags.is_empty() {
                        String::new()
                    } else {
                        format!(" [{}]", bookmark.tags.join(", "))
                    };
                    println!(
                        "{} | {}{} | {}",
                        short_id(&bookmark.id),
                        truncate(&bookmark.title, 35),
                        tags,
                        truncate(&bookmark.url, 45)
                    );
                }
                println!("\n{} bookmark(s)", bookmarks.len());
            }
            OutputFormat::Json => print_json(&bookmarks),
            OutputFormat::Quiet => {
                for bookmark in bookmarks {
                    println!("{}", bookmark.id);
                }
            }
        }
    }

    /// Print a single folder
    pub fn print_folder(&self, folder: &Folder) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:      {}", folder.id);
                println!("Name:    {}", folder.name);
                if let Some(created) = folder.created_at {
                    println!("Created: {}", created.format("%Y-%m-%d %H:%M"));
                }
            }
            OutputFormat::Json => print_json(folder),
            OutputFormat::Quiet => println!("{}", folder.id),
        }
    }

    /// Print a list of folders
    pub fn print_folders(&self, folders: &[Folder]) {
        match self.format {
            OutputFormat::Human => {
                if folders.is_empty() {
                    println!("No folders found.");
                    return;
                }
                for folder in folders {
                    println!("{} | {}", short_id(&folder.id), folder.name);
                }
                println!("\n{} folder(s)", folders.len());
            }
            OutputFormat::Json => print_json(&folders),
            OutputFormat::Quiet => {
                for folder in folders {
                    println!("{}", folder.id);
                }
            }
        }
    }

    /// Print the result of an import
    pub fn print_import_summary(&self, summary: &ImportSummary) {
        match self.format {
            OutputFormat::Human => {
                println!(
                    "Imported {} bookmark(s), {} failed",
                    summary.success_count, summary.fail_count
                );
            }
            OutputFormat::Json => print_json(summary),
            OutputFormat::Quiet => {
                println!("{} {}", summary.success_count, summary.fail_count);
            }
        }
    }

    /// Print the session state
    pub fn print_session(&self, authenticated: bool, user: Option<&User>) {
        match self.format {
            OutputFormat::Human => {
                if !authenticated {
                    println!("Not logged in.");
                    return;
                }
                match user {
                    Some(user) => println!("Logged in as {} <{}>", user.name, user.email),
                    None => println!("Logged in (token only)."),
                }
            }
            OutputFormat::Json => {
                print_json(&serde_json::json!({
                    "authenticated": authenticated,
                    "user": user
                }));
            }
            OutputFormat::Quiet => println!("{}", authenticated),
        }
    }

    /// Print a navigation guard decision
    pub fn print_navigation(&self, target: &Route, decision: &Navigation) {
        let destination = match decision {
            Navigation::Proceed => target,
            Navigation::Redirect(route) => route,
        };
        match self.format {
            OutputFormat::Human => match decision {
                Navigation::Proceed => println!("{} -> proceed", target),
                Navigation::Redirect(route) => println!("{} -> redirect to {}", target, route),
            },
            OutputFormat::Json => {
                print_json(&serde_json::json!({
                    "target": target.path(),
                    "redirect": matches!(decision, Navigation::Redirect(_)),
                    "destination": destination.path()
                }));
            }
            OutputFormat::Quiet => println!("{}", destination),
        }
    }

    /// Print the active theme
    pub fn print_theme(&self, theme: Theme) {
        match self.format {
            OutputFormat::Human => println!("Theme: {}", theme),
            OutputFormat::Json => print_json(&serde_json::json!({"theme": theme})),
            OutputFormat::Quiet => println!("{}", theme),
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize output: {}", e),
    }
}

/// First 8 characters of an id
fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
