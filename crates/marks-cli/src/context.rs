//! Wiring shared by the commands
//!
//! Opens local storage once and hands out the session, API client, guard
//! and theme store built on top of it.

use std::sync::Arc;

use anyhow::{anyhow, bail, Context as _, Result};

use marks_core::{
    ApiClient, BookmarkStore, ClassList, Config, FileStore, FolderStore, Navigation,
    NavigationGuard, Route, Session, ThemeStore,
};

pub struct Context {
    pub config: Config,
    storage: Arc<FileStore>,
    session: Session,
}

impl Context {
    /// Open local storage under the configured data directory
    pub fn open(config: Config) -> Result<Self> {
        let path = config.storage_path();
        let storage = Arc::new(
            FileStore::open(&path)
                .with_context(|| format!("Failed to open local storage at {:?}", path))?,
        );
        let session = Session::new(storage.clone());

        Ok(Self {
            config,
            storage,
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn guard(&self) -> NavigationGuard {
        NavigationGuard::new(self.session.clone())
    }

    pub fn api(&self) -> ApiClient {
        ApiClient::new(&self.config.api_url, self.session.clone())
    }

    pub fn bookmarks(&self) -> BookmarkStore {
        BookmarkStore::new(self.api())
    }

    pub fn folders(&self) -> FolderStore {
        FolderStore::new(self.api())
    }

    /// Theme store; the CLI has no document, so the class list is private
    pub fn theme(&self) -> ThemeStore {
        ThemeStore::load(self.storage.clone(), Arc::new(ClassList::new()))
    }

    /// Commands that touch the API behave like the home view: they need a session
    pub fn require_session(&self) -> Result<()> {
        match self.guard().before_each(&Route::Home) {
            Navigation::Proceed => Ok(()),
            Navigation::Redirect(_) => bail!(
                "Not logged in. Run `marks session login --token <token>` first."
            ),
        }
    }
}

/// Turn a store's error field into a command failure
pub fn check(error: Option<String>) -> Result<()> {
    match error {
        Some(message) => bail!(message),
        None => Ok(()),
    }
}

/// Failure for an operation that returned nothing
pub fn failure(error: Option<String>, fallback: &str) -> anyhow::Error {
    match error {
        Some(message) => anyhow!(message),
        None => anyhow!(fallback.to_string()),
    }
}
