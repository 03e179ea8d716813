//! Light/dark theme preference
//!
//! The preference is persisted under the `theme` storage key and mirrored
//! onto the document root as the `dark` class. Both effects happen inside
//! the same call that changes the value, so readers never see them disagree.

use std::collections::BTreeSet;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::storage::{KeyValueStore, StorageResult, THEME_KEY};

/// Class set on the root element while the dark theme is active
pub const DARK_CLASS: &str = "dark";

/// Theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// The other theme
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown theme '{0}'. Use 'light' or 'dark'.")]
pub struct ParseThemeError(pub String);

impl FromStr for Theme {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(ParseThemeError(other.to_string())),
        }
    }
}

/// The element the visual mode is reflected onto
pub trait RootElement: Send + Sync {
    fn set_class(&self, class: &str, enabled: bool);
    fn has_class(&self, class: &str) -> bool;
}

/// In-process class list standing in for the document root
#[derive(Debug, Default)]
pub struct ClassList {
    classes: Mutex<BTreeSet<String>>,
}

impl ClassList {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RootElement for ClassList {
    fn set_class(&self, class: &str, enabled: bool) {
        let mut classes = self.classes.lock().unwrap_or_else(|e| e.into_inner());
        if enabled {
            classes.insert(class.to_string());
        } else {
            classes.remove(class);
        }
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(class)
    }
}

/// The environment's preferred color scheme
///
/// Checks `MARKS_COLOR_SCHEME`, then the terminal's `COLORFGBG`; light when
/// neither says anything.
pub fn system_theme() -> Theme {
    let scheme = std::env::var("MARKS_COLOR_SCHEME").ok();
    let colorfgbg = std::env::var("COLORFGBG").ok();
    theme_from_env(scheme.as_deref(), colorfgbg.as_deref())
}

fn theme_from_env(scheme: Option<&str>, colorfgbg: Option<&str>) -> Theme {
    if let Some(theme) = scheme.and_then(|s| s.trim().to_lowercase().parse().ok()) {
        return theme;
    }

    // "fg;bg" or "fg;default;bg": background is the last field
    let background = colorfgbg
        .and_then(|value| value.rsplit(';').next())
        .and_then(|bg| bg.trim().parse::<u8>().ok());

    match background {
        Some(0..=6) | Some(8) => Theme::Dark,
        _ => Theme::Light,
    }
}

/// Holds the active theme and keeps storage and the root element in step
pub struct ThemeStore {
    storage: Arc<dyn KeyValueStore>,
    root: Arc<dyn RootElement>,
    theme: watch::Sender<Theme>,
}

impl ThemeStore {
    /// Create the store, defaulting to the environment's color scheme
    pub fn load(storage: Arc<dyn KeyValueStore>, root: Arc<dyn RootElement>) -> Self {
        Self::with_default(storage, root, system_theme())
    }

    /// Create the store with an explicit fallback for an unset preference
    ///
    /// The resolved theme is applied (persisted and reflected) right away.
    pub fn with_default(
        storage: Arc<dyn KeyValueStore>,
        root: Arc<dyn RootElement>,
        fallback: Theme,
    ) -> Self {
        let initial = storage
            .get(THEME_KEY)
            .and_then(|saved| saved.parse().ok())
            .unwrap_or(fallback);

        let (theme, _) = watch::channel(initial);
        let store = Self {
            storage,
            root,
            theme,
        };

        if let Err(e) = store.storage.set(THEME_KEY, initial.as_str()) {
            warn!("Could not persist initial theme: {}", e);
        }
        store.reflect(initial);
        store
    }

    /// Current theme
    pub fn theme(&self) -> Theme {
        *self.theme.borrow()
    }

    pub fn is_dark(&self) -> bool {
        self.theme() == Theme::Dark
    }

    /// Switch light and dark, returning the new theme
    pub fn toggle(&self) -> StorageResult<Theme> {
        let next = self.theme().toggled();
        self.set(next)?;
        Ok(next)
    }

    /// Set an explicit theme
    ///
    /// If persisting fails nothing changes: the in-memory value, the stored
    /// value and the root element keep agreeing on the previous theme.
    pub fn set(&self, theme: Theme) -> StorageResult<()> {
        self.storage.set(THEME_KEY, theme.as_str())?;
        self.reflect(theme);
        self.theme.send_replace(theme);
        debug!("Theme set to {}", theme);
        Ok(())
    }

    /// Watch theme changes
    pub fn subscribe(&self) -> watch::Receiver<Theme> {
        self.theme.subscribe()
    }

    fn reflect(&self, theme: Theme) {
        self.root.set_class(DARK_CLASS, theme == Theme::Dark);
    }
}
