//! marks Core Library
//!
//! Client-side core for the marks bookmark service: it mirrors the user's
//! bookmarks and folders from the REST API into observable in-memory
//! stores, guards navigation on the presence of a session, and keeps a
//! persisted light/dark theme preference.
//!
//! # Architecture
//!
//! - **Session**: the bearer token lives in local storage; `Session` is the
//!   single handle to it and is injected wherever it is needed
//! - **ApiClient**: JSON over HTTP with the token attached per request
//! - **Stores**: one collection each, published as immutable snapshots
//!
//! The server is the source of truth; stores only hold what it returned.
//!
//! # Quick Start
//!
//! ```text
//! let storage = Arc::new(FileStore::open(config.storage_path())?);
//! let session = Session::new(storage.clone());
//! let mut bookmarks = BookmarkStore::new(ApiClient::new(&config.api_url, session));
//!
//! bookmarks.fetch().await;
//! if let Some(error) = bookmarks.error() { ... }
//! ```
//!
//! # Modules
//!
//! - `api`: HTTP client adapter and transport abstraction
//! - `guard`: navigation guard
//! - `theme`: theme preference store
//! - `store`: bookmark and folder stores
//! - `session`: session credential
//! - `storage`: durable key/value storage
//! - `models`: wire data structures
//! - `config`: application configuration

pub mod api;
pub mod config;
pub mod error;
pub mod guard;
pub mod models;
pub mod session;
pub mod storage;
pub mod store;
pub mod theme;

pub use api::{ApiClient, HttpTransport, ReqwestTransport};
pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use guard::{evaluate, Navigation, NavigationGuard, Route};
pub use models::{
    Bookmark, CreateBookmarkData, CreateFolderData, ExportedBookmark, Folder, ImportSummary,
    LoginResponse, UpdateBookmarkData, UpdateFolderData, User,
};
pub use session::Session;
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use store::{BookmarkStore, FolderStore, StoreState};
pub use theme::{ClassList, RootElement, Theme, ThemeStore};
