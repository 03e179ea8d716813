//! Folder store
//!
//! Mirrors the user's folders from `/folders`. New folders are appended.

use std::sync::Arc;

use tokio::sync::watch;

use super::{append, remove_by_id, replace_by_id, StateCell, StoreState};
use crate::api::ApiClient;
use crate::models::{CreateFolderData, Folder, UpdateFolderData};

const FETCH_ERROR: &str = "Failed to fetch folders";
const CREATE_ERROR: &str = "Failed to create folder";
const UPDATE_ERROR: &str = "Failed to update folder";
const DELETE_ERROR: &str = "Failed to delete folder";

/// Store over the folder collection
pub struct FolderStore {
    api: ApiClient,
    state: StateCell<Folder>,
}

impl FolderStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: StateCell::new(),
        }
    }

    pub fn folders(&self) -> Arc<[Folder]> {
        self.state.items()
    }

    pub fn get(&self, id: &str) -> Option<Folder> {
        self.state.find(id)
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.state.error()
    }

    pub fn snapshot(&self) -> StoreState<Folder> {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<StoreState<Folder>> {
        self.state.subscribe()
    }

    /// Replace the collection with the server's listing
    pub async fn fetch(&mut self) {
        self.state.begin(true);

        match self.api.get_json::<Vec<Folder>>("/folders", &[]).await {
            Ok(folders) => self.state.replace(folders),
            Err(e) => self.state.fail(&e, FETCH_ERROR),
        }

        self.state.finish();
    }

    /// Create a folder and append the server's copy
    pub async fn create(&mut self, data: &CreateFolderData) -> Option<Folder> {
        self.state.begin(false);

        match self.api.post_json::<_, Folder>("/folders", data).await {
            Ok(folder) => {
                let created = folder.clone();
                self.state.rebuild(|items| Some(append(items, created)));
                Some(folder)
            }
            Err(e) => {
                self.state.fail(&e, CREATE_ERROR);
                None
            }
        }
    }

    /// Update a folder, swapping the server's copy in at the same position
    pub async fn update(&mut self, id: &str, data: &UpdateFolderData) -> Option<Folder> {
        self.state.begin(false);

        let path = format!("/folders/{}", id);
        match self.api.put_json::<_, Folder>(&path, data).await {
            Ok(folder) => {
                let updated = folder.clone();
                self.state.rebuild(|items| replace_by_id(items, id, updated));
                Some(folder)
            }
            Err(e) => {
                self.state.fail(&e, UPDATE_ERROR);
                None
            }
        }
    }

    /// Delete a folder; `true` when the server accepted it
    pub async fn delete(&mut self, id: &str) -> bool {
        self.state.begin(false);

        let path = format!("/folders/{}", id);
        match self.api.delete(&path).await {
            Ok(()) => {
                self.state.rebuild(|items| Some(remove_by_id(items, id)));
                true
            }
            Err(e) => {
                self.state.fail(&e, DELETE_ERROR);
                false
            }
        }
    }
}
