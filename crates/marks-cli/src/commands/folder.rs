//! Folder command handlers

use anyhow::Result;

use marks_core::{CreateFolderData, FolderStore, UpdateFolderData};

use crate::commands::resolve_id;
use crate::context::{check, failure, Context};
use crate::output::Output;
use crate::prompt::confirm;

/// List folders
pub async fn list(context: &Context, output: &Output) -> Result<()> {
    let store = fetched(context).await?;
    output.print_folders(&store.folders());
    Ok(())
}

/// Create a folder
pub async fn add(context: &Context, name: String, output: &Output) -> Result<()> {
    let mut store = context.folders();
    let folder = store
        .create(&CreateFolderData::new(name))
        .await
        .ok_or_else(|| failure(store.error(), "Failed to create folder"))?;

    output.success(&format!("Created folder: {}", folder.id));
    output.print_folder(&folder);
    Ok(())
}

/// Rename a folder
pub async fn rename(context: &Context, id: String, name: String, output: &Output) -> Result<()> {
    let mut store = fetched(context).await?;
    let id = resolve_id(&store.folders(), &id, "folder")?;

    let data = UpdateFolderData { name: Some(name) };
    let folder = store
        .update(&id, &data)
        .await
        .ok_or_else(|| failure(store.error(), "Failed to update folder"))?;

    output.success("Folder renamed");
    output.print_folder(&folder);
    Ok(())
}

/// Delete a folder
pub async fn delete(context: &Context, id: String, output: &Output) -> Result<()> {
    let mut store = fetched(context).await?;
    let id = resolve_id(&store.folders(), &id, "folder")?;

    if output.should_prompt() {
        if let Some(folder) = store.get(&id) {
            println!("Delete folder: {}", folder.name);
        }
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    if !store.delete(&id).await {
        return Err(failure(store.error(), "Failed to delete folder"));
    }

    output.success(&format!("Deleted folder: {}", id));
    Ok(())
}

async fn fetched(context: &Context) -> Result<FolderStore> {
    let mut store = context.folders();
    store.fetch().await;
    check(store.error())?;
    Ok(store)
}
