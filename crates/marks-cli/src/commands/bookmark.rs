//! Bookmark command handlers

use std::path::PathBuf;

use anyhow::{bail, Context as _, Result};

use marks_core::{BookmarkStore, CreateBookmarkData, ExportedBookmark, UpdateBookmarkData};

use crate::commands::resolve_id;
use crate::context::{check, failure, Context};
use crate::output::Output;
use crate::prompt::confirm;

/// List bookmarks, or search them when a query is given
pub async fn list(context: &Context, search: Option<String>, output: &Output) -> Result<()> {
    let mut store = context.bookmarks();
    match search {
        Some(ref query) => store.search(query).await,
        None => store.fetch().await,
    }
    check(store.error())?;

    output.print_bookmarks(&store.bookmarks());
    Ok(())
}

/// Create a bookmark
pub async fn add(
    context: &Context,
    url: String,
    title: String,
    description: Option<String>,
    tags: Vec<String>,
    output: &Output,
) -> Result<()> {
    let mut data = CreateBookmarkData::new(title, url);
    if let Some(description) = description {
        data = data.with_description(description);
    }
    if !tags.is_empty() {
        data = data.with_tags(tags);
    }

    let mut store = context.bookmarks();
    let bookmark = store
        .create(&data)
        .await
        .ok_or_else(|| failure(store.error(), "Failed to create bookmark"))?;

    output.success(&format!("Created bookmark: {}", bookmark.id));
    output.print_bookmark(&bookmark);
    Ok(())
}

/// Update the given fields of a bookmark
pub async fn edit(
    context: &Context,
    id: String,
    data: UpdateBookmarkData,
    output: &Output,
) -> Result<()> {
    if data.is_empty() {
        bail!("Nothing to change. Pass at least one of --title, --url, --description, --tag, --folder.");
    }

    let mut store = fetched(context).await?;
    let id = resolve_id(&store.bookmarks(), &id, "bookmark")?;

    let bookmark = store
        .update(&id, &data)
        .await
        .ok_or_else(|| failure(store.error(), "Failed to update bookmark"))?;

    output.success("Bookmark updated");
    output.print_bookmark(&bookmark);
    Ok(())
}

/// Delete a bookmark
pub async fn delete(context: &Context, id: String, output: &Output) -> Result<()> {
    let mut store = fetched(context).await?;
    let id = resolve_id(&store.bookmarks(), &id, "bookmark")?;

    if output.should_prompt() {
        if let Some(bookmark) = store.get(&id) {
            println!("Delete bookmark: {} - {}", bookmark.title, bookmark.url);
        }
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    if !store.delete(&id).await {
        return Err(failure(store.error(), "Failed to delete bookmark"));
    }

    output.success(&format!("Deleted bookmark: {}", id));
    Ok(())
}

/// Create every bookmark listed in a JSON export file
pub async fn import(context: &Context, file: PathBuf, output: &Output) -> Result<()> {
    let content = std::fs::read_to_string(&file)
        .with_context(|| format!("Failed to read {:?}", file))?;
    let records: Vec<ExportedBookmark> = serde_json::from_str(&content)
        .with_context(|| format!("{:?} is not a bookmark export", file))?;

    let mut store = context.bookmarks();
    let summary = store.import(records).await;
    output.print_import_summary(&summary);

    if summary.fail_count > 0 {
        let reason = store.error().unwrap_or_default();
        bail!(
            "{} bookmark(s) failed to import. Last error: {}",
            summary.fail_count,
            reason
        );
    }
    Ok(())
}

/// Write every bookmark as plain JSON records, to a file or stdout
pub async fn export(context: &Context, file: Option<PathBuf>, output: &Output) -> Result<()> {
    let store = fetched(context).await?;
    let records = store.export();
    let json = serde_json::to_string_pretty(&records).context("Failed to serialize bookmarks")?;

    match file {
        Some(path) => {
            std::fs::write(&path, json).with_context(|| format!("Failed to write {:?}", path))?;
            output.success(&format!(
                "Exported {} bookmark(s) to {}",
                records.len(),
                path.display()
            ));
        }
        None => println!("{}", json),
    }
    Ok(())
}

async fn fetched(context: &Context) -> Result<BookmarkStore> {
    let mut store = context.bookmarks();
    store.fetch().await;
    check(store.error())?;
    Ok(store)
}
