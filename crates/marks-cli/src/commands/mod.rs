//! Command handlers

pub mod bookmark;
pub mod config;
pub mod folder;
pub mod route;
pub mod session;
pub mod theme;

use anyhow::{bail, Result};

use marks_core::models::Identified;

/// Resolve a full id or an unambiguous prefix against a fetched collection
pub(crate) fn resolve_id<T: Identified>(items: &[T], id: &str, kind: &str) -> Result<String> {
    if let Some(exact) = items.iter().find(|item| item.id() == id) {
        return Ok(exact.id().to_string());
    }

    let matches: Vec<&str> = items
        .iter()
        .map(|item| item.id())
        .filter(|candidate| candidate.starts_with(id))
        .collect();

    match matches.as_slice() {
        [] => bail!("No {} found matching: {}", kind, id),
        [only] => Ok(only.to_string()),
        _ => {
            eprintln!("Multiple {}s match '{}':", kind, id);
            for candidate in &matches {
                eprintln!("  {}", candidate);
            }
            bail!("Ambiguous ID. Please provide more characters.");
        }
    }
}
