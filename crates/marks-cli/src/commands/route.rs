//! Route command handler

use anyhow::Result;

use marks_core::Route;

use crate::context::Context;
use crate::output::Output;

/// Print where navigating to `path` would end up
pub fn check(context: &Context, path: String, output: &Output) -> Result<()> {
    let target = Route::from_path(&path);
    let decision = context.guard().before_each(&target);
    output.print_navigation(&target, &decision);
    Ok(())
}
