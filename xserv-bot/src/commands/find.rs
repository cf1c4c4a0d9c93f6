//! Substring file search

use super::{CommandContext, CommandError, match_lines};
use crate::files::find_files;

/// Handle a substring search: list files whose name contains the query
/// (case-sensitive)
pub fn handle_find(args: &str, ctx: &mut CommandContext) -> Result<Vec<String>, CommandError> {
    let summary = find_files(ctx.root, |name| name.contains(args));
    Ok(match_lines(&summary))
}
