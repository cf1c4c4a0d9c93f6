//! Regex file search
//!
//! The pattern is anchored at the start of the file name but not at the
//! end, so `epis` and `epis.*mkv` both match `episode-01.mkv`. This keeps
//! the matching semantics users of the service have always relied on.

use regex::Regex;

use super::{CommandContext, CommandError, match_lines};
use crate::files::find_files;

pub fn handle_regex(args: &str, ctx: &mut CommandContext) -> Result<Vec<String>, CommandError> {
    let pattern = Regex::new(&format!(r"\A(?:{args})")).map_err(CommandError::InvalidPattern)?;
    let summary = find_files(ctx.root, |name| pattern.is_match(name));
    Ok(match_lines(&summary))
}
