//! Usage summary
//!
//! The second line matters in practice: receiving clients silently drop
//! inbound transfer offers unless the sender has been pre-authorized, so
//! every new user is reminded to allow the bot's nick first.

use super::{CommandContext, CommandError};

pub fn handle_help(_args: &str, ctx: &mut CommandContext) -> Result<Vec<String>, CommandError> {
    Ok(vec![
        "use \\regex , \\find and \\get".to_string(),
        format!("make sure to /quote dccallow +{}", ctx.bot_nick),
    ])
}
