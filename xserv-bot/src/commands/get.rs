//! File request handling
//!
//! `get` is the only command that mutates state: a valid request for an
//! existing file is appended to the transfer queue and served once the
//! engine is free. The requested name is validated before it ever touches
//! the filesystem so a crafted name cannot reach outside the service root.

use xserv_common::validators::validate_request_name;

use super::{CommandContext, CommandError};
use crate::transfers::TransferRequest;

pub fn handle_get(args: &str, ctx: &mut CommandContext) -> Result<Vec<String>, CommandError> {
    if validate_request_name(args).is_err() {
        return Ok(vec!["invalid filename".to_string()]);
    }

    let path = ctx.root.join(args);
    if !path.exists() {
        return Ok(vec!["no such file".to_string()]);
    }

    ctx.queue.push(TransferRequest::new(ctx.nick, args, path));
    Ok(vec!["your request has been queued".to_string()])
}
