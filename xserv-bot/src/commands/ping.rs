//! Liveness check

use super::{CommandContext, CommandError};

pub fn handle_ping(_args: &str, _ctx: &mut CommandContext) -> Result<Vec<String>, CommandError> {
    Ok(vec!["pong".to_string()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfers::TransferQueue;
    use tempfile::TempDir;

    #[test]
    fn test_ping_replies_pong() {
        let root = TempDir::new().unwrap();
        let mut queue = TransferQueue::new();
        let mut ctx = CommandContext {
            root: root.path(),
            queue: &mut queue,
            nick: "alice",
            bot_nick: "xservbot",
        };
        assert_eq!(handle_ping("", &mut ctx).unwrap(), vec!["pong"]);
        // Arguments are ignored
        assert_eq!(handle_ping("extra", &mut ctx).unwrap(), vec!["pong"]);
    }
}
