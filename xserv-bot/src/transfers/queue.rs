//! Pending transfer queue
//!
//! Requests accumulate here while a transfer is active. The queue drains
//! from the back, so the most recently queued request is served first.
//! That matches the service's long-standing behavior and keeps requests
//! from users who just asked feeling responsive at the cost of fairness
//! to earlier requesters.

use std::path::PathBuf;

/// A queued request: who asked, and the resolved path to serve
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    /// Nickname of the requester
    pub nick: String,
    /// Bare file name as requested
    pub file_name: String,
    /// Full path under the service root
    pub path: PathBuf,
}

impl TransferRequest {
    pub fn new(nick: impl Into<String>, file_name: impl Into<String>, path: PathBuf) -> Self {
        Self {
            nick: nick.into(),
            file_name: file_name.into(),
            path,
        }
    }
}

/// Last-in first-out queue of pending transfer requests
#[derive(Debug, Default)]
pub struct TransferQueue {
    requests: Vec<TransferRequest>,
}

impl TransferQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a request to the queue
    pub fn push(&mut self, request: TransferRequest) {
        self.requests.push(request);
    }

    /// Take the next request to serve (the most recently queued one)
    pub fn pop(&mut self) -> Option<TransferRequest> {
        self.requests.pop()
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(nick: &str, name: &str) -> TransferRequest {
        TransferRequest::new(nick, name, PathBuf::from("/srv").join(name))
    }

    #[test]
    fn test_empty_queue() {
        let mut queue = TransferQueue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.len(), 0);
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn test_last_in_first_out() {
        let mut queue = TransferQueue::new();
        queue.push(request("alice", "first.txt"));
        queue.push(request("bob", "second.txt"));
        queue.push(request("carol", "third.txt"));

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.pop().unwrap().nick, "carol");
        assert_eq!(queue.pop().unwrap().nick, "bob");
        assert_eq!(queue.pop().unwrap().nick, "alice");
        assert!(queue.is_empty());
    }

    #[test]
    fn test_duplicate_requests_kept() {
        let mut queue = TransferQueue::new();
        queue.push(request("alice", "same.txt"));
        queue.push(request("alice", "same.txt"));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_interleaved_push_pop() {
        let mut queue = TransferQueue::new();
        queue.push(request("alice", "a.txt"));
        queue.push(request("bob", "b.txt"));
        assert_eq!(queue.pop().unwrap().nick, "bob");
        queue.push(request("carol", "c.txt"));
        assert_eq!(queue.pop().unwrap().nick, "carol");
        assert_eq!(queue.pop().unwrap().nick, "alice");
    }
}
