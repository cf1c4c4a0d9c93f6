//! Requested file name validation
//!
//! A `get` request names a file by its bare name, joined to the service
//! root by the bot. Any path-separator character would let a requester
//! escape the service root, so names containing one are rejected outright.

use std::fmt;

/// Validation error for requested file names
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestNameError {
    /// Name is empty (would resolve to the service root itself)
    Empty,
    /// Name contains a path separator (`/` or `\`)
    PathSeparator,
    /// Name contains a null byte
    ContainsNull,
}

impl fmt::Display for RequestNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::Empty => "empty file name",
            Self::PathSeparator => "file name contains a path separator",
            Self::ContainsNull => "file name contains a null byte",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for RequestNameError {}

/// Validate a requested file name
///
/// Checks:
/// - Not empty
/// - No null bytes
/// - No path separators, on any platform (`/` and `\` are both rejected
///   so a name crafted for one platform cannot traverse on another)
///
/// # Errors
///
/// Returns a `RequestNameError` variant describing the validation failure.
pub fn validate_request_name(name: &str) -> Result<(), RequestNameError> {
    if name.is_empty() {
        return Err(RequestNameError::Empty);
    }
    if name.contains('\0') {
        return Err(RequestNameError::ContainsNull);
    }
    if name.contains('/') || name.contains('\\') {
        return Err(RequestNameError::PathSeparator);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert!(validate_request_name("movie.mkv").is_ok());
        assert!(validate_request_name("a.txt").is_ok());
        assert!(validate_request_name("name with spaces.bin").is_ok());
        assert!(validate_request_name("..leading-dots").is_ok());
        assert!(validate_request_name("日本語.txt").is_ok());
    }

    #[test]
    fn test_empty_name() {
        assert_eq!(validate_request_name(""), Err(RequestNameError::Empty));
    }

    #[test]
    fn test_traversal_rejected() {
        assert_eq!(
            validate_request_name("../secret"),
            Err(RequestNameError::PathSeparator)
        );
        assert_eq!(
            validate_request_name("/etc/passwd"),
            Err(RequestNameError::PathSeparator)
        );
        assert_eq!(
            validate_request_name("dir/file.txt"),
            Err(RequestNameError::PathSeparator)
        );
    }

    #[test]
    fn test_backslash_rejected() {
        assert_eq!(
            validate_request_name("..\\secret"),
            Err(RequestNameError::PathSeparator)
        );
        assert_eq!(
            validate_request_name("C:\\windows"),
            Err(RequestNameError::PathSeparator)
        );
    }

    #[test]
    fn test_null_byte_rejected() {
        assert_eq!(
            validate_request_name("file\0.txt"),
            Err(RequestNameError::ContainsNull)
        );
    }

    #[test]
    fn test_bare_dots_allowed_by_validator() {
        // "." and ".." contain no separator so the validator passes them.
        // They resolve to directories, which the transfer engine cannot
        // open as source files, so a request for them dies at open time.
        assert!(validate_request_name(".").is_ok());
        assert!(validate_request_name("..").is_ok());
    }
}
