//! Branch name validation.
//!
//! Valid branch names:
//! - Must be non-empty
//! - Must not contain whitespace, `~`, `^`, `:`, `?`, `*`, `[`, `\`
//! - Must not contain `..` (double dot)
//! - Must not start or end with `.` or `/`
//! - Must not contain consecutive slashes (`//`)

use crate::error::{HistoryError, HistoryResult};

/// Characters that are forbidden anywhere in a branch name.
const FORBIDDEN_CHARS: &[char] = &[' ', '\t', '\n', '\r', '~', '^', ':', '?', '*', '[', '\\'];

/// Validate a branch name, returning `Ok(())` if valid.
pub fn validate_branch_name(name: &str) -> HistoryResult<()> {
    if name.is_empty() {
        return Err(HistoryError::InvalidName {
            name: name.to_string(),
            reason: "branch name must not be empty".into(),
        });
    }

    for ch in FORBIDDEN_CHARS {
        if name.contains(*ch) {
            return Err(HistoryError::InvalidName {
                name: name.to_string(),
                reason: format!("contains forbidden character: {ch:?}"),
            });
        }
    }

    if name.contains("..") {
        return Err(HistoryError::InvalidName {
            name: name.to_string(),
            reason: "must not contain '..'".into(),
        });
    }

    if name.starts_with('.') || name.ends_with('.') {
        return Err(HistoryError::InvalidName {
            name: name.to_string(),
            reason: "must not start or end with '.'".into(),
        });
    }

    if name.starts_with('/') || name.ends_with('/') {
        return Err(HistoryError::InvalidName {
            name: name.to_string(),
            reason: "must not start or end with '/'".into(),
        });
    }

    if name.contains("//") {
        return Err(HistoryError::InvalidName {
            name: name.to_string(),
            reason: "must not contain consecutive slashes '//'".into(),
        });
    }

    Ok(())
}
