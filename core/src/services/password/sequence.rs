//! Keyboard sequence detection for password strength checks

use tokio::task::JoinSet;

/// Minimum run length that counts as a keyboard sequence
pub const MIN_SEQUENCE_LEN: usize = 4;

/// Candidate keyboard patterns, scanned forward and reversed
const KEYBOARD_PATTERNS: &[&str] = &[
    "qwertyuiop",
    "asdfghjkl",
    "zxcvbnm",
    "1234567890",
    "abcdefghijklmnopqrstuvwxyz",
];

/// Checks whether a password contains a keyboard sequence
///
/// One task per candidate pattern scans the password concurrently; the
/// first task to find a match wins and the remaining siblings are
/// cancelled.
///
/// # Arguments
///
/// * `password` - The candidate password
///
/// # Returns
///
/// `true` if any pattern contributes a run of at least
/// [`MIN_SEQUENCE_LEN`] characters, in either direction
pub async fn contains_keyboard_sequence(password: &str) -> bool {
    let lowered = password.to_lowercase();

    let mut tasks = JoinSet::new();
    for pattern in KEYBOARD_PATTERNS {
        let password = lowered.clone();
        tasks.spawn(async move { has_sequence_run(&password, pattern) });
    }

    while let Some(result) = tasks.join_next().await {
        if matches!(result, Ok(true)) {
            tasks.abort_all();
            return true;
        }
    }

    false
}

/// Scans one pattern for a qualifying run, in both directions
fn has_sequence_run(password: &str, pattern: &str) -> bool {
    let reversed: String = pattern.chars().rev().collect();

    let found = windows_of(pattern)
        .chain(windows_of(&reversed))
        .any(|run| password.contains(run));
    found
}

fn windows_of(pattern: &str) -> impl Iterator<Item = &str> {
    let end = pattern.len().saturating_sub(MIN_SEQUENCE_LEN);
    (0..=end).map(move |i| &pattern[i..i + MIN_SEQUENCE_LEN])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_detects_forward_sequence() {
        assert!(contains_keyboard_sequence("xxqwerxx").await);
        assert!(contains_keyboard_sequence("pass1234word").await);
    }

    #[tokio::test]
    async fn test_detects_reversed_sequence() {
        assert!(contains_keyboard_sequence("xxrewqxx").await);
        assert!(contains_keyboard_sequence("4321go").await);
    }

    #[tokio::test]
    async fn test_detection_is_case_insensitive() {
        assert!(contains_keyboard_sequence("QwErTy").await);
    }

    #[tokio::test]
    async fn test_short_runs_do_not_count() {
        assert!(!contains_keyboard_sequence("qwe123").await);
    }

    #[tokio::test]
    async fn test_strong_password_passes() {
        assert!(!contains_keyboard_sequence("correct-horse-battery-staple").await);
    }
}
