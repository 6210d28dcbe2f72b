//! Unique, DNS-safe resource names.

use uuid::Uuid;

/// Maximum length of a Kubernetes object name that doubles as a DNS label.
const MAX_NAME_LEN: usize = 63;

/// Length of the random suffix appended to every name.
const SUFFIX_LEN: usize = 8;

/// Build a unique object name for a test, e.g.
/// `container_exiting_msg3/http1` -> `container-exiting-msg3-http1-1f0c9a2b`.
///
/// Parallel scenarios each get their own resource, so they never observe each
/// other's status.
pub fn object_name_for_test(test_name: &str) -> String {
    let suffix: String = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(SUFFIX_LEN)
        .collect();

    format!("{}-{}", sanitize(test_name), suffix)
}

/// Lowercase, collapse anything outside `[a-z0-9]` into single dashes, and
/// leave room for the suffix.
fn sanitize(test_name: &str) -> String {
    let mut base = String::with_capacity(test_name.len());
    for c in test_name.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            base.push(c);
        } else if !base.is_empty() && !base.ends_with('-') {
            base.push('-');
        }
    }

    if !base.starts_with(|c: char| c.is_ascii_lowercase()) {
        base.insert_str(0, "t-");
    }

    base.truncate(MAX_NAME_LEN - SUFFIX_LEN - 1);
    base.trim_end_matches('-').to_string()
}
