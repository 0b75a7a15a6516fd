//! Cache eligibility and TTL policy.
//!
//! Conservative allow-list: a request is cacheable only when its feature
//! category is one of the known categories AND its operation kind contains
//! one of the cacheable operation substrings. New operation kinds stay
//! uncached until explicitly added here.

/// Feature categories whose responses may be cached.
const CACHEABLE_FEATURES: &[&str] = &["tasks", "general"];

/// Operation-kind substrings that mark a request as cacheable.
const CACHEABLE_OPERATIONS: &[&str] = &[
    "create_task",
    "prioritize",
    "suggest",
    "break_down",
    "estimate",
];

/// Decide whether a request is eligible for caching at all.
///
/// `operation` matches by substring, so `"create_task_from_chat"` is
/// cacheable while `"send_email"` is not.
pub fn should_cache(feature: &str, operation: &str) -> bool {
    if !CACHEABLE_FEATURES.contains(&feature) {
        return false;
    }
    CACHEABLE_OPERATIONS.iter().any(|op| operation.contains(op))
}

/// TTL in minutes for a feature category.
///
/// Task-domain responses are stable for longer than general-purpose ones;
/// unknown categories get the conservative 30 minutes.
pub fn cache_duration_minutes(feature: &str) -> u64 {
    match feature {
        "tasks" => 60,
        "general" => 30,
        _ => 30,
    }
}
