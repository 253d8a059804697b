//! Log name de-duplication.

use std::collections::HashSet;

/// Pick a log name that does not collide with `existing`.
///
/// Returns `desired` when it is free, otherwise `desired-k` for the smallest
/// `k >= 1` not already in use.
pub fn unique_name<'a, I>(desired: &str, existing: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let taken: HashSet<&str> = existing.into_iter().collect();
    if !taken.contains(desired) {
        return desired.to_string();
    }
    (1..)
        .map(|k| format!("{desired}-{k}"))
        .find(|candidate| !taken.contains(candidate.as_str()))
        .unwrap_or_else(|| desired.to_string())
}
