//! Title normalization
//!
//! Every place the bot compares titles (list membership, release matching)
//! goes through [`normalize_title`] so that `" DUNE "` and `"dune"` are the
//! same key. Display strings keep their original casing; only the key is
//! folded.

/// Produce the canonical comparison key for a title: trimmed, lowercased,
/// with runs of internal whitespace collapsed to a single space.
pub fn normalize_title(title: &str) -> String {
    title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
