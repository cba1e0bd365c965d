//! Shortlist ordering

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeResult {
    #[serde(rename = "name")]
    pub display_name: String,
    #[serde(rename = "score")]
    pub final_score: f64,
}

impl ResumeResult {
    pub fn new(display_name: impl Into<String>, final_score: f64) -> Self {
        Self {
            display_name: display_name.into(),
            final_score,
        }
    }
}

/// The extracted candidate name, or the file name when none was found.
pub fn display_name(extracted: Option<&str>, file_name: &str) -> String {
    match extracted.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => file_name.to_string(),
    }
}

/// Highest scores first, ties in submission order, at most `shortlist_size`.
pub fn rank(results: Vec<ResumeResult>, shortlist_size: usize) -> Vec<ResumeResult> {
    rank_by(results, shortlist_size, |r| r.final_score)
}

pub fn rank_by<T, F>(mut items: Vec<T>, shortlist_size: usize, score: F) -> Vec<T>
where
    F: Fn(&T) -> f64,
{
    // sort_by is stable
    items.sort_by(|a, b| score(b).partial_cmp(&score(a)).unwrap_or(Ordering::Equal));
    items.truncate(shortlist_size);
    items
}
