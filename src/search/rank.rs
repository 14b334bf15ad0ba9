//! Similarity ranking
//!
//! Candidates are ordered by how many query words appear in their title.
//! The live remote lookup, when present, always goes first.

use std::collections::HashSet;

use crate::models::{GameRecord, RankedEntry};

/// Fraction of query words found among the title's words, in [0, 1]
///
/// Both sides are split on whitespace and lowercased. Repeated query words
/// count once per occurrence. An empty query scores 0.
pub fn similarity(query: &str, title: &str) -> f64 {
    let query_lower = query.to_lowercase();
    let query_words: Vec<&str> = query_lower.split_whitespace().collect();
    if query_words.is_empty() {
        return 0.0;
    }

    let title_lower = title.to_lowercase();
    let title_words: HashSet<&str> = title_lower.split_whitespace().collect();

    let common = query_words
        .iter()
        .filter(|w| title_words.contains(*w))
        .count();
    common as f64 / query_words.len() as f64
}

/// Rank local matches by similarity and put the remote hit first
///
/// The sort is stable: equal scores keep their catalog order.
pub fn rank(query: &str, local: Vec<GameRecord>, remote: Option<GameRecord>) -> Vec<RankedEntry> {
    let mut ranked: Vec<RankedEntry> = local
        .into_iter()
        .map(|record| RankedEntry {
            score: similarity(query, &record.title),
            record,
            top: false,
        })
        .collect();

    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

    if let Some(record) = remote {
        ranked.insert(
            0,
            RankedEntry {
                score: similarity(query, &record.title),
                record,
                top: true,
            },
        );
    }

    ranked
}
