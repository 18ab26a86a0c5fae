//! Fuzzy matching utilities for library searches
//!
//! Scores a query against candidate labels using approximate substring
//! matching: the number of edits needed to make the query appear somewhere
//! inside the label, relative to the query length, plus a small penalty for
//! how far into the label the match starts. Lower scores are better and
//! 0.0 is a perfect match at the start of the label.

use crate::library::Candidate;
use std::borrow::Cow;
use strsim::normalized_levenshtein;

/// Matcher settings, fixed for the lifetime of a [`FuzzyMatcher`]
#[derive(Debug, Clone, PartialEq)]
pub struct MatchConfig {
    pub case_sensitive: bool,
    /// Highest admissible score (0 = exact, 1 = anything)
    pub threshold: f64,
    /// Expected position of the match inside the label
    pub location: usize,
    /// How quickly distance from `location` costs score
    pub distance: usize,
    /// Longer patterns fall back to whole-string similarity
    pub max_pattern_length: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            threshold: 0.4,
            location: 0,
            distance: 100,
            max_pattern_length: 64,
        }
    }
}

/// Which attribute of a candidate the query is matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKey {
    Label,
    ChannelNumber,
}

/// Result of a fuzzy match with the matched candidate and its score
#[derive(Debug, Clone)]
pub struct FuzzyMatch<'a, T> {
    pub candidate: &'a T,
    pub score: f64,
}

#[derive(Debug, Clone, Default)]
pub struct FuzzyMatcher {
    config: MatchConfig,
}

impl FuzzyMatcher {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    /// Score `query` against `text`, or `None` if it doesn't clear the threshold
    pub fn score(&self, query: &str, text: &str) -> Option<f64> {
        let (pattern, text) = if self.config.case_sensitive {
            (query.trim().to_string(), text.to_string())
        } else {
            (query.trim().to_lowercase(), text.to_lowercase())
        };

        let pattern: Vec<char> = pattern.chars().collect();
        if pattern.is_empty() {
            return None;
        }

        let score = if pattern.len() > self.config.max_pattern_length {
            let pattern: String = pattern.iter().collect();
            1.0 - normalized_levenshtein(&pattern, &text)
        } else {
            let text: Vec<char> = text.chars().collect();
            self.substring_score(&pattern, &text)
        };

        (score <= self.config.threshold).then_some(score)
    }

    /// All candidates that clear the threshold, best first.
    ///
    /// The sort is stable, so equal scores keep their input order.
    pub fn search<'a, T: Candidate>(
        &self,
        candidates: &'a [T],
        query: &str,
        key: MatchKey,
    ) -> Vec<FuzzyMatch<'a, T>> {
        let mut matches: Vec<FuzzyMatch<'a, T>> = candidates
            .iter()
            .filter_map(|candidate| {
                let text = key_text(candidate, key)?;
                self.score(query, &text)
                    .map(|score| FuzzyMatch { candidate, score })
            })
            .collect();

        matches.sort_by(|a, b| {
            a.score
                .partial_cmp(&b.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        matches
    }

    /// Find the best match above the threshold
    ///
    /// Returns None if the list is empty or nothing clears the threshold
    pub fn find_best<'a, T: Candidate>(
        &self,
        candidates: &'a [T],
        query: &str,
        key: MatchKey,
    ) -> Option<&'a T> {
        self.search(candidates, query, key)
            .into_iter()
            .next()
            .map(|m| m.candidate)
    }

    /// Best approximate occurrence of `pattern` anywhere in `text`.
    ///
    /// Edit distance DP where the match may begin at any text position for
    /// free. Each cell carries the text index its alignment started at so
    /// the location penalty can be applied to the winning end position.
    fn substring_score(&self, pattern: &[char], text: &[char]) -> f64 {
        let m = pattern.len();

        // (cost, start) per pattern prefix length, for the previous text column
        let mut prev: Vec<(usize, usize)> = (0..=m).map(|i| (i, 0)).collect();
        let mut best = self.combine(prev[m].0, m, 0);

        for (j, &tc) in text.iter().enumerate() {
            let mut cur = vec![(0usize, j + 1); m + 1];
            for i in 1..=m {
                let substitute = (
                    prev[i - 1].0 + usize::from(pattern[i - 1] != tc),
                    prev[i - 1].1,
                );
                let insert = (cur[i - 1].0 + 1, cur[i - 1].1);
                let delete = (prev[i].0 + 1, prev[i].1);

                let mut cell = substitute;
                if insert.0 < cell.0 {
                    cell = insert;
                }
                if delete.0 < cell.0 {
                    cell = delete;
                }
                cur[i] = cell;
            }

            let (errors, start) = cur[m];
            let score = self.combine(errors, m, start);
            if score < best {
                best = score;
            }
            prev = cur;
        }

        best
    }

    fn combine(&self, errors: usize, pattern_len: usize, start: usize) -> f64 {
        let accuracy = errors as f64 / pattern_len as f64;
        if self.config.distance == 0 {
            return if start == self.config.location {
                accuracy
            } else {
                1.0
            };
        }
        let proximity = start.abs_diff(self.config.location) as f64;
        accuracy + proximity / self.config.distance as f64
    }
}

fn key_text<T: Candidate>(candidate: &T, key: MatchKey) -> Option<Cow<'_, str>> {
    match key {
        MatchKey::Label => Some(Cow::Borrowed(candidate.label())),
        MatchKey::ChannelNumber => candidate
            .channel_number()
            .map(|n| Cow::Owned(n.to_string())),
    }
}
