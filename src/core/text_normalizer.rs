//! Text Normalization
//!
//! Cleans up spoken queries before they reach the matcher and turns spoken
//! numbers ("season two") into integers.

use std::collections::HashMap;

/// Conversational filler a voice assistant tends to leave at the front
const FILLER_PREFIXES: &[&str] = &["ok ", "okay ", "hey ", "um ", "uh ", "please ", "yes "];

/// Normalizes spoken text to fix common recognition errors
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    /// Manual corrections from config, longest first
    corrections: Vec<(String, String)>,
    /// Number word mappings
    number_words: HashMap<&'static str, u32>,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new(HashMap::new())
    }
}

impl TextNormalizer {
    /// Create a new text normalizer
    pub fn new(corrections: HashMap<String, String>) -> Self {
        let mut number_words = HashMap::new();

        for (word, num) in [
            ("one", 1),
            ("two", 2),
            ("three", 3),
            ("four", 4),
            ("five", 5),
            ("six", 6),
            ("seven", 7),
            ("eight", 8),
            ("nine", 9),
            ("ten", 10),
            ("eleven", 11),
            ("twelve", 12),
            ("thirteen", 13),
            ("fourteen", 14),
            ("fifteen", 15),
            ("sixteen", 16),
            ("seventeen", 17),
            ("eighteen", 18),
            ("nineteen", 19),
            ("twenty", 20),
        ] {
            number_words.insert(word, num);
        }

        let mut corrections: Vec<(String, String)> = corrections
            .into_iter()
            .map(|(from, to)| (from.to_lowercase(), to.to_lowercase()))
            .filter(|(from, _)| !from.is_empty())
            .collect();
        // Longer phrases win over corrections for words inside them
        corrections.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        Self {
            corrections,
            number_words,
        }
    }

    /// Trim, case-fold, apply corrections and drop leading filler words.
    ///
    /// Not idempotent when a replacement contains its own key, so run it
    /// once per query.
    pub fn normalize(&self, text: &str) -> String {
        let mut result = text.trim().to_lowercase();

        for (from, to) in &self.corrections {
            result = result.replace(from.as_str(), to);
        }

        let mut final_text = result.trim().to_string();
        loop {
            let mut changed = false;
            for prefix in FILLER_PREFIXES {
                if let Some(rest) = final_text.strip_prefix(prefix) {
                    final_text = rest.trim().to_string();
                    changed = true;
                    break;
                }
            }
            if !changed {
                break;
            }
        }

        final_text.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Parse a spoken or written positive number
    pub fn parse_number(&self, text: &str) -> Option<u32> {
        let text_lower = text.trim().to_lowercase();

        if let Ok(num) = text_lower.parse::<u32>() {
            return (num > 0).then_some(num);
        }

        self.number_words.get(text_lower.as_str()).copied()
    }

    /// Split "<show> season <n> [episode]" into the show and the season.
    ///
    /// The season is `None` when the word "season" is missing or isn't
    /// followed by a number. Season 0 (specials) is accepted.
    pub fn split_season(&self, text: &str) -> (String, Option<u32>) {
        let normalized = self.normalize(text);
        match normalized.split_once("season") {
            Some((show, rest)) => {
                let season = rest
                    .split_whitespace()
                    .next()
                    .and_then(|word| word.parse::<u32>().ok().or_else(|| self.parse_number(word)));
                (show.trim().to_string(), season)
            }
            None => (normalized, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_basic() {
        let normalizer = TextNormalizer::default();
        assert_eq!(normalizer.normalize("  The   OFFICE "), "the office");
    }

    #[test]
    fn test_normalize_corrections() {
        let mut corrections = HashMap::new();
        corrections.insert("Star Trek Voyagers".to_string(), "star trek voyager".to_string());
        let normalizer = TextNormalizer::new(corrections);
        assert_eq!(normalizer.normalize("STAR TREK VOYAGERS"), "star trek voyager");
        assert_eq!(normalizer.normalize("ok hey star trek voyagers"), "star trek voyager");
    }

    #[test]
    fn test_overlapping_corrections_apply_longest_first() {
        let corrections = HashMap::from([
            ("voyagers".to_string(), "voyages".to_string()),
            ("trek voyagers".to_string(), "trek voyager".to_string()),
        ]);

        for _ in 0..16 {
            let normalizer = TextNormalizer::new(corrections.clone());
            assert_eq!(normalizer.normalize("star trek voyagers"), "star trek voyager");
            assert_eq!(normalizer.normalize("Voyagers"), "voyages");
        }
    }

    #[test]
    fn test_normalize_keeps_articles() {
        let normalizer = TextNormalizer::default();
        assert_eq!(normalizer.normalize("um the wire"), "the wire");
    }

    #[test]
    fn test_parse_number() {
        let normalizer = TextNormalizer::default();
        assert_eq!(normalizer.parse_number("five"), Some(5));
        assert_eq!(normalizer.parse_number(" 12 "), Some(12));
        assert_eq!(normalizer.parse_number("0"), None);
        assert_eq!(normalizer.parse_number("-3"), None);
        assert_eq!(normalizer.parse_number("invalid"), None);
    }

    #[test]
    fn test_split_season() {
        let normalizer = TextNormalizer::default();
        assert_eq!(
            normalizer.split_season("Breaking Bad season 2 episode"),
            ("breaking bad".to_string(), Some(2))
        );
        assert_eq!(
            normalizer.split_season("the wire season three"),
            ("the wire".to_string(), Some(3))
        );
        assert_eq!(
            normalizer.split_season("doctor who season 0"),
            ("doctor who".to_string(), Some(0))
        );
        assert_eq!(
            normalizer.split_season("the wire"),
            ("the wire".to_string(), None)
        );
        assert_eq!(
            normalizer.split_season("the wire season"),
            ("the wire".to_string(), None)
        );
    }
}
