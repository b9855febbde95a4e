//! Keyword category suggester for expense descriptions
//!
//! A fixed, case-insensitive word lookup. Each category owns a keyword
//! pattern; the category with the most distinct keyword hits wins, ties go to
//! the earlier category in the table. Descriptions with no hits fall back to
//! `other` with a low confidence.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::ExpenseCategory;

const KEYWORDS: &[(ExpenseCategory, &[&str])] = &[
    (
        ExpenseCategory::Food,
        &[
            "food", "lunch", "dinner", "breakfast", "snack", "snacks", "coffee", "tea", "cafe",
            "restaurant", "pizza", "burger", "grocery", "groceries", "canteen", "mess", "swiggy",
            "zomato", "meal", "bakery",
        ],
    ),
    (
        ExpenseCategory::Transport,
        &[
            "uber", "ola", "lyft", "taxi", "cab", "bus", "metro", "train", "auto", "fuel",
            "petrol", "diesel", "gas", "parking", "toll", "flight", "rickshaw",
        ],
    ),
    (
        ExpenseCategory::Entertainment,
        &[
            "movie", "movies", "cinema", "netflix", "spotify", "prime", "concert", "game",
            "games", "gaming", "party", "show", "tickets", "subscription",
        ],
    ),
    (
        ExpenseCategory::Education,
        &[
            "book", "books", "course", "tuition", "fees", "exam", "stationery", "notebook",
            "udemy", "coursera", "college", "school", "library", "textbook",
        ],
    ),
    (
        ExpenseCategory::Shopping,
        &[
            "amazon", "flipkart", "clothes", "clothing", "shoes", "shirt", "jeans", "mall",
            "shopping", "myntra", "gift", "electronics",
        ],
    ),
    (
        ExpenseCategory::Utilities,
        &[
            "electricity", "water", "internet", "wifi", "broadband", "recharge", "mobile",
            "phone", "bill", "utility",
        ],
    ),
    (
        ExpenseCategory::Healthcare,
        &[
            "doctor", "medicine", "medicines", "pharmacy", "hospital", "clinic", "dental",
            "dentist", "health", "medical", "gym",
        ],
    ),
    (
        ExpenseCategory::Housing,
        &["rent", "hostel", "pg", "deposit", "maintenance", "furniture", "landlord"],
    ),
    (
        ExpenseCategory::Personal,
        &[
            "haircut", "salon", "barber", "laundry", "cosmetics", "toiletries", "grooming",
            "skincare",
        ],
    ),
];

/// Confidence reported when nothing matched
const FALLBACK_CONFIDENCE: f64 = 0.1;

/// A suggested category with a confidence in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategorySuggestion {
    pub category: ExpenseCategory,
    pub confidence: f64,
    /// Number of distinct keywords that matched
    pub matched_keywords: usize,
}

/// Compiled keyword table
pub struct CategorySuggester {
    patterns: Vec<(ExpenseCategory, Regex)>,
}

impl CategorySuggester {
    fn compile() -> std::result::Result<Self, regex::Error> {
        let patterns = KEYWORDS
            .iter()
            .map(|(category, words)| {
                let alternation = words
                    .iter()
                    .map(|w| regex::escape(w))
                    .collect::<Vec<_>>()
                    .join("|");
                Regex::new(&format!(r"(?i)\b(?:{})\b", alternation)).map(|re| (*category, re))
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Process-wide compiled instance
    pub fn shared() -> Result<&'static Self> {
        static SHARED: OnceLock<std::result::Result<CategorySuggester, regex::Error>> =
            OnceLock::new();
        SHARED
            .get_or_init(Self::compile)
            .as_ref()
            .map_err(|e| Error::Regex(e.clone()))
    }

    /// Suggest a category for a free-text description
    pub fn suggest(&self, description: &str) -> CategorySuggestion {
        let mut best: Option<(ExpenseCategory, usize)> = None;

        for (category, re) in &self.patterns {
            let hits: HashSet<String> = re
                .find_iter(description)
                .map(|m| m.as_str().to_lowercase())
                .collect();
            if hits.is_empty() {
                continue;
            }
            if best.map_or(true, |(_, n)| hits.len() > n) {
                best = Some((*category, hits.len()));
            }
        }

        let suggestion = match best {
            Some((category, hits)) => CategorySuggestion {
                category,
                confidence: (0.6 + 0.1 * (hits as f64 - 1.0)).min(0.95),
                matched_keywords: hits,
            },
            None => CategorySuggestion {
                category: ExpenseCategory::Other,
                confidence: FALLBACK_CONFIDENCE,
                matched_keywords: 0,
            },
        };

        debug!(
            description,
            category = %suggestion.category,
            confidence = suggestion.confidence,
            "Suggested expense category"
        );
        suggestion
    }
}

/// Suggest a category using the shared suggester
pub fn suggest_category(description: &str) -> Result<CategorySuggestion> {
    Ok(CategorySuggester::shared()?.suggest(description))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suggest(desc: &str) -> CategorySuggestion {
        suggest_category(desc).unwrap()
    }

    #[test]
    fn test_single_keyword() {
        let s = suggest("Uber to campus");
        assert_eq!(s.category, ExpenseCategory::Transport);
        assert_eq!(s.matched_keywords, 1);
        assert!((s.confidence - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_case_insensitive_whole_words() {
        assert_eq!(suggest("NETFLIX monthly").category, ExpenseCategory::Entertainment);
        // "rental" must not match "rent"
        assert_eq!(suggest("bike rental").category, ExpenseCategory::Other);
    }

    #[test]
    fn test_most_hits_wins() {
        let s = suggest("coffee and pizza before the bus");
        assert_eq!(s.category, ExpenseCategory::Food);
        assert_eq!(s.matched_keywords, 2);
        assert!((s.confidence - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_repeated_keyword_counts_once() {
        let s = suggest("rent rent RENT");
        assert_eq!(s.category, ExpenseCategory::Housing);
        assert_eq!(s.matched_keywords, 1);
    }

    #[test]
    fn test_no_match_falls_back_to_other() {
        let s = suggest("misc thing");
        assert_eq!(s.category, ExpenseCategory::Other);
        assert_eq!(s.confidence, FALLBACK_CONFIDENCE);
        assert_eq!(s.matched_keywords, 0);
    }
}
