//! Transaction categorization as an ordered list of strategies.
//!
//! Keyword matching runs first, an optional fallback (the LLM client in the
//! CLI crate) runs second, and the `"Other"` sentinel catches the rest.
//! A strategy returning `None` means "no opinion"; failures inside a
//! strategy must be swallowed there, so classification never fails a run.

use crate::categories::Categories;
use crate::transaction::Transaction;

/// Sentinel category for transactions no strategy could place.
pub const OTHER_CATEGORY: &str = "Other";

/// A single classification strategy.
pub trait Strategy {
    fn classify(&self, description: &str) -> Option<String>;
}

/// Keyword matcher over the configured ruleset. Returns the first category,
/// in declaration order, with a substring hit in the lowercased description.
pub struct KeywordStrategy {
    rules: Categories,
}

impl KeywordStrategy {
    pub fn new(rules: Categories) -> Self {
        Self { rules }
    }
}

impl Strategy for KeywordStrategy {
    fn classify(&self, description: &str) -> Option<String> {
        let lowered = description.to_lowercase();
        for rule in self.rules.iter() {
            if rule.keywords.iter().any(|k| lowered.contains(k.as_str())) {
                return Some(rule.name.clone());
            }
        }
        None
    }
}

/// Row-wise classifier: tries each strategy in order, defaults to
/// [`OTHER_CATEGORY`].
pub struct Classifier {
    strategies: Vec<Box<dyn Strategy>>,
}

impl Classifier {
    pub fn new(rules: Categories) -> Self {
        Self {
            strategies: vec![Box::new(KeywordStrategy::new(rules))],
        }
    }

    /// Append a fallback strategy, tried after keyword matching.
    pub fn with_fallback(mut self, fallback: Box<dyn Strategy>) -> Self {
        self.strategies.push(fallback);
        self
    }

    pub fn classify(&self, description: &str) -> String {
        for strategy in &self.strategies {
            if let Some(category) = strategy.classify(description) {
                return category;
            }
        }
        OTHER_CATEGORY.to_string()
    }

    /// Assign a category to every row in place.
    pub fn classify_rows(&self, rows: &mut [Transaction]) {
        for row in rows {
            row.category = Some(self.classify(&row.description));
        }
    }
}
