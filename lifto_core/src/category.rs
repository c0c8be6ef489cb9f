//! Keyword table mapping day headers to lift categories.
//!
//! The table is plain data: config files append rows, and the first row
//! whose keyword appears in the lower-cased header wins.

use crate::{Category, Lift};
use serde::{Deserialize, Serialize};

/// One keyword → category row
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct KeywordRule {
    pub keyword: String,
    pub category: String,
}

/// Ordered keyword rules used to infer a day's category
#[derive(Clone, Debug)]
pub struct CategoryTable {
    rules: Vec<(String, Category)>,
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self {
            rules: vec![
                ("squat".into(), Category::Lift(Lift::Squat)),
                ("bench".into(), Category::Lift(Lift::Bench)),
                ("deadlift".into(), Category::Lift(Lift::Deadlift)),
            ],
        }
    }
}

impl CategoryTable {
    /// Built-in rules followed by `extra` rows.
    pub fn with_rules(extra: &[KeywordRule]) -> Self {
        let mut table = Self::default();
        for rule in extra {
            table.push(&rule.keyword, Category::from_name(&rule.category));
        }
        table
    }

    pub fn push(&mut self, keyword: &str, category: Category) {
        let keyword = keyword.trim().to_lowercase();
        if keyword.is_empty() {
            tracing::warn!("Ignoring empty category keyword for {}", category);
            return;
        }
        self.rules.push((keyword, category));
    }

    /// Infer the category for a day header label.
    pub fn infer(&self, label: &str) -> Category {
        let lowered = label.to_lowercase();
        self.rules
            .iter()
            .find(|(keyword, _)| lowered.contains(keyword.as_str()))
            .map(|(_, category)| category.clone())
            .unwrap_or_else(|| Category::Other(label.trim().to_string()))
    }
}
