use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A declared user interest
///
/// Duplicates by (category, subcategory) are merged by the owning store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InterestRecord {
    pub category: String,
    pub subcategory: String,
    /// In [0, 1]
    #[serde(default = "default_strength")]
    pub strength: f64,
}

fn default_strength() -> f64 {
    1.0
}

impl InterestRecord {
    pub fn new(category: impl Into<String>, subcategory: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            subcategory: subcategory.into(),
            strength: default_strength(),
        }
    }
}

/// Lower-cased lookup sets derived from a user's interests
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterestMap {
    pub categories: HashSet<String>,
    pub subcategories: HashSet<String>,
}

impl InterestMap {
    pub fn from_interests(interests: &[InterestRecord]) -> Self {
        let mut map = Self::default();

        for interest in interests {
            let category = interest.category.trim();
            if !category.is_empty() {
                map.categories.insert(category.to_lowercase());
            }
            let subcategory = interest.subcategory.trim();
            if !subcategory.is_empty() {
                map.subcategories.insert(subcategory.to_lowercase());
            }
        }

        map
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.subcategories.is_empty()
    }
}
