use std::collections::HashSet;

use crate::models::{EventCandidate, InterestMap};

pub const SUBCATEGORY_MATCH: f64 = 1.0;
pub const CATEGORY_MATCH: f64 = 0.8;
pub const DESCRIPTION_SUBCATEGORY_MATCH: f64 = 0.6;
pub const DESCRIPTION_CATEGORY_MATCH: f64 = 0.5;
pub const NO_INTERESTS: f64 = 0.5;
pub const NO_MATCH: f64 = 0.3;

/// Scores how well an event fits the user's declared interests
///
/// Structural matches (subcategory, then category) always outrank textual hits in
/// the description. Comparisons are case-insensitive; the map is expected to hold
/// lower-cased tokens.
pub fn interest_match_score(event: &EventCandidate, interests: &InterestMap) -> f64 {
    if interests.is_empty() {
        return NO_INTERESTS;
    }

    let matches = |value: &Option<String>, set: &HashSet<String>| {
        value
            .as_deref()
            .map(|v| set.contains(&v.trim().to_lowercase()))
            .unwrap_or(false)
    };

    if matches(&event.subcategory, &interests.subcategories) {
        return SUBCATEGORY_MATCH;
    }
    if matches(&event.category, &interests.categories) {
        return CATEGORY_MATCH;
    }

    if let Some(description) = event.description.as_deref() {
        let description = description.to_lowercase();
        if interests
            .subcategories
            .iter()
            .any(|token| description.contains(token.as_str()))
        {
            return DESCRIPTION_SUBCATEGORY_MATCH;
        }
        if interests
            .categories
            .iter()
            .any(|token| description.contains(token.as_str()))
        {
            return DESCRIPTION_CATEGORY_MATCH;
        }
    }

    NO_MATCH
}
