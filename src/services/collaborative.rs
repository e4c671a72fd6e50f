//! User-user collaborative filtering over implicit interaction signals
//!
//! Data flow:
//!   interaction log → user×event weight matrix (mean per cell)
//!                   → cosine similarity against the target row
//!                   → top-K neighbours → their unseen events, scored
//!
//! Two weight tables apply. Matrix weights describe how engaged a user was with
//! an event; contribution weights describe how much a neighbour's behaviour
//! counts when propagated to someone else.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use crate::models::{
    recommendation::sort_by_score_desc, EventCandidate, EventId, InteractionRecord,
    InteractionType, Recommendation, RecommendationSource, UserId,
};

pub const DEFAULT_NEIGHBOURS: usize = 10;

/// Engagement intensity used when building the matrix
pub fn matrix_weight(interaction_type: &InteractionType) -> f64 {
    match interaction_type {
        InteractionType::View => 0.5,
        InteractionType::Click => 0.7,
        InteractionType::Join | InteractionType::Bookmark => 1.0,
        _ => 1.0,
    }
}

/// Trust in a neighbour's interaction when scoring it for the target user
pub fn contribution_weight(interaction_type: &InteractionType) -> f64 {
    match interaction_type {
        InteractionType::View => 0.3,
        InteractionType::Click => 0.5,
        InteractionType::Join => 1.0,
        InteractionType::Bookmark => 0.8,
        _ => 0.5,
    }
}

/// One user's sparse row: event → mean matrix weight
pub type Row = HashMap<EventId, f64>;

/// Sparse user×event matrix of mean matrix weights
#[derive(Debug, Clone, Default)]
pub struct InteractionMatrix {
    /// Users in order of first appearance in the log
    users: Vec<UserId>,
    rows: HashMap<UserId, Row>,
}

impl InteractionMatrix {
    pub fn from_interactions(interactions: &[InteractionRecord]) -> Self {
        let mut users = Vec::new();
        let mut cells: HashMap<UserId, HashMap<EventId, (f64, u32)>> = HashMap::new();

        for interaction in interactions {
            let row = cells.entry(interaction.user_id).or_insert_with(|| {
                users.push(interaction.user_id);
                HashMap::new()
            });
            let cell = row.entry(interaction.event_id).or_insert((0.0, 0));
            cell.0 += matrix_weight(&interaction.interaction_type);
            cell.1 += 1;
        }

        let rows = cells
            .into_iter()
            .map(|(user_id, row)| {
                let means = row
                    .into_iter()
                    .map(|(event_id, (sum, count))| (event_id, sum / count as f64))
                    .collect();
                (user_id, means)
            })
            .collect();

        Self { users, rows }
    }

    pub fn row(&self, user_id: UserId) -> Option<&Row> {
        self.rows.get(&user_id)
    }

    /// Cosine similarity between two users' rows, 0 when either is missing
    pub fn similarity(&self, a: UserId, b: UserId) -> f64 {
        match (self.row(a), self.row(b)) {
            (Some(a), Some(b)) => cosine_similarity(a, b),
            _ => 0.0,
        }
    }

    /// Users with positive similarity to `user_id`, most similar first
    ///
    /// Ties keep first-appearance order; beyond that no ordering is promised.
    pub fn similar_users(&self, user_id: UserId, k: usize) -> Vec<(UserId, f64)> {
        let Some(target) = self.row(user_id) else {
            return Vec::new();
        };

        let mut similar: Vec<(UserId, f64)> = self
            .users
            .iter()
            .filter(|&&other| other != user_id)
            .filter_map(|other| {
                let similarity = cosine_similarity(target, &self.rows[other]);
                (similarity > 0.0).then_some((*other, similarity))
            })
            .collect();

        similar.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        similar.truncate(k);
        similar
    }
}

/// Formula: cos(A, B) = (A · B) / (||A|| × ||B||)
pub fn cosine_similarity(a: &Row, b: &Row) -> f64 {
    let dot: f64 = a
        .iter()
        .filter_map(|(event_id, wa)| b.get(event_id).map(|wb| wa * wb))
        .sum();
    let norm_a = a.values().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.values().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// User-based collaborative filter
#[derive(Debug, Clone, Copy)]
pub struct CollaborativeFilter {
    neighbours: usize,
}

impl Default for CollaborativeFilter {
    fn default() -> Self {
        Self::new(DEFAULT_NEIGHBOURS)
    }
}

impl CollaborativeFilter {
    pub fn new(neighbours: usize) -> Self {
        Self { neighbours }
    }

    /// Recommends candidate events that similar users engaged with
    ///
    /// Algorithm:
    /// 1. Build the matrix; a user without a row gets nothing
    /// 2. Keep the top-K positively similar users
    /// 3. For each of their interactions on an event the target has not touched:
    ///    score += similarity × contribution_weight, count += 1
    /// 4. Final score = min(score / count, 1.0), restricted to `candidates`
    pub fn recommend(
        &self,
        user_id: UserId,
        interactions: &[InteractionRecord],
        candidates: &[EventCandidate],
    ) -> Vec<Recommendation> {
        let matrix = InteractionMatrix::from_interactions(interactions);

        let Some(target_row) = matrix.row(user_id) else {
            debug!(user_id = %user_id, "No interactions for user, skipping collaborative filtering");
            return Vec::new();
        };
        let seen: HashSet<EventId> = target_row.keys().copied().collect();

        let similar: HashMap<UserId, f64> = matrix
            .similar_users(user_id, self.neighbours)
            .into_iter()
            .collect();

        if similar.is_empty() {
            info!(user_id = %user_id, "No similar users found for collaborative filtering");
            return Vec::new();
        }

        let mut event_scores: HashMap<EventId, (f64, u32)> = HashMap::new();
        for interaction in interactions {
            let Some(similarity) = similar.get(&interaction.user_id) else {
                continue;
            };
            if seen.contains(&interaction.event_id) {
                continue;
            }

            let entry = event_scores.entry(interaction.event_id).or_insert((0.0, 0));
            entry.0 += similarity * contribution_weight(&interaction.interaction_type);
            entry.1 += 1;
        }

        let mut recommendations: Vec<Recommendation> = candidates
            .iter()
            .filter_map(|event| {
                let (score, count) = event_scores.get(&event.id)?;
                let mean = score / *count as f64;
                Some(Recommendation::new(
                    event.clone(),
                    mean.min(1.0),
                    RecommendationSource::Collaborative,
                ))
            })
            .collect();

        sort_by_score_desc(&mut recommendations);

        info!(
            user_id = %user_id,
            similar_users = similar.len(),
            scored_events = event_scores.len(),
            recommendations = recommendations.len(),
            "Collaborative filtering recommendations generated"
        );

        recommendations
    }
}
