use serde::{Deserialize, Serialize};

use crate::rating::Rating;

/// Score data for a single play session.
///
/// Mutated only by the scoring engine's judgment intake; read by UI,
/// result, and multiplayer-exchange collaborators through the accessors
/// (the exchange layer serializes fields individually).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreState {
    /// Accumulated score
    score: f32,
    /// Consecutive successful judgments. May go negative under
    /// `ComboResetMode::DecayBelowZero`.
    combo: i32,
    /// Best combo reached this session
    high_combo: i32,
    /// Current score multiplier tier (1-based)
    multiplier: i32,
    /// Judgment counts indexed by `Rating::index`
    rating_counts: [i32; Rating::COUNT],
    /// Successful (non-miss) hits
    hit_count: i32,
    /// Total judgeable events in the chart
    total_notes: i32,
}

impl ScoreState {
    pub fn new(total_notes: i32) -> Self {
        Self {
            score: 0.0,
            combo: 0,
            high_combo: 0,
            multiplier: 1,
            rating_counts: [0; Rating::COUNT],
            hit_count: 0,
            total_notes,
        }
    }

    pub fn score(&self) -> f32 {
        self.score
    }

    pub fn combo(&self) -> i32 {
        self.combo
    }

    pub fn high_combo(&self) -> i32 {
        self.high_combo
    }

    pub fn multiplier(&self) -> i32 {
        self.multiplier
    }

    pub fn rating_count(&self, rating: Rating) -> i32 {
        self.rating_counts[rating.index()]
    }

    pub fn hit_count(&self) -> i32 {
        self.hit_count
    }

    pub fn total_notes(&self) -> i32 {
        self.total_notes
    }

    /// Total judgments received, misses included.
    pub fn total_judged(&self) -> i32 {
        self.rating_counts.iter().sum()
    }

    pub(crate) fn add_rating(&mut self, rating: Rating) {
        self.rating_counts[rating.index()] += 1;
    }

    pub(crate) fn set_combo(&mut self, combo: i32) {
        self.combo = combo;
        if combo > self.high_combo {
            self.high_combo = combo;
        }
    }

    pub(crate) fn set_multiplier(&mut self, multiplier: i32) {
        self.multiplier = multiplier;
    }

    pub(crate) fn add_score(&mut self, amount: f32) {
        self.score += amount;
    }

    pub(crate) fn add_hit(&mut self) {
        self.hit_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_zeroed_with_all_ratings_present() {
        let state = ScoreState::new(40);
        assert_eq!(state.score(), 0.0);
        assert_eq!(state.combo(), 0);
        assert_eq!(state.high_combo(), 0);
        assert_eq!(state.multiplier(), 1);
        assert_eq!(state.hit_count(), 0);
        assert_eq!(state.total_notes(), 40);
        for rating in Rating::ALL {
            assert_eq!(state.rating_count(rating), 0);
        }
    }

    #[test]
    fn high_combo_tracks_running_maximum() {
        let mut state = ScoreState::new(10);
        state.set_combo(3);
        assert_eq!(state.high_combo(), 3);
        state.set_combo(0);
        assert_eq!(state.high_combo(), 3);
        state.set_combo(7);
        assert_eq!(state.high_combo(), 7);
    }

    #[test]
    fn total_judged_counts_misses() {
        let mut state = ScoreState::new(10);
        state.add_rating(Rating::Perfect);
        state.add_rating(Rating::Perfect);
        state.add_rating(Rating::Miss);
        assert_eq!(state.total_judged(), 3);
        assert_eq!(state.rating_count(Rating::Perfect), 2);
        assert_eq!(state.rating_count(Rating::Miss), 1);
    }

    #[test]
    fn serde_round_trip() {
        let mut state = ScoreState::new(100);
        state.add_rating(Rating::Great);
        state.set_combo(12);
        state.add_score(340.0);
        state.add_hit();

        let json = serde_json::to_string(&state).unwrap();
        let back: ScoreState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
