use serde::{Deserialize, Serialize};

use crate::engagement::{Engagement, SpectatorThreshold, band_tier, spectator_tier};
use crate::rating::Rating;
use crate::score_state::ScoreState;

/// What happens to the combo when a judgment fails.
///
/// The two observed behaviors in the field disagree, so the choice is a
/// named configuration rather than a silent pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComboResetMode {
    /// Combo returns to 0 on every failed judgment.
    #[default]
    HardReset,
    /// A failed judgment zeroes a positive combo, but further failures
    /// decrement below zero; the next successful hit snaps back to 1.
    DecayBelowZero,
}

/// Scoring configuration tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRule {
    /// Ascending combo thresholds; the multiplier tier is 1 plus the number
    /// of entries the combo strictly exceeds.
    pub combo_thresholds: Vec<i32>,
    /// Flat bonus added per judgment, indexed by `Rating::index`
    pub rating_bonus: [i32; Rating::COUNT],
    /// Signed band-engagement thresholds; index = tier ordinal
    pub band_thresholds: Vec<i32>,
    /// Spectator-reaction rules in ascending severity order
    pub spectator_thresholds: Vec<SpectatorThreshold>,
    pub combo_reset: ComboResetMode,
}

impl Default for ScoreRule {
    fn default() -> Self {
        Self {
            combo_thresholds: vec![100, 200, 300, 400, 500],
            // Miss, Good, Great, Perfect
            rating_bonus: [0, 5, 10, 20],
            band_thresholds: vec![0, 50, 100, 200, 400],
            spectator_thresholds: vec![
                SpectatorThreshold {
                    note_fraction: 0.0,
                    combo_threshold: 0,
                    tier: Engagement::First,
                },
                SpectatorThreshold {
                    note_fraction: 0.25,
                    combo_threshold: 50,
                    tier: Engagement::Second,
                },
                SpectatorThreshold {
                    note_fraction: 0.5,
                    combo_threshold: 150,
                    tier: Engagement::Third,
                },
                SpectatorThreshold {
                    note_fraction: 0.75,
                    combo_threshold: 300,
                    tier: Engagement::Fourth,
                },
            ],
            combo_reset: ComboResetMode::HardReset,
        }
    }
}

/// Edge-triggered notifications produced by one `judge` call.
///
/// A field is `Some` only when that tier actually changed; feeding results
/// that keep the combo inside the same tier produces no notifications.
/// Downstream animation collaborators rely on this contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JudgeOutcome {
    pub band_changed: Option<Engagement>,
    pub spectator_changed: Option<Engagement>,
}

/// The scoring engine: a pure state machine over `ScoreState`.
///
/// `judge` is the single mutating operation. Calls must be serialized by
/// the owner (`&mut self` enforces this within one session); concurrent
/// hit-detection sources fan in through a single queue upstream.
pub struct ScoringEngine {
    rule: ScoreRule,
    state: ScoreState,
    band: Engagement,
    spectator: Engagement,
}

impl ScoringEngine {
    pub fn new(rule: ScoreRule, total_notes: i32) -> Self {
        let state = ScoreState::new(total_notes);
        let band = band_tier(&rule.band_thresholds, state.combo());
        let spectator = spectator_tier(
            &rule.spectator_thresholds,
            state.hit_count(),
            state.combo(),
            state.total_notes(),
        );
        Self {
            rule,
            state,
            band,
            spectator,
        }
    }

    pub fn state(&self) -> &ScoreState {
        &self.state
    }

    pub fn band_engagement(&self) -> Engagement {
        self.band
    }

    pub fn spectator_engagement(&self) -> Engagement {
        self.spectator
    }

    /// Consume one judgment result.
    ///
    /// A non-positive raw score or a Miss rating breaks the combo and
    /// resets the multiplier tier; anything else extends the combo and
    /// accumulates `raw_score * multiplier + bonus`.
    pub fn judge(&mut self, raw_score: f32, rating: Rating) -> JudgeOutcome {
        self.state.add_rating(rating);

        if raw_score <= 0.0 || rating == Rating::Miss {
            self.state.set_multiplier(1);
            let combo = self.state.combo();
            let next = match self.rule.combo_reset {
                ComboResetMode::HardReset => 0,
                ComboResetMode::DecayBelowZero => {
                    if combo > 0 {
                        0
                    } else {
                        combo - 1
                    }
                }
            };
            self.state.set_combo(next);
        } else {
            let combo = self.state.combo();
            self.state.set_combo(if combo >= 0 { combo + 1 } else { 1 });
            self.state.add_hit();

            let multiplier = self.multiplier_for(self.state.combo());
            self.state.set_multiplier(multiplier);

            let bonus = self.rule.rating_bonus[rating.index()];
            self.state
                .add_score(raw_score * multiplier as f32 + bonus as f32);
        }

        JudgeOutcome {
            band_changed: self.refresh_band(),
            spectator_changed: self.refresh_spectator(),
        }
    }

    /// 1 plus the number of ascending thresholds the combo strictly exceeds.
    fn multiplier_for(&self, combo: i32) -> i32 {
        let exceeded = self
            .rule
            .combo_thresholds
            .iter()
            .filter(|&&t| combo > t)
            .count();
        1 + exceeded as i32
    }

    fn refresh_band(&mut self) -> Option<Engagement> {
        let next = band_tier(&self.rule.band_thresholds, self.state.combo());
        if next != self.band {
            log::debug!("band engagement {:?} -> {:?}", self.band, next);
            self.band = next;
            Some(next)
        } else {
            None
        }
    }

    fn refresh_spectator(&mut self) -> Option<Engagement> {
        let next = spectator_tier(
            &self.rule.spectator_thresholds,
            self.state.hit_count(),
            self.state.combo(),
            self.state.total_notes(),
        );
        if next != self.spectator {
            log::debug!("spectator engagement {:?} -> {:?}", self.spectator, next);
            self.spectator = next;
            Some(next)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> ScoringEngine {
        ScoringEngine::new(ScoreRule::default(), 1000)
    }

    #[test]
    fn hits_extend_combo_by_one() {
        let mut engine = engine();
        for i in 1..=20 {
            engine.judge(100.0, Rating::Perfect);
            assert_eq!(engine.state().combo(), i);
        }
        assert_eq!(engine.state().high_combo(), 20);
        assert_eq!(engine.state().hit_count(), 20);
    }

    #[test]
    fn multiplier_is_one_plus_thresholds_exceeded() {
        let mut engine = engine();
        // Drive the combo to 150 without caring about score.
        for _ in 0..150 {
            engine.judge(1.0, Rating::Perfect);
        }
        // combo 150 strictly exceeds only the 100 threshold
        assert_eq!(engine.state().multiplier(), 2);
    }

    #[test]
    fn score_accumulates_raw_times_multiplier_plus_bonus() {
        let rule = ScoreRule::default();
        let mut engine = ScoringEngine::new(rule, 1000);
        for _ in 0..150 {
            engine.judge(1.0, Rating::Perfect);
        }
        let before = engine.state().score();
        engine.judge(100.0, Rating::Perfect);
        // combo 151, tier 2, Perfect bonus 20: 100 * 2 + 20
        assert_eq!(engine.state().score() - before, 220.0);
    }

    #[test]
    fn miss_resets_multiplier_and_combo() {
        let mut engine = engine();
        for _ in 0..120 {
            engine.judge(100.0, Rating::Perfect);
        }
        assert_eq!(engine.state().multiplier(), 2);

        engine.judge(0.0, Rating::Miss);
        assert_eq!(engine.state().combo(), 0);
        assert_eq!(engine.state().multiplier(), 1);
        assert_eq!(engine.state().high_combo(), 120);
    }

    #[test]
    fn zero_score_breaks_combo_even_without_miss_rating() {
        let mut engine = engine();
        engine.judge(100.0, Rating::Great);
        engine.judge(0.0, Rating::Good);
        assert_eq!(engine.state().combo(), 0);
        // The rating is still counted.
        assert_eq!(engine.state().rating_count(Rating::Good), 1);
    }

    #[test]
    fn miss_never_adds_score_or_hits() {
        let mut engine = engine();
        engine.judge(100.0, Rating::Miss);
        assert_eq!(engine.state().score(), 0.0);
        assert_eq!(engine.state().hit_count(), 0);
        assert_eq!(engine.state().rating_count(Rating::Miss), 1);
    }

    #[test]
    fn hard_reset_keeps_combo_at_zero() {
        let mut engine = engine();
        engine.judge(0.0, Rating::Miss);
        engine.judge(0.0, Rating::Miss);
        engine.judge(0.0, Rating::Miss);
        assert_eq!(engine.state().combo(), 0);
        engine.judge(100.0, Rating::Perfect);
        assert_eq!(engine.state().combo(), 1);
    }

    #[test]
    fn decay_mode_decrements_below_zero_and_snaps_back() {
        let rule = ScoreRule {
            combo_reset: ComboResetMode::DecayBelowZero,
            ..ScoreRule::default()
        };
        let mut engine = ScoringEngine::new(rule, 1000);

        engine.judge(100.0, Rating::Perfect);
        engine.judge(100.0, Rating::Perfect);
        assert_eq!(engine.state().combo(), 2);

        engine.judge(0.0, Rating::Miss);
        assert_eq!(engine.state().combo(), 0);
        engine.judge(0.0, Rating::Miss);
        assert_eq!(engine.state().combo(), -1);
        engine.judge(0.0, Rating::Miss);
        assert_eq!(engine.state().combo(), -2);

        // Recovery snaps to 1, not to -1.
        engine.judge(100.0, Rating::Perfect);
        assert_eq!(engine.state().combo(), 1);
    }

    #[test]
    fn band_notification_fires_only_on_tier_change() {
        let mut engine = engine();
        let mut notifications = 0;
        for _ in 0..60 {
            if engine.judge(100.0, Rating::Perfect).band_changed.is_some() {
                notifications += 1;
            }
        }
        // Thresholds [0, 50, 100, 200, 400]: one transition at combo 50.
        assert_eq!(notifications, 1);
        assert_eq!(engine.band_engagement(), Engagement::Second);
    }

    #[test]
    fn repeated_judgments_within_a_tier_stay_silent() {
        let mut engine = engine();
        for _ in 0..49 {
            engine.judge(100.0, Rating::Perfect);
        }
        // Combo sits at 49; the next judgments cross no threshold until 50.
        let outcome = engine.judge(0.0, Rating::Miss);
        // Combo back to 0 keeps tier First: still silent.
        assert_eq!(outcome.band_changed, None);
        assert_eq!(outcome.spectator_changed, None);
    }

    #[test]
    fn spectator_notification_requires_both_conditions() {
        let rule = ScoreRule {
            spectator_thresholds: vec![
                SpectatorThreshold {
                    note_fraction: 0.0,
                    combo_threshold: 0,
                    tier: Engagement::First,
                },
                SpectatorThreshold {
                    note_fraction: 0.5,
                    combo_threshold: 5,
                    tier: Engagement::Second,
                },
            ],
            ..ScoreRule::default()
        };
        let mut engine = ScoringEngine::new(rule, 10);

        let mut changed = None;
        for _ in 0..5 {
            let outcome = engine.judge(100.0, Rating::Perfect);
            if outcome.spectator_changed.is_some() {
                changed = outcome.spectator_changed;
            }
        }
        // 5 hits of 10 notes and combo 5 satisfy the second rule exactly once.
        assert_eq!(changed, Some(Engagement::Second));
        assert_eq!(engine.spectator_engagement(), Engagement::Second);
    }

    #[test]
    fn initial_tiers_match_zero_combo_state() {
        let engine = engine();
        assert_eq!(engine.band_engagement(), Engagement::First);
        assert_eq!(engine.spectator_engagement(), Engagement::First);
    }
}
