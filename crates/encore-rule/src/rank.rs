use serde::{Deserialize, Serialize};

use crate::rating::Rating;
use crate::score_state::ScoreState;

/// End-of-session rank shown on the result screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultRank {
    SPlus,
    S,
    A,
    B,
    C,
}

impl ResultRank {
    /// Derive the rank from a finished session's state.
    ///
    /// A full-hit session ranks S+ when flawless and S when it contains
    /// Goods; otherwise the miss rate against the chart's total notes
    /// decides the letter.
    pub fn from_state(state: &ScoreState) -> Self {
        let miss = state.rating_count(Rating::Miss);
        let good = state.rating_count(Rating::Good);
        let total = state.total_notes();
        let full_hit = state.hit_count() == total;

        if miss == 0 && good == 0 && full_hit {
            ResultRank::SPlus
        } else if miss == 0 && good > 0 && full_hit {
            ResultRank::S
        } else if (miss as f32) < total as f32 * 0.05 {
            ResultRank::A
        } else if miss as f32 <= total as f32 * 0.5 {
            ResultRank::B
        } else {
            ResultRank::C
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{ScoreRule, ScoringEngine};

    fn play(total: i32, perfects: i32, goods: i32, misses: i32) -> ScoreState {
        let mut engine = ScoringEngine::new(ScoreRule::default(), total);
        for _ in 0..perfects {
            engine.judge(100.0, Rating::Perfect);
        }
        for _ in 0..goods {
            engine.judge(100.0, Rating::Good);
        }
        for _ in 0..misses {
            engine.judge(0.0, Rating::Miss);
        }
        engine.state().clone()
    }

    #[test]
    fn flawless_full_hit_ranks_s_plus() {
        let state = play(20, 20, 0, 0);
        assert_eq!(ResultRank::from_state(&state), ResultRank::SPlus);
    }

    #[test]
    fn full_hit_with_goods_ranks_s() {
        let state = play(20, 18, 2, 0);
        assert_eq!(ResultRank::from_state(&state), ResultRank::S);
    }

    #[test]
    fn few_misses_rank_a() {
        let state = play(100, 96, 0, 4);
        assert_eq!(ResultRank::from_state(&state), ResultRank::A);
    }

    #[test]
    fn a_boundary_is_strict() {
        // 5 misses of 100 is not below the 5% line.
        let state = play(100, 95, 0, 5);
        assert_eq!(ResultRank::from_state(&state), ResultRank::B);
    }

    #[test]
    fn half_missed_still_ranks_b() {
        let state = play(100, 50, 0, 50);
        assert_eq!(ResultRank::from_state(&state), ResultRank::B);
    }

    #[test]
    fn mostly_missed_ranks_c() {
        let state = play(100, 30, 0, 70);
        assert_eq!(ResultRank::from_state(&state), ResultRank::C);
    }
}
