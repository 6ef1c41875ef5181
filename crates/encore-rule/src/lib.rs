// Scoring state machine: judgments, combo, multiplier, engagement tiers.

mod engagement;
mod rank;
mod rating;
mod score_state;
mod scoring;

pub use engagement::{Engagement, SpectatorThreshold};
pub use rank::ResultRank;
pub use rating::{Rating, SegmentResult};
pub use score_state::ScoreState;
pub use scoring::{ComboResetMode, JudgeOutcome, ScoreRule, ScoringEngine};
