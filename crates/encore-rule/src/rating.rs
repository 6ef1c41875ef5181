use serde::{Deserialize, Serialize};

/// Canonical judgment taxonomy consumed by the scoring engine.
///
/// Every hit-detection source must map into this enum before calling
/// `ScoringEngine::judge`; there is no second taxonomy at the scoring
/// boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Miss,
    Good,
    Great,
    Perfect,
}

impl Rating {
    pub const COUNT: usize = 4;

    pub const ALL: [Rating; Rating::COUNT] =
        [Rating::Miss, Rating::Good, Rating::Great, Rating::Perfect];

    /// Stable index into per-rating count/bonus tables.
    pub fn index(self) -> usize {
        match self {
            Rating::Miss => 0,
            Rating::Good => 1,
            Rating::Great => 2,
            Rating::Perfect => 3,
        }
    }
}

/// Binary outcome reported by long-event segment detection.
///
/// Segment hits are pass/fail; the graded taxonomy does not apply to them.
/// The explicit conversion below is the single place the two vocabularies
/// meet: a passed segment scores as a Perfect, a dropped one as a Miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentResult {
    Failure,
    Success,
}

impl From<SegmentResult> for Rating {
    fn from(result: SegmentResult) -> Self {
        match result {
            SegmentResult::Success => Rating::Perfect,
            SegmentResult::Failure => Rating::Miss,
        }
    }
}
