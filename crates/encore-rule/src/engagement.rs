use serde::{Deserialize, Serialize};

/// Audience/band reaction level, mildest first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Engagement {
    #[default]
    First,
    Second,
    Third,
    Fourth,
    Fifth,
    Sixth,
    Seventh,
    Eighth,
    Ninth,
    Tenth,
}

impl Engagement {
    pub const COUNT: usize = 10;

    /// Tier for a threshold-table index. Indices past the last tier clamp
    /// to the most severe one.
    pub fn from_index(index: usize) -> Self {
        use Engagement::*;
        const TIERS: [Engagement; Engagement::COUNT] = [
            First, Second, Third, Fourth, Fifth, Sixth, Seventh, Eighth, Ninth, Tenth,
        ];
        TIERS[index.min(Engagement::COUNT - 1)]
    }
}

/// One spectator-reaction activation rule.
///
/// A rule holds when the hit count reaches `note_fraction` of the chart's
/// total notes and the combo requirement is met (a non-positive
/// `combo_threshold` disables the combo requirement).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectatorThreshold {
    /// Fraction of the chart's total notes that must have been hit
    pub note_fraction: f32,
    /// Minimum combo; <= 0 means no combo requirement
    pub combo_threshold: i32,
    /// Tier this rule activates
    pub tier: Engagement,
}

impl SpectatorThreshold {
    pub fn holds(&self, hit_count: i32, combo: i32, total_notes: i32) -> bool {
        let over_count = hit_count as f32 >= total_notes as f32 * self.note_fraction;
        let over_combo = combo >= self.combo_threshold || self.combo_threshold <= 0;
        over_count && over_combo
    }
}

/// Select the band tier for a combo from a signed threshold table.
///
/// The table index is the tier ordinal. Positive thresholds hold when
/// `combo >= t`, negative ones when `combo <= t`; among the holding entries
/// the highest magnitude wins (later index breaks ties). Falls back to the
/// first tier when nothing holds or the table is empty.
pub(crate) fn band_tier(thresholds: &[i32], combo: i32) -> Engagement {
    thresholds
        .iter()
        .enumerate()
        .filter(|&(_, &t)| if t >= 0 { combo >= t } else { combo <= t })
        .max_by_key(|&(i, &t)| (t.abs(), i))
        .map(|(i, _)| Engagement::from_index(i))
        .unwrap_or(Engagement::First)
}

/// Select the spectator tier: the last rule (in ascending severity order)
/// whose conditions hold, defaulting to the first rule's tier.
pub(crate) fn spectator_tier(
    thresholds: &[SpectatorThreshold],
    hit_count: i32,
    combo: i32,
    total_notes: i32,
) -> Engagement {
    let mut selected = thresholds.first().map(|t| t.tier).unwrap_or_default();
    for threshold in thresholds {
        if threshold.holds(hit_count, combo, total_notes) {
            selected = threshold.tier;
        }
    }
    selected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_index_clamps_past_last_tier() {
        assert_eq!(Engagement::from_index(0), Engagement::First);
        assert_eq!(Engagement::from_index(3), Engagement::Fourth);
        assert_eq!(Engagement::from_index(9), Engagement::Tenth);
        assert_eq!(Engagement::from_index(25), Engagement::Tenth);
    }

    #[test]
    fn band_tier_picks_highest_matching_threshold() {
        let thresholds = [0, 50, 100, 200];
        assert_eq!(band_tier(&thresholds, 0), Engagement::First);
        assert_eq!(band_tier(&thresholds, 75), Engagement::Second);
        assert_eq!(band_tier(&thresholds, 100), Engagement::Third);
        assert_eq!(band_tier(&thresholds, 500), Engagement::Fourth);
    }

    #[test]
    fn band_tier_negative_thresholds_match_low_combo() {
        // Index 3 activates when the combo has decayed to -5 or lower.
        let thresholds = [0, 50, 100, -5];
        assert_eq!(band_tier(&thresholds, -6), Engagement::Fourth);
        assert_eq!(band_tier(&thresholds, -5), Engagement::Fourth);
        assert_eq!(band_tier(&thresholds, -4), Engagement::First);
        assert_eq!(band_tier(&thresholds, 60), Engagement::Second);
    }

    #[test]
    fn band_tier_empty_table_defaults_to_first() {
        assert_eq!(band_tier(&[], 1000), Engagement::First);
    }

    #[test]
    fn spectator_tier_takes_last_holding_rule() {
        let rules = [
            SpectatorThreshold {
                note_fraction: 0.0,
                combo_threshold: 0,
                tier: Engagement::First,
            },
            SpectatorThreshold {
                note_fraction: 0.25,
                combo_threshold: 10,
                tier: Engagement::Second,
            },
            SpectatorThreshold {
                note_fraction: 0.5,
                combo_threshold: 30,
                tier: Engagement::Third,
            },
        ];
        // 40 hits of 100 notes, combo 15: rule 2 holds, rule 3 does not.
        assert_eq!(spectator_tier(&rules, 40, 15, 100), Engagement::Second);
        // 60 hits, combo 35: all hold, last wins.
        assert_eq!(spectator_tier(&rules, 60, 35, 100), Engagement::Third);
        // Nothing beyond the base rule holds.
        assert_eq!(spectator_tier(&rules, 1, 1, 100), Engagement::First);
    }

    #[test]
    fn spectator_rule_ignores_combo_when_disabled() {
        let rule = SpectatorThreshold {
            note_fraction: 0.5,
            combo_threshold: 0,
            tier: Engagement::Second,
        };
        assert!(rule.holds(50, 0, 100));
        assert!(!rule.holds(49, 100, 100));
    }
}
