use super::super::domain::Tier;

/// Lowest score (inclusive) placed in [`Tier::Tier3`].
pub const TIER3_THRESHOLD: i16 = 6;
/// Lowest score (inclusive) placed in [`Tier::Tier2`].
pub const TIER2_THRESHOLD: i16 = 4;

pub const fn tier_for_score(score: i16) -> Tier {
    if score >= TIER3_THRESHOLD {
        Tier::Tier3
    } else if score >= TIER2_THRESHOLD {
        Tier::Tier2
    } else {
        Tier::Tier1
    }
}
