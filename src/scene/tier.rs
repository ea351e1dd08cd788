//! Viewport-adaptive size tiers
//!
//! Bigger screens get bigger blocks, thicker accents and more of everything.

use serde::{Deserialize, Serialize};

use crate::Viewport;

/// Sizing bundle derived from viewport area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeTier {
    /// Base block side length (px)
    pub unit: f32,
    /// Accent stroke width (px)
    pub line_width: u32,
    /// Population multiplier applied to every group's base count
    pub ratio: u32,
}

/// (area strictly greater than, tier), highest threshold first
const TIERS: [(u64, SizeTier); 4] = [
    (
        2_000_000,
        SizeTier {
            unit: 140.0,
            line_width: 8,
            ratio: 4,
        },
    ),
    (
        1_200_000,
        SizeTier {
            unit: 130.0,
            line_width: 6,
            ratio: 3,
        },
    ),
    (
        900_000,
        SizeTier {
            unit: 120.0,
            line_width: 4,
            ratio: 2,
        },
    ),
    (
        400_000,
        SizeTier {
            unit: 80.0,
            line_width: 3,
            ratio: 2,
        },
    ),
];

/// Tier for viewports at or below the smallest threshold
const SMALLEST: SizeTier = SizeTier {
    unit: 60.0,
    line_width: 2,
    ratio: 2,
};

impl SizeTier {
    /// First tier whose threshold the area exceeds
    pub fn for_area(area: u64) -> Self {
        TIERS
            .iter()
            .find(|(threshold, _)| area > *threshold)
            .map(|(_, tier)| *tier)
            .unwrap_or(SMALLEST)
    }

    pub fn for_viewport(viewport: Viewport) -> Self {
        Self::for_area(viewport.area())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_tier_examples() {
        assert_eq!(SizeTier::for_area(500_000).unit, 80.0);
        assert_eq!(SizeTier::for_area(1_000_000).unit, 120.0);
        assert_eq!(SizeTier::for_area(3_000_000).unit, 140.0);
        assert_eq!(SizeTier::for_area(3_000_000).ratio, 4);
        assert_eq!(SizeTier::for_area(1_500_000).ratio, 3);
        assert_eq!(SizeTier::for_area(1).unit, 60.0);
    }

    #[test]
    fn test_thresholds_are_exclusive() {
        assert_eq!(SizeTier::for_area(2_000_000).unit, 130.0);
        assert_eq!(SizeTier::for_area(2_000_001).unit, 140.0);
        assert_eq!(SizeTier::for_area(400_000), SMALLEST);
        assert_eq!(SizeTier::for_area(400_001).line_width, 3);
    }

    #[test]
    fn test_for_viewport_uses_area() {
        // 1280x800 = 1,024,000
        let tier = SizeTier::for_viewport(Viewport::new(1280, 800));
        assert_eq!(tier.unit, 120.0);
        assert_eq!(tier.line_width, 4);
        assert_eq!(tier.ratio, 2);
    }

    proptest! {
        #[test]
        fn prop_tier_is_monotonic(a in 1u64..5_000_000, b in 1u64..5_000_000) {
            let (small, large) = if a <= b { (a, b) } else { (b, a) };
            let lo = SizeTier::for_area(small);
            let hi = SizeTier::for_area(large);
            prop_assert!(lo.unit <= hi.unit);
            prop_assert!(lo.line_width <= hi.line_width);
            prop_assert!(lo.ratio <= hi.ratio);
        }
    }
}
