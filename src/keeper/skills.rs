//! Keeper skill rolls

use rand::Rng;

use crate::tuning::PenaltyTweaks;

/// Per-round keeper attributes, each roughly in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeeperSkills {
    pub reflexes: f32,
    pub positioning: f32,
    pub reach: f32,
}

impl Default for KeeperSkills {
    /// Midpoint keeper
    fn default() -> Self {
        Self {
            reflexes: 0.75,
            positioning: 0.7,
            reach: 0.8,
        }
    }
}

impl KeeperSkills {
    /// Roll a fresh keeper from the tuning ranges
    pub fn roll(tweaks: &PenaltyTweaks, rng: &mut impl Rng) -> Self {
        Self {
            reflexes: roll_in(tweaks.keeper_reflexes, rng),
            positioning: roll_in(tweaks.keeper_positioning, rng),
            reach: roll_in(tweaks.keeper_reach, rng),
        }
    }
}

/// Uniform roll in [min, max). A degenerate range returns `min`.
pub fn roll_in(range: (f32, f32), rng: &mut impl Rng) -> f32 {
    let (min, max) = range;
    if max <= min {
        min
    } else {
        rng.gen_range(min..max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_rolls_stay_in_range() {
        let tweaks = PenaltyTweaks::default();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..500 {
            let s = KeeperSkills::roll(&tweaks, &mut rng);
            assert!((0.6..0.9).contains(&s.reflexes));
            assert!((0.5..0.9).contains(&s.positioning));
            assert!((0.7..0.9).contains(&s.reach));
        }
    }

    #[test]
    fn test_degenerate_range() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(roll_in((0.4, 0.4), &mut rng), 0.4);
        assert_eq!(roll_in((0.9, 0.1), &mut rng), 0.9);
    }
}
