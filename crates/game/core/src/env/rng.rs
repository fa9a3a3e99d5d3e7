//! RNG oracle for deterministic random number generation.
//!
//! Every random decision in an encounter (hit rolls, criticals, effect
//! chances, NPC choices) is derived from the episode seed, a per-action nonce,
//! the acting combatant and a [`RollContext`]. Replaying the same seed and the
//! same agent actions reproduces the episode exactly.

/// RNG oracle for deterministic random number generation.
///
/// Implementations must be deterministic and produce the same values
/// given the same seed.
pub trait RngOracle: Send + Sync {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Roll a d100 (1-100 inclusive).
    fn roll_d100(&self, seed: u64) -> u32 {
        (self.next_u32(seed) % 100) + 1
    }

    /// Percentage check: `true` with probability `percent / 100`.
    ///
    /// 0 never succeeds, 100 or more always does.
    fn chance(&self, seed: u64, percent: u32) -> bool {
        self.roll_d100(seed) <= percent
    }

    /// Uniform index in `0..len`. Returns 0 for empty ranges.
    fn pick_index(&self, seed: u64, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        (self.next_u32(seed) as usize) % len
    }

    /// Uniform float in `[0, 1)`.
    fn unit(&self, seed: u64) -> f64 {
        self.next_u32(seed) as f64 / (u32::MAX as f64 + 1.0)
    }
}

/// PCG random number generator (PCG-XSH-RR, 64-bit state, 32-bit output).
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        Self::pcg_output(Self::pcg_step(seed))
    }
}

/// Purpose of a roll, mixed into the seed so that independent decisions made
/// by the same actor in the same action never share a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum RollContext {
    Hit = 0,
    Critical = 1,
    EffectChance = 2,
    /// NPC picks a skill.
    NpcSkill = 3,
    /// NPC picks a target.
    NpcTarget = 4,
    /// NPC chooses between strategy branches (e.g., debuff vs. attack).
    NpcBranch = 5,
}

/// Seed material for one action: the episode seed plus the action nonce.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RollSeed {
    pub game_seed: u64,
    pub nonce: u64,
}

impl RollSeed {
    pub const fn new(game_seed: u64, nonce: u64) -> Self {
        Self { game_seed, nonce }
    }

    /// Seed for one roll. `index` separates repeated rolls of the same
    /// context (e.g., one hit roll per target of an area skill).
    pub fn derive(&self, actor: u32, context: RollContext, index: u32) -> u64 {
        compute_seed(
            self.game_seed,
            self.nonce,
            actor,
            (context as u32) << 16 | (index & 0xffff),
        )
    }
}

/// Compute deterministic seed from game state components.
///
/// # Arguments
///
/// * `game_seed` - Base seed set at episode start
/// * `nonce` - Action sequence number (increments each action)
/// * `actor_id` - Combatant performing the action
/// * `context` - Separates multiple rolls in the same action
pub fn compute_seed(game_seed: u64, nonce: u64, actor_id: u32, context: u32) -> u64 {
    // SplitMix64 and FxHash multipliers
    let mut hash = game_seed;

    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (actor_id as u64).wrapping_mul(0x517cc1b727220a95);
    hash ^= (context as u64).wrapping_mul(0x85ebca6b);

    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_roll() {
        let rng = PcgRng;
        let seed = RollSeed::new(42, 7).derive(1, RollContext::Hit, 0);
        assert_eq!(rng.roll_d100(seed), rng.roll_d100(seed));
    }

    #[test]
    fn contexts_are_independent() {
        let roll = RollSeed::new(42, 7);
        let hit = roll.derive(1, RollContext::Hit, 0);
        let crit = roll.derive(1, RollContext::Critical, 0);
        let second_target = roll.derive(1, RollContext::Hit, 1);
        assert_ne!(hit, crit);
        assert_ne!(hit, second_target);
    }

    #[test]
    fn chance_extremes() {
        let rng = PcgRng;
        for seed in 0..200 {
            assert!(!rng.chance(seed, 0));
            assert!(rng.chance(seed, 100));
        }
    }

    #[test]
    fn d100_and_index_stay_in_range() {
        let rng = PcgRng;
        for seed in 0..500 {
            let roll = rng.roll_d100(seed);
            assert!((1..=100).contains(&roll));
            assert!(rng.pick_index(seed, 3) < 3);
            let unit = rng.unit(seed);
            assert!((0.0..1.0).contains(&unit));
        }
        assert_eq!(rng.pick_index(9, 0), 0);
    }
}
