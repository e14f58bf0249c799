//! Mock data generation for the simulated roster

use crate::types::{Player, PlayerId, PlayerStatus, Position};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;

const NAMES: [&str; 15] = [
    "AlphaWolf",
    "ShadowHunter",
    "CyberNinja",
    "StormBreaker",
    "IronFist",
    "BlazeFire",
    "VoidWalker",
    "TechMaster",
    "GhostRider",
    "QuantumLeap",
    "ThunderBolt",
    "NeonGlow",
    "DarkKnight",
    "StarGazer",
    "FlashStrike",
];

const ACTIVE_PROBABILITY: f64 = 0.8;
const MAX_KILLS: u32 = 20;
const NAME_SUFFIX: u32 = 1000;
const MAP_EXTENT: f64 = 1000.0;
const MAX_JOIN_AGE_MS: u64 = 3_600_000;

/// Random source for players and perturbation values.
///
/// Ids come from a counter that is never reset, so players generated by
/// separate batches can never collide.
#[derive(Debug)]
pub struct MockGenerator {
    rng: StdRng,
    next_id: PlayerId,
}

impl MockGenerator {
    pub fn new(rng: StdRng) -> Self {
        Self { rng, next_id: 1 }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    pub fn player(&mut self, now_ms: u64) -> Player {
        let id = self.next_id;
        self.next_id += 1;

        let name = format!(
            "{}{}",
            NAMES[self.rng.gen_range(0..NAMES.len())],
            self.rng.gen_range(0..NAME_SUFFIX)
        );
        let status = if self.rng.gen_bool(ACTIVE_PROBABILITY) {
            PlayerStatus::Active
        } else {
            PlayerStatus::Inactive
        };

        Player {
            id,
            name,
            status,
            join_time: now_ms.saturating_sub(self.rng.gen_range(0..MAX_JOIN_AGE_MS)),
            kills: self.rng.gen_range(0..MAX_KILLS),
            position: Some(Position {
                x: self.rng.gen_range(0.0..MAP_EXTENT),
                y: self.rng.gen_range(0.0..MAP_EXTENT),
            }),
        }
    }

    pub fn players(&mut self, count: usize, now_ms: u64) -> Vec<Player> {
        (0..count).map(|_| self.player(now_ms)).collect()
    }

    /// Draw a batch size from `range`, never above `cap`.
    pub fn batch_size(&mut self, range: &RangeInclusive<usize>, cap: usize) -> usize {
        if range.is_empty() {
            return 0;
        }
        self.rng.gen_range(range.clone()).min(cap)
    }

    /// Signed roster drift for one tick: -1, 0 or +1.
    pub fn drift(&mut self) -> i64 {
        self.rng.gen_range(-1..=1)
    }

    pub fn zone_size(&mut self, range: &RangeInclusive<u32>) -> u32 {
        if range.is_empty() {
            return *range.start();
        }
        self.rng.gen_range(range.clone())
    }

    pub fn kills(&mut self, range: &RangeInclusive<u64>) -> u64 {
        if range.is_empty() {
            return 0;
        }
        self.rng.gen_range(range.clone())
    }

    /// Short random id for announcements.
    pub fn token(&mut self) -> String {
        const CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
        (0..8)
            .map(|_| CHARS[self.rng.gen_range(0..CHARS.len())] as char)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_unique_across_batches() {
        let mut mock = MockGenerator::seeded(7);
        let mut ids = HashSet::new();
        for _ in 0..5 {
            for p in mock.players(20, 10_000_000) {
                assert!(ids.insert(p.id), "duplicate id {}", p.id);
            }
        }
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn test_player_fields_in_bounds() {
        let mut mock = MockGenerator::seeded(42);
        let now = 10_000_000;
        for p in mock.players(200, now) {
            assert!(NAMES.iter().any(|n| p.name.starts_with(n)));
            assert!(p.kills < MAX_KILLS);
            assert!(p.join_time <= now && p.join_time > now - MAX_JOIN_AGE_MS);
            let pos = p.position.unwrap();
            assert!((0.0..MAP_EXTENT).contains(&pos.x));
            assert!((0.0..MAP_EXTENT).contains(&pos.y));
        }
    }

    #[test]
    fn test_join_time_saturates_near_epoch() {
        let mut mock = MockGenerator::seeded(1);
        let p = mock.player(0);
        assert_eq!(p.join_time, 0);
    }

    #[test]
    fn test_same_seed_same_roster() {
        let a = MockGenerator::seeded(99).players(10, 5_000_000);
        let b = MockGenerator::seeded(99).players(10, 5_000_000);
        assert_eq!(a, b);
    }

    #[test]
    fn test_batch_size_respects_cap() {
        let mut mock = MockGenerator::seeded(3);
        for _ in 0..100 {
            let n = mock.batch_size(&(5..=19), 10);
            assert!((5..=10).contains(&n));
        }
    }

    #[test]
    fn test_drift_range() {
        let mut mock = MockGenerator::seeded(5);
        let seen: HashSet<i64> = (0..200).map(|_| mock.drift()).collect();
        assert_eq!(seen, HashSet::from([-1, 0, 1]));
    }

    #[test]
    fn test_token_shape() {
        let mut mock = MockGenerator::seeded(11);
        let token = mock.token();
        assert_eq!(token.len(), 8);
        assert!(token.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }
}
