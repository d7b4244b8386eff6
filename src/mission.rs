// Mission Records - phase-gated strike-force mission state
//
// INVARIANTS:
// 1. Mission ids are allocated monotonically and never reused
// 2. Phase only increases, one gate at a time, and never exceeds MAX_PHASE_INDEX
// 3. A terminated mission accepts no further mutation
// 4. A mission record is never deleted

use serde::{Deserialize, Serialize};

/// Highest phase gate a mission can reach.
pub const MAX_PHASE_INDEX: u8 = 5;

/// Blocks a mission must age before its reward unlocks.
pub const PHASE_DURATION_BLOCKS: u64 = 312;

/// Cooldown deadline offset recorded at launch.
pub const COOLDOWN_BLOCKS: u64 = 47;

/// Base reward denomination.
pub const REWARD_BASE_UNITS: u64 = 1000;

/// Mission cap multiplier applied to the base reward.
pub const MISSION_CAP_PER_PHASE: u64 = 99;

/// Flat payout per claimed mission. Despite the cap's name, the amount is
/// constant; it does not scale with the phase reached.
pub const MISSION_REWARD_UNITS: u64 = REWARD_BASE_UNITS * MISSION_CAP_PER_PHASE;

/// MissionId uniquely identifies a mission in the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Hash)]
pub struct MissionId(pub u64);

impl MissionId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// Mission instance tracked by the ledger
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Mission {
    /// Block at which the mission was launched
    pub start_block: u64,

    /// Current phase gate (1..=MAX_PHASE_INDEX)
    pub phase: u8,

    /// Whether the mission has been terminated
    pub terminated: bool,

    /// Reward units already paid out (0 while unclaimed)
    pub reward_claimed: u64,
}

impl Mission {
    /// Create a freshly launched mission at phase 1.
    pub fn launched(start_block: u64) -> Self {
        Mission {
            start_block,
            phase: 1,
            terminated: false,
            reward_claimed: 0,
        }
    }

    /// Whether another phase gate remains ahead of this mission.
    pub fn can_advance(&self) -> bool {
        self.phase < MAX_PHASE_INDEX
    }

    /// First block at which the mission reward may be claimed.
    pub fn reward_unlocked_at(&self) -> u64 {
        self.start_block + PHASE_DURATION_BLOCKS
    }

    pub fn is_claimed(&self) -> bool {
        self.reward_claimed != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn launched_mission_starts_at_phase_one() {
        let mission = Mission::launched(40);
        assert_eq!(mission.phase, 1);
        assert!(!mission.terminated);
        assert!(!mission.is_claimed());
        assert_eq!(mission.reward_unlocked_at(), 40 + PHASE_DURATION_BLOCKS);
    }

    #[test]
    fn advance_headroom_ends_at_max_phase() {
        let mut mission = Mission::launched(0);
        for _ in 1..MAX_PHASE_INDEX {
            assert!(mission.can_advance());
            mission.phase += 1;
        }
        assert_eq!(mission.phase, MAX_PHASE_INDEX);
        assert!(!mission.can_advance());
    }

    #[test]
    fn flat_reward_amount() {
        assert_eq!(MISSION_REWARD_UNITS, 99_000);
    }
}
