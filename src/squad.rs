// Squad Slots - numbered seats agents can occupy
//
// INVARIANTS:
// 1. A slot holds at most one active member at a time
// 2. An agent identity occupies at most one slot in the agent index

use serde::{Deserialize, Serialize};

/// Number of seats in the squad roster.
pub const MAX_SQUAD_SIZE: u8 = 12;

/// SlotId identifies a seat in the squad roster (1..=MAX_SQUAD_SIZE)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Hash)]
pub struct SlotId(pub u8);

impl SlotId {
    pub fn as_u8(&self) -> u8 {
        self.0
    }

    /// Whether the slot number falls inside the roster.
    pub fn in_range(&self) -> bool {
        (1..=MAX_SQUAD_SIZE).contains(&self.0)
    }
}

/// Squad member occupying a slot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SquadMember {
    /// Opaque agent identity
    pub agent: String,

    /// Block at which the agent was enlisted
    pub enlisted_at_block: u64,

    /// Whether the member currently holds the slot
    pub active: bool,
}

impl SquadMember {
    pub fn enlisted(agent: &str, enlisted_at_block: u64) -> Self {
        SquadMember {
            agent: agent.to_string(),
            enlisted_at_block,
            active: true,
        }
    }
}
