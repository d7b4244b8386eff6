// Mission Ledger - central bookkeeping for missions and squad slots
//
// INVARIANTS:
// 1. Every check precedes every mutation; a failed call leaves no partial state
// 2. Per-mission and per-slot mutations are linearizable (DashMap entry guards)
// 3. Counters use atomic increments; ids are never reused
// 4. The pause gate blocks launch, phase advance, assignment and claims only

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::mission::{Mission, MissionId, COOLDOWN_BLOCKS, MISSION_REWARD_UNITS};
use crate::squad::{SlotId, SquadMember};

/// Share of a reward earmarked for the vault hub, in basis points.
/// Declared for the ledger's accounting vocabulary; no split is disbursed.
pub const VAULT_SHARE_BPS: u16 = 85;

/// Share of a reward earmarked for mission control, in basis points.
/// Declared for the ledger's accounting vocabulary; no split is disbursed.
pub const CONTROL_SHARE_BPS: u16 = 15;

/// Error kinds surfaced by ledger operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("operations paused by commander")]
    PausedByCommander,
    #[error("empty identity disallowed")]
    ZeroAddressDisallowed,
    #[error("mission does not exist")]
    MissionDoesNotExist,
    #[error("mission already terminated")]
    MissionAlreadyTerminated,
    #[error("invalid phase transition")]
    InvalidPhaseTransition,
    #[error("slot outside squad capacity")]
    SquadOverCapacity,
    #[error("slot already filled")]
    SlotAlreadyFilled,
    #[error("agent not enlisted")]
    AgentNotEnlisted,
    #[error("mission reward already drawn")]
    RewardPoolExhausted,
    #[error("reward still phase-locked")]
    PhaseLocked,
}

/// Read-only summary of ledger state
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LedgerSnapshot {
    pub mission_count: u64,
    pub total_rewards_disbursed: u64,
    pub active_squad_size: usize,
    pub paused: bool,
}

/// In-memory registry for mission lifecycle and squad-slot assignment.
///
/// Constructed once and shared by reference; all operations take `&self` and
/// are safe to call from concurrent threads. Each mutation is an atomic
/// check-and-set against a single map entry, so two racing assignments to the
/// same vacant slot cannot both succeed.
#[derive(Debug)]
pub struct MissionLedger {
    commander_tower: String,
    mission_control: String,
    vault_hub: String,

    /// All launched missions, never removed
    missions: DashMap<MissionId, Mission>,

    /// Cooldown deadline recorded at launch; read-only thereafter
    cooldowns: DashMap<MissionId, u64>,

    /// Occupied squad slots
    squad: DashMap<SlotId, SquadMember>,

    /// Reverse index: agent identity to occupied slot
    agent_index: DashMap<String, SlotId>,

    mission_counter: AtomicU64,
    total_rewards_disbursed: AtomicU64,
    paused: AtomicBool,
}

impl MissionLedger {
    /// Create a ledger bound to the three command identities.
    ///
    /// Identities are opaque labels, validated as non-empty only, and
    /// immutable for the ledger's lifetime.
    pub fn new(
        commander_tower: &str,
        mission_control: &str,
        vault_hub: &str,
    ) -> Result<Self, LedgerError> {
        if commander_tower.is_empty() || mission_control.is_empty() || vault_hub.is_empty() {
            return Err(LedgerError::ZeroAddressDisallowed);
        }

        Ok(MissionLedger {
            commander_tower: commander_tower.to_string(),
            mission_control: mission_control.to_string(),
            vault_hub: vault_hub.to_string(),
            missions: DashMap::new(),
            cooldowns: DashMap::new(),
            squad: DashMap::new(),
            agent_index: DashMap::new(),
            mission_counter: AtomicU64::new(0),
            total_rewards_disbursed: AtomicU64::new(0),
            paused: AtomicBool::new(false),
        })
    }

    /// Launch a new mission at phase 1 and record its cooldown deadline.
    pub fn launch_mission(&self, current_block: u64) -> Result<MissionId, LedgerError> {
        self.ensure_unpaused()?;

        let id = MissionId(self.mission_counter.fetch_add(1, Ordering::SeqCst) + 1);
        self.missions.insert(id, Mission::launched(current_block));
        self.cooldowns.insert(id, current_block + COOLDOWN_BLOCKS);

        info!("mission {} launched at block {}", id.as_u64(), current_block);
        Ok(id)
    }

    /// Advance a mission by exactly one phase gate. Returns the new phase.
    pub fn advance_phase(
        &self,
        mission_id: MissionId,
        current_block: u64,
    ) -> Result<u8, LedgerError> {
        self.ensure_unpaused()?;

        let mut mission = self
            .missions
            .get_mut(&mission_id)
            .ok_or(LedgerError::MissionDoesNotExist)?;
        if mission.terminated {
            return Err(LedgerError::MissionAlreadyTerminated);
        }
        if !mission.can_advance() {
            return Err(LedgerError::InvalidPhaseTransition);
        }

        mission.phase += 1;
        info!(
            "mission {} advanced to phase {} at block {}",
            mission_id.as_u64(),
            mission.phase,
            current_block
        );
        Ok(mission.phase)
    }

    /// Terminate a mission, freezing it against all further mutation.
    ///
    /// Termination is not gated by the pause flag.
    pub fn terminate_mission(&self, mission_id: MissionId) -> Result<(), LedgerError> {
        let mut mission = self
            .missions
            .get_mut(&mission_id)
            .ok_or(LedgerError::MissionDoesNotExist)?;
        if mission.terminated {
            return Err(LedgerError::MissionAlreadyTerminated);
        }

        mission.terminated = true;
        warn!(
            "mission {} terminated at phase {}",
            mission_id.as_u64(),
            mission.phase
        );
        Ok(())
    }

    /// Enlist an agent into a squad slot.
    pub fn assign_squad_slot(
        &self,
        agent: &str,
        slot: SlotId,
        current_block: u64,
    ) -> Result<(), LedgerError> {
        self.ensure_unpaused()?;
        if agent.is_empty() {
            return Err(LedgerError::ZeroAddressDisallowed);
        }
        if !slot.in_range() {
            return Err(LedgerError::SquadOverCapacity);
        }

        // Entry guard makes the vacancy check and the insert one atomic step.
        match self.squad.entry(slot) {
            Entry::Occupied(occupied) if occupied.get().active => {
                return Err(LedgerError::SlotAlreadyFilled);
            }
            Entry::Occupied(mut occupied) => {
                occupied.insert(SquadMember::enlisted(agent, current_block));
            }
            Entry::Vacant(vacant) => {
                vacant.insert(SquadMember::enlisted(agent, current_block));
            }
        }
        self.agent_index.insert(agent.to_string(), slot);

        info!(
            "agent {} enlisted in slot {} at block {}",
            agent,
            slot.as_u8(),
            current_block
        );
        Ok(())
    }

    /// Vacate a squad slot, removing both directional mappings.
    ///
    /// Revocation is not gated by the pause flag.
    pub fn revoke_squad_slot(&self, slot: SlotId) -> Result<(), LedgerError> {
        let (_, member) = self
            .squad
            .remove(&slot)
            .ok_or(LedgerError::AgentNotEnlisted)?;
        // Drop the index entry only if it still points at this slot.
        self.agent_index
            .remove_if(&member.agent, |_, held| *held == slot);

        info!("agent {} revoked from slot {}", member.agent, slot.as_u8());
        Ok(())
    }

    /// Disburse the flat mission reward once the time lock has elapsed.
    /// Returns the amount paid.
    ///
    /// The recipient is recorded in the log only; the ledger holds no
    /// balances and performs no transfer.
    pub fn claim_mission_reward(
        &self,
        mission_id: MissionId,
        recipient: &str,
        current_block: u64,
    ) -> Result<u64, LedgerError> {
        self.ensure_unpaused()?;

        let mut mission = self
            .missions
            .get_mut(&mission_id)
            .ok_or(LedgerError::MissionDoesNotExist)?;
        if mission.terminated {
            return Err(LedgerError::MissionAlreadyTerminated);
        }
        if mission.is_claimed() {
            return Err(LedgerError::RewardPoolExhausted);
        }
        if current_block < mission.reward_unlocked_at() {
            return Err(LedgerError::PhaseLocked);
        }

        mission.reward_claimed = MISSION_REWARD_UNITS;
        drop(mission);
        self.total_rewards_disbursed
            .fetch_add(MISSION_REWARD_UNITS, Ordering::SeqCst);

        info!(
            "mission {} reward of {} units disbursed to {} at block {}",
            mission_id.as_u64(),
            MISSION_REWARD_UNITS,
            recipient,
            current_block
        );
        Ok(MISSION_REWARD_UNITS)
    }

    /// Toggle the global pause gate.
    pub fn set_paused(&self, flag: bool) {
        self.paused.store(flag, Ordering::SeqCst);
        if flag {
            warn!("ledger paused by commander");
        } else {
            info!("ledger resumed");
        }
    }

    fn ensure_unpaused(&self) -> Result<(), LedgerError> {
        if self.paused.load(Ordering::SeqCst) {
            return Err(LedgerError::PausedByCommander);
        }
        Ok(())
    }

    // ── Read-only accessors ──────────────────────────────────────────────

    pub fn commander_tower(&self) -> &str {
        &self.commander_tower
    }

    pub fn mission_control(&self) -> &str {
        &self.mission_control
    }

    pub fn vault_hub(&self) -> &str {
        &self.vault_hub
    }

    pub fn mission(&self, mission_id: MissionId) -> Option<Mission> {
        self.missions.get(&mission_id).map(|m| m.value().clone())
    }

    /// Cooldown deadline recorded at launch. Not enforced by any operation.
    pub fn cooldown_deadline(&self, mission_id: MissionId) -> Option<u64> {
        self.cooldowns.get(&mission_id).map(|d| *d)
    }

    pub fn squad_member(&self, slot: SlotId) -> Option<SquadMember> {
        self.squad.get(&slot).map(|m| m.value().clone())
    }

    pub fn slot_of(&self, agent: &str) -> Option<SlotId> {
        self.agent_index.get(agent).map(|s| *s)
    }

    pub fn active_squad_size(&self) -> usize {
        self.squad.len()
    }

    pub fn mission_count(&self) -> u64 {
        self.mission_counter.load(Ordering::SeqCst)
    }

    pub fn total_rewards_disbursed(&self) -> u64 {
        self.total_rewards_disbursed.load(Ordering::SeqCst)
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            mission_count: self.mission_count(),
            total_rewards_disbursed: self.total_rewards_disbursed(),
            active_squad_size: self.active_squad_size(),
            paused: self.is_paused(),
        }
    }
}
