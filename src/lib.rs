pub mod ledger;
pub mod mission;
pub mod squad;

pub use ledger::{LedgerError, LedgerSnapshot, MissionLedger};
pub use mission::{Mission, MissionId};
pub use squad::{SlotId, SquadMember};
