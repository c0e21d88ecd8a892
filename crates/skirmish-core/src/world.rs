use crate::{StructureKind, UnitKind};

/// Result of a command issued to the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Success,
    Failure,
}

impl CommandOutcome {
    pub fn is_success(self) -> bool {
        self == CommandOutcome::Success
    }
}

impl From<bool> for CommandOutcome {
    fn from(value: bool) -> Self {
        if value {
            CommandOutcome::Success
        } else {
            CommandOutcome::Failure
        }
    }
}

/// Spendable resources of the controlled faction.
pub trait ResourceLedger {
    fn gold(&self) -> u32;

    /// Energy capacity not yet committed (max minus committed).
    fn available_energy(&self) -> u32;
}

/// Read-only world access.
///
/// Every query must report the state as of the call; goals never cache answers between ticks.
pub trait WorldView {
    type Ledger: ResourceLedger + ?Sized;

    fn ledger(&self) -> &Self::Ledger;

    fn structure_count(&self, kind: &StructureKind) -> u32;

    fn is_under_construction(&self, kind: &StructureKind) -> bool;

    /// Global build-rate limiter.
    fn build_cooldown_active(&self) -> bool;

    fn has_building(&self, kind: &StructureKind) -> bool;

    fn production_queue_full(&self, producer: &StructureKind) -> bool;
}

/// Command sink.
pub trait WorldMut: WorldView {
    fn build(&mut self, kind: &StructureKind) -> CommandOutcome;

    fn produce(&mut self, unit: &UnitKind, producer: &StructureKind) -> CommandOutcome;
}

/// Extension query for worlds that can count live units by type.
///
/// Not required by the scheduler itself; [`crate::CountUnits`] builds on it.
pub trait UnitCensus {
    fn unit_count(&self, unit: &UnitKind) -> u32;
}
