use std::fmt;

use crate::goal::{Blocker, Gate};
use crate::world::{ResourceLedger, WorldMut, WorldView};
use crate::{CommandOutcome, StructureKind};

/// Build one more copy of a structure, up to `max_count` copies in total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureGoal {
    pub structure: StructureKind,
    pub gold_cost: u32,
    pub energy_cost: u32,
    pub max_count: u32,
    /// When false, the goal never completes on its own and keeps building while affordable.
    pub check_existing: bool,
}

impl StructureGoal {
    pub fn new(structure: StructureKind) -> Self {
        Self {
            structure,
            gold_cost: 0,
            energy_cost: 0,
            max_count: 1,
            check_existing: true,
        }
    }

    pub fn with_cost(mut self, gold: u32, energy: u32) -> Self {
        self.gold_cost = gold;
        self.energy_cost = energy;
        self
    }

    pub fn with_max_count(mut self, max_count: u32) -> Self {
        self.max_count = max_count;
        self
    }

    pub fn without_existing_check(mut self) -> Self {
        self.check_existing = false;
        self
    }

    pub(crate) fn default_name(&self) -> String {
        format!("build {}", self.structure)
    }

    /// Order matters: the cap check is the only terminal gate and must run first.
    pub(crate) fn gate<W>(&self, world: &W) -> Gate
    where
        W: WorldView + ?Sized,
    {
        if self.check_existing {
            let count = world.structure_count(&self.structure);
            if count >= self.max_count {
                return Gate::Complete;
            }
        }

        if world.is_under_construction(&self.structure) {
            return Gate::Blocked(Blocker::UnderConstruction);
        }

        let ledger = world.ledger();
        let gold = ledger.gold();
        if gold < self.gold_cost {
            return Gate::Blocked(Blocker::Gold {
                have: gold,
                need: self.gold_cost,
            });
        }

        let energy = ledger.available_energy();
        if energy < self.energy_cost {
            return Gate::Blocked(Blocker::Energy {
                have: energy,
                need: self.energy_cost,
            });
        }

        if world.build_cooldown_active() {
            return Gate::Blocked(Blocker::BuildCooldown);
        }

        Gate::Open
    }

    pub(crate) fn issue<W>(&self, world: &mut W) -> CommandOutcome
    where
        W: WorldMut + ?Sized,
    {
        world.build(&self.structure)
    }
}

impl fmt::Display for StructureGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "structure={} gold={} energy={} max={}",
            self.structure, self.gold_cost, self.energy_cost, self.max_count
        )?;
        if !self.check_existing {
            f.write_str(" (uncapped)")?;
        }
        Ok(())
    }
}
