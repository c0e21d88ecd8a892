use std::fmt;

use crate::goal::{Blocker, Gate};
use crate::world::{ResourceLedger, UnitCensus, WorldMut, WorldView};
use crate::{CommandOutcome, StructureKind, UnitKind};

/// Reads how many units of some type exist right now.
///
/// Implementations must not cache: units die in play, and a production goal has to keep
/// re-triggering until the current headcount (not a cumulative one) meets its target.
pub trait LiveCount<W: ?Sized> {
    fn live_count(&self, world: &W) -> u32;
}

impl<W, F> LiveCount<W> for F
where
    W: ?Sized,
    F: Fn(&W) -> u32,
{
    fn live_count(&self, world: &W) -> u32 {
        self(world)
    }
}

/// Counts live units through the world's [`UnitCensus`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountUnits(pub UnitKind);

impl<W> LiveCount<W> for CountUnits
where
    W: UnitCensus + ?Sized,
{
    fn live_count(&self, world: &W) -> u32 {
        world.unit_count(&self.0)
    }
}

/// Produce units of one type from a producer until `target` of them are alive.
pub struct ProductionGoal<W: ?Sized> {
    pub unit: UnitKind,
    pub producer: StructureKind,
    pub gold_cost: u32,
    pub energy_cost: u32,
    pub target: u32,
    counter: Box<dyn LiveCount<W>>,
}

impl<W: ?Sized> ProductionGoal<W> {
    pub fn new(
        unit: UnitKind,
        producer: StructureKind,
        target: u32,
        counter: impl LiveCount<W> + 'static,
    ) -> Self {
        Self {
            unit,
            producer,
            gold_cost: 0,
            energy_cost: 0,
            target,
            counter: Box::new(counter),
        }
    }

    pub fn with_cost(mut self, gold: u32, energy: u32) -> Self {
        self.gold_cost = gold;
        self.energy_cost = energy;
        self
    }

    pub fn live_count(&self, world: &W) -> u32 {
        self.counter.live_count(world)
    }

    pub(crate) fn default_name(&self) -> String {
        format!("produce {} x{}", self.unit, self.target)
    }
}

impl<W> ProductionGoal<W>
where
    W: WorldView + ?Sized,
{
    pub(crate) fn gate(&self, world: &W) -> Gate {
        if self.live_count(world) >= self.target {
            return Gate::Complete;
        }

        if !world.has_building(&self.producer) {
            return Gate::Blocked(Blocker::MissingProducer);
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

        if world.production_queue_full(&self.producer) {
            return Gate::Blocked(Blocker::QueueFull);
        }

        Gate::Open
    }
}

impl<W> ProductionGoal<W>
where
    W: WorldMut + ?Sized,
{
    pub(crate) fn issue(&self, world: &mut W) -> CommandOutcome {
        world.produce(&self.unit, &self.producer)
    }
}

impl<W: ?Sized> fmt::Debug for ProductionGoal<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProductionGoal")
            .field("unit", &self.unit)
            .field("producer", &self.producer)
            .field("gold_cost", &self.gold_cost)
            .field("energy_cost", &self.energy_cost)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

impl<W: ?Sized> fmt::Display for ProductionGoal<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unit={} producer={} gold={} energy={} target={}",
            self.unit, self.producer, self.gold_cost, self.energy_cost, self.target
        )
    }
}
