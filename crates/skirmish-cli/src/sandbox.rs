//! Minimal in-memory skirmish used to drive the scheduler headlessly.
//!
//! Construction and production take a fixed number of frames; gold trickles in every frame.
//! Prices come from the catalog's vocabulary, unknown kinds are free.

use std::collections::{BTreeMap, VecDeque};

use serde::{Deserialize, Serialize};
use skirmish_catalog::vocab::{self, Price};
use skirmish_core::{
    CommandOutcome, ResourceLedger, StructureKind, UnitCensus, UnitKind, WorldMut, WorldView,
};
use tracing::debug;

const FREE: Price = Price { gold: 0, energy: 0 };

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    pub starting_gold: u32,
    pub income_per_frame: u32,
    pub base_energy: u32,
    pub energy_per_power_plant: u32,
    pub build_frames: u32,
    pub production_frames: u32,
    pub queue_capacity: usize,
    /// Frames after a build order during which no other build is accepted
    pub cooldown_frames: u32,
    /// Every this many frames the most numerous unit type loses one unit; 0 disables losses
    pub attrition_every_frames: u64,
    pub frame_ms: u64,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            starting_gold: 1_000,
            income_per_frame: 15,
            base_energy: 20,
            energy_per_power_plant: vocab::POWER_PLANT_OUTPUT,
            build_frames: 12,
            production_frames: 6,
            queue_capacity: 3,
            cooldown_frames: 4,
            attrition_every_frames: 0,
            frame_ms: 100,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Treasury {
    pub gold: u32,
    pub energy_max: u32,
    pub energy_committed: u32,
}

impl Treasury {
    fn can_afford(&self, price: Price) -> bool {
        self.gold >= price.gold && self.available_energy() >= price.energy
    }

    fn spend(&mut self, price: Price) {
        self.gold -= price.gold;
        self.energy_committed += price.energy;
    }
}

impl ResourceLedger for Treasury {
    fn gold(&self) -> u32 {
        self.gold
    }

    fn available_energy(&self) -> u32 {
        self.energy_max.saturating_sub(self.energy_committed)
    }
}

#[derive(Debug)]
pub struct Sandbox {
    config: SandboxConfig,
    treasury: Treasury,
    frame: u64,
    structures: BTreeMap<StructureKind, u32>,
    construction: Vec<(StructureKind, u32)>,
    queues: BTreeMap<StructureKind, VecDeque<(UnitKind, u32)>>,
    units: BTreeMap<UnitKind, u32>,
    cooldown: u32,
}

impl Sandbox {
    pub fn new(config: SandboxConfig) -> Self {
        let treasury = Treasury {
            gold: config.starting_gold,
            energy_max: config.base_energy,
            energy_committed: 0,
        };
        let mut structures = BTreeMap::new();
        structures.insert(vocab::HEADQUARTERS, 1);
        Self {
            config,
            treasury,
            frame: 0,
            structures,
            construction: Vec::new(),
            queues: BTreeMap::new(),
            units: BTreeMap::new(),
            cooldown: 0,
        }
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn treasury(&self) -> &Treasury {
        &self.treasury
    }

    pub fn structures(&self) -> &BTreeMap<StructureKind, u32> {
        &self.structures
    }

    pub fn units(&self) -> &BTreeMap<UnitKind, u32> {
        &self.units
    }

    /// Removes up to `count` live units, as if lost in combat.
    pub fn kill(&mut self, unit: &UnitKind, count: u32) {
        if let Some(alive) = self.units.get_mut(unit) {
            *alive = alive.saturating_sub(count);
        }
    }

    /// Advances the world by one frame.
    pub fn step(&mut self) {
        self.frame += 1;
        self.treasury.gold = self.treasury.gold.saturating_add(self.config.income_per_frame);
        self.cooldown = self.cooldown.saturating_sub(1);

        let mut finished = Vec::new();
        self.construction.retain_mut(|(kind, remaining)| {
            *remaining = remaining.saturating_sub(1);
            if *remaining == 0 {
                finished.push(kind.clone());
                false
            } else {
                true
            }
        });
        for kind in finished {
            debug!(frame = self.frame, structure = %kind, "construction finished");
            if kind == vocab::POWER_PLANT {
                self.treasury.energy_max += self.config.energy_per_power_plant;
            }
            *self.structures.entry(kind).or_default() += 1;
        }

        for queue in self.queues.values_mut() {
            let Some((unit, remaining)) = queue.front_mut() else {
                continue;
            };
            *remaining = remaining.saturating_sub(1);
            if *remaining == 0 {
                let unit = unit.clone();
                queue.pop_front();
                debug!(frame = self.frame, unit = %unit, "unit ready");
                *self.units.entry(unit).or_default() += 1;
            }
        }

        let every = self.config.attrition_every_frames;
        if every > 0 && self.frame % every == 0 {
            let victim = self
                .units
                .iter()
                .filter(|(_, alive)| **alive > 0)
                .max_by_key(|(_, alive)| **alive)
                .map(|(unit, _)| unit.clone());
            if let Some(unit) = victim {
                debug!(frame = self.frame, unit = %unit, "unit lost");
                self.kill(&unit, 1);
            }
        }
    }
}

impl WorldView for Sandbox {
    type Ledger = Treasury;

    fn ledger(&self) -> &Treasury {
        &self.treasury
    }

    fn structure_count(&self, kind: &StructureKind) -> u32 {
        self.structures.get(kind).copied().unwrap_or(0)
    }

    fn is_under_construction(&self, kind: &StructureKind) -> bool {
        self.construction.iter().any(|(k, _)| k == kind)
    }

    fn build_cooldown_active(&self) -> bool {
        self.cooldown > 0
    }

    fn has_building(&self, kind: &StructureKind) -> bool {
        self.structure_count(kind) > 0
    }

    fn production_queue_full(&self, producer: &StructureKind) -> bool {
        self.queues
            .get(producer)
            .is_some_and(|q| q.len() >= self.config.queue_capacity)
    }
}

impl WorldMut for Sandbox {
    fn build(&mut self, kind: &StructureKind) -> CommandOutcome {
        let price = vocab::structure_price(kind).unwrap_or(FREE);
        if self.build_cooldown_active()
            || self.is_under_construction(kind)
            || !self.treasury.can_afford(price)
        {
            return CommandOutcome::Failure;
        }

        self.treasury.spend(price);
        self.construction
            .push((kind.clone(), self.config.build_frames.max(1)));
        self.cooldown = self.config.cooldown_frames;
        CommandOutcome::Success
    }

    fn produce(&mut self, unit: &UnitKind, producer: &StructureKind) -> CommandOutcome {
        let price = vocab::unit_price(unit).unwrap_or(FREE);
        if !self.has_building(producer)
            || self.production_queue_full(producer)
            || !self.treasury.can_afford(price)
        {
            return CommandOutcome::Failure;
        }

        self.treasury.spend(price);
        self.queues
            .entry(producer.clone())
            .or_default()
            .push_back((unit.clone(), self.config.production_frames.max(1)));
        CommandOutcome::Success
    }
}

impl UnitCensus for Sandbox {
    fn unit_count(&self, unit: &UnitKind) -> u32 {
        self.units.get(unit).copied().unwrap_or(0)
    }
}
