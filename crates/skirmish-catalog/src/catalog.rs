use std::fmt;
use std::str::FromStr;

use skirmish_core::{
    CountUnits, Goal, ProductionGoal, Scheduler, StructureGoal, StructureKind, UnitCensus,
    UnitKind,
};
use tracing::info;

use crate::vocab::*;
use crate::CatalogError;

/// Named strategic plans shipped with the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Posture {
    EarlyGame,
    MidGame,
    LateGame,
    Economic,
    Military,
}

impl Posture {
    pub const ALL: [Posture; 5] = [
        Posture::EarlyGame,
        Posture::MidGame,
        Posture::LateGame,
        Posture::Economic,
        Posture::Military,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Posture::EarlyGame => "early-game",
            Posture::MidGame => "mid-game",
            Posture::LateGame => "late-game",
            Posture::Economic => "economic",
            Posture::Military => "military",
        }
    }
}

impl fmt::Display for Posture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Posture {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Posture::ALL
            .into_iter()
            .find(|p| p.name() == normalized || p.name().replace('-', "") == normalized)
            .ok_or_else(|| CatalogError::UnknownPosture(s.to_string()))
    }
}

fn build<W>(priority: i32, structure: StructureKind, max_count: u32) -> Goal<W> {
    let price = structure_price(&structure).unwrap_or(Price { gold: 0, energy: 0 });
    Goal::new(
        priority,
        StructureGoal::new(structure)
            .with_cost(price.gold, price.energy)
            .with_max_count(max_count),
    )
}

/// Trains `unit` from the structure [`producer_of`] names, falling back to the headquarters.
fn produce<W>(priority: i32, unit: UnitKind, target: u32) -> Goal<W>
where
    W: UnitCensus + 'static,
{
    let price = unit_price(&unit).unwrap_or(Price { gold: 0, energy: 0 });
    let producer = producer_of(&unit).unwrap_or(HEADQUARTERS);
    let counter = CountUnits(unit.clone());
    Goal::new(
        priority,
        ProductionGoal::new(unit, producer, target, counter).with_cost(price.gold, price.energy),
    )
}

/// Replaces the scheduler's pool with `goals`.
pub(crate) fn install<W>(scheduler: &mut Scheduler<W>, posture: &str, goals: Vec<Goal<W>>) {
    scheduler.clear();
    let count = goals.len();
    for goal in goals {
        scheduler.add(goal);
    }
    info!(posture, goals = count, "posture installed");
}

/// Builders for the built-in postures. Each one clears the scheduler, then adds a literal list.
pub struct StrategyCatalog;

impl StrategyCatalog {
    pub fn apply<W>(posture: Posture, scheduler: &mut Scheduler<W>)
    where
        W: UnitCensus + 'static,
    {
        match posture {
            Posture::EarlyGame => Self::early_game(scheduler),
            Posture::MidGame => Self::mid_game(scheduler),
            Posture::LateGame => Self::late_game(scheduler),
            Posture::Economic => Self::economic(scheduler),
            Posture::Military => Self::military(scheduler),
        }
    }

    pub fn early_game<W>(scheduler: &mut Scheduler<W>)
    where
        W: UnitCensus + 'static,
    {
        install(
            scheduler,
            Posture::EarlyGame.name(),
            vec![
                build(100, POWER_PLANT, 1),
                build(95, REFINERY, 1),
                produce(90, HARVESTER, 2),
                build(80, BARRACKS, 1),
                produce(70, RIFLEMAN, 4),
                build(60, POWER_PLANT, 2),
                produce(50, ENGINEER, 1),
            ],
        );
    }

    pub fn mid_game<W>(scheduler: &mut Scheduler<W>)
    where
        W: UnitCensus + 'static,
    {
        install(
            scheduler,
            Posture::MidGame.name(),
            vec![
                build(100, POWER_PLANT, 3),
                produce(95, HARVESTER, 3),
                build(90, WAR_FACTORY, 1),
                build(85, REFINERY, 2),
                produce(80, TANK, 4),
                produce(70, ROCKETEER, 4),
                build(60, TURRET, 3),
                produce(50, RIFLEMAN, 8),
            ],
        );
    }

    pub fn late_game<W>(scheduler: &mut Scheduler<W>)
    where
        W: UnitCensus + 'static,
    {
        install(
            scheduler,
            Posture::LateGame.name(),
            vec![
                build(100, POWER_PLANT, 5),
                build(95, TECH_LAB, 1),
                build(90, AIRFIELD, 1),
                produce(85, GUNSHIP, 4),
                produce(80, ARTILLERY, 4),
                produce(75, TANK, 8),
                produce(70, HARVESTER, 4),
                build(60, TURRET, 6),
            ],
        );
    }

    pub fn economic<W>(scheduler: &mut Scheduler<W>)
    where
        W: UnitCensus + 'static,
    {
        install(
            scheduler,
            Posture::Economic.name(),
            vec![
                build(100, POWER_PLANT, 2),
                build(95, REFINERY, 3),
                produce(90, HARVESTER, 6),
                build(80, POWER_PLANT, 4),
                build(70, BARRACKS, 1),
                produce(60, ENGINEER, 2),
                build(50, TURRET, 2),
                produce(40, RIFLEMAN, 3),
            ],
        );
    }

    pub fn military<W>(scheduler: &mut Scheduler<W>)
    where
        W: UnitCensus + 'static,
    {
        install(
            scheduler,
            Posture::Military.name(),
            vec![
                build(100, BARRACKS, 2),
                produce(95, RIFLEMAN, 10),
                build(90, POWER_PLANT, 2),
                build(85, WAR_FACTORY, 1),
                produce(80, ROCKETEER, 6),
                produce(75, TANK, 6),
                build(60, REFINERY, 1),
                produce(50, HARVESTER, 1),
            ],
        );
    }
}
