//! Structure and unit types used by the built-in postures, with their list prices.

use skirmish_core::{StructureKind, UnitKind};

pub const HEADQUARTERS: StructureKind = StructureKind::from_static("headquarters");
pub const POWER_PLANT: StructureKind = StructureKind::from_static("power_plant");
pub const REFINERY: StructureKind = StructureKind::from_static("refinery");
pub const BARRACKS: StructureKind = StructureKind::from_static("barracks");
pub const WAR_FACTORY: StructureKind = StructureKind::from_static("war_factory");
pub const TURRET: StructureKind = StructureKind::from_static("turret");
pub const TECH_LAB: StructureKind = StructureKind::from_static("tech_lab");
pub const AIRFIELD: StructureKind = StructureKind::from_static("airfield");

pub const HARVESTER: UnitKind = UnitKind::from_static("harvester");
pub const ENGINEER: UnitKind = UnitKind::from_static("engineer");
pub const RIFLEMAN: UnitKind = UnitKind::from_static("rifleman");
pub const ROCKETEER: UnitKind = UnitKind::from_static("rocketeer");
pub const TANK: UnitKind = UnitKind::from_static("tank");
pub const ARTILLERY: UnitKind = UnitKind::from_static("artillery");
pub const GUNSHIP: UnitKind = UnitKind::from_static("gunship");

/// Gold and energy a thing costs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Price {
    pub gold: u32,
    pub energy: u32,
}

const fn price(gold: u32, energy: u32) -> Price {
    Price { gold, energy }
}

pub static STRUCTURE_PRICES: &[(StructureKind, Price)] = &[
    (HEADQUARTERS, price(1_000, 0)),
    (POWER_PLANT, price(150, 0)),
    (REFINERY, price(300, 20)),
    (BARRACKS, price(200, 10)),
    (WAR_FACTORY, price(500, 30)),
    (TURRET, price(120, 15)),
    (TECH_LAB, price(600, 40)),
    (AIRFIELD, price(700, 40)),
];

pub static UNIT_PRICES: &[(UnitKind, Price)] = &[
    (HARVESTER, price(200, 0)),
    (ENGINEER, price(120, 0)),
    (RIFLEMAN, price(50, 0)),
    (ROCKETEER, price(90, 0)),
    (TANK, price(300, 5)),
    (ARTILLERY, price(400, 5)),
    (GUNSHIP, price(550, 10)),
];

/// Energy capacity each completed power plant adds.
pub const POWER_PLANT_OUTPUT: u32 = 50;

pub fn structure_price(kind: &StructureKind) -> Option<Price> {
    STRUCTURE_PRICES
        .iter()
        .find(|(k, _)| k == kind)
        .map(|(_, p)| *p)
}

pub fn unit_price(unit: &UnitKind) -> Option<Price> {
    UNIT_PRICES.iter().find(|(k, _)| k == unit).map(|(_, p)| *p)
}

/// Which structure trains a unit.
pub fn producer_of(unit: &UnitKind) -> Option<StructureKind> {
    match unit.as_str() {
        "harvester" => Some(REFINERY),
        "engineer" | "rifleman" | "rocketeer" => Some(BARRACKS),
        "tank" | "artillery" => Some(WAR_FACTORY),
        "gunship" => Some(AIRFIELD),
        _ => None,
    }
}
