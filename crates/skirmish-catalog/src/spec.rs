//! Postures described as data (YAML), installed exactly like the built-in ones.

use serde::{Deserialize, Serialize};
use skirmish_core::{
    CountUnits, Goal, ProductionGoal, Scheduler, StructureGoal, StructureKind, UnitCensus,
    UnitKind,
};

use crate::catalog::install;
use crate::CatalogError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostureSpec {
    pub name: String,
    #[serde(default)]
    pub goals: Vec<GoalSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GoalSpec {
    Structure {
        structure: StructureKind,
        priority: i32,
        #[serde(default)]
        gold: u32,
        #[serde(default)]
        energy: u32,
        #[serde(default = "default_one")]
        max_count: u32,
        #[serde(default = "default_true")]
        check_existing: bool,
    },
    Production {
        unit: UnitKind,
        producer: StructureKind,
        priority: i32,
        #[serde(default)]
        gold: u32,
        #[serde(default)]
        energy: u32,
        #[serde(default = "default_one")]
        target: u32,
    },
}

fn default_one() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

impl GoalSpec {
    fn check(&self) -> Result<(), &'static str> {
        match self {
            GoalSpec::Structure {
                structure,
                max_count,
                ..
            } => {
                if structure.as_str().is_empty() {
                    return Err("structure id is empty");
                }
                if *max_count == 0 {
                    return Err("max_count must be at least 1");
                }
            }
            GoalSpec::Production {
                unit,
                producer,
                target,
                ..
            } => {
                if unit.as_str().is_empty() {
                    return Err("unit id is empty");
                }
                if producer.as_str().is_empty() {
                    return Err("producer id is empty");
                }
                if *target == 0 {
                    return Err("target must be at least 1");
                }
            }
        }
        Ok(())
    }

    pub fn to_goal<W>(&self) -> Goal<W>
    where
        W: UnitCensus + 'static,
    {
        match self {
            GoalSpec::Structure {
                structure,
                priority,
                gold,
                energy,
                max_count,
                check_existing,
            } => {
                let mut goal = StructureGoal::new(structure.clone())
                    .with_cost(*gold, *energy)
                    .with_max_count(*max_count);
                if !check_existing {
                    goal = goal.without_existing_check();
                }
                Goal::new(*priority, goal)
            }
            GoalSpec::Production {
                unit,
                producer,
                priority,
                gold,
                energy,
                target,
            } => Goal::new(
                *priority,
                ProductionGoal::new(
                    unit.clone(),
                    producer.clone(),
                    *target,
                    CountUnits(unit.clone()),
                )
                .with_cost(*gold, *energy),
            ),
        }
    }
}

impl PostureSpec {
    /// Parses and validates a single posture document.
    pub fn from_yaml(text: &str) -> Result<Self, CatalogError> {
        let spec: Self = serde_yaml::from_str(text)?;
        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.name.trim().is_empty() {
            return Err(CatalogError::InvalidGoal {
                posture: self.name.clone(),
                index: 0,
                reason: "posture name is empty",
            });
        }
        for (index, goal) in self.goals.iter().enumerate() {
            goal.check().map_err(|reason| CatalogError::InvalidGoal {
                posture: self.name.clone(),
                index,
                reason,
            })?;
        }
        Ok(())
    }

    /// Clears the scheduler and adds this posture's goals in listed order.
    pub fn install<W>(&self, scheduler: &mut Scheduler<W>)
    where
        W: UnitCensus + 'static,
    {
        let goals = self.goals.iter().map(|goal| goal.to_goal::<W>()).collect();
        install(scheduler, &self.name, goals);
    }
}
