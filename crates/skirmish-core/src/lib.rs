//! Priority-ordered goal scheduling for a strategy-game opponent.
//!
//! A [`Scheduler`] owns a pool of [`Goal`]s. On each fired tick it evicts finished goals, orders
//! the rest by priority (ties by insertion order), evaluates them in that order and executes the
//! first one whose gates pass. At most one command reaches the world per tick.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod goal;
pub mod kind;
pub mod production;
pub mod scheduler;
pub mod structure;
pub mod world;

pub use goal::{Blocker, Gate, Goal, GoalKind};
pub use kind::{StructureKind, UnitKind};
pub use production::{CountUnits, LiveCount, ProductionGoal};
pub use scheduler::{GoalId, Scheduler, SchedulerConfig, TickOutcome};
pub use structure::StructureGoal;
pub use world::{CommandOutcome, ResourceLedger, UnitCensus, WorldMut, WorldView};
