use std::borrow::Cow;
use std::fmt;

use tracing::{debug, info, warn};

use crate::world::{WorldMut, WorldView};
use crate::{CommandOutcome, ProductionGoal, StructureGoal};

/// Why a gate refused to open this time around. None of these are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blocker {
    UnderConstruction,
    Gold { have: u32, need: u32 },
    Energy { have: u32, need: u32 },
    BuildCooldown,
    MissingProducer,
    QueueFull,
}

impl fmt::Display for Blocker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Blocker::UnderConstruction => f.write_str("under construction"),
            Blocker::Gold { have, need } => write!(f, "gold {have}/{need}"),
            Blocker::Energy { have, need } => write!(f, "energy {have}/{need}"),
            Blocker::BuildCooldown => f.write_str("build cooldown"),
            Blocker::MissingProducer => f.write_str("missing producer"),
            Blocker::QueueFull => f.write_str("queue full"),
        }
    }
}

/// Result of running a goal's gates in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Open,
    /// The cap/target is met; the goal is finished for good.
    Complete,
    Blocked(Blocker),
}

pub enum GoalKind<W: ?Sized> {
    Structure(StructureGoal),
    Production(ProductionGoal<W>),
}

impl<W: ?Sized> From<StructureGoal> for GoalKind<W> {
    fn from(value: StructureGoal) -> Self {
        GoalKind::Structure(value)
    }
}

impl<W: ?Sized> From<ProductionGoal<W>> for GoalKind<W> {
    fn from(value: ProductionGoal<W>) -> Self {
        GoalKind::Production(value)
    }
}

impl<W: ?Sized> fmt::Debug for GoalKind<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoalKind::Structure(g) => f.debug_tuple("Structure").field(g).finish(),
            GoalKind::Production(g) => f.debug_tuple("Production").field(g).finish(),
        }
    }
}

/// A schedulable unit of strategic intent.
///
/// Checking is not read-only: [`Goal::evaluate`] caches its verdict in `actionable` and flips
/// `done` once the objective is met. The scheduler's introspection relies on those cached flags.
pub struct Goal<W: ?Sized> {
    name: Cow<'static, str>,
    priority: i32,
    done: bool,
    actionable: bool,
    last_blocker: Option<Blocker>,
    kind: GoalKind<W>,
}

impl<W: ?Sized> Goal<W> {
    pub fn new(priority: i32, kind: impl Into<GoalKind<W>>) -> Self {
        let kind = kind.into();
        let name = match &kind {
            GoalKind::Structure(g) => g.default_name(),
            GoalKind::Production(g) => g.default_name(),
        };
        Self {
            name: Cow::Owned(name),
            priority,
            done: false,
            actionable: true,
            last_blocker: None,
            kind,
        }
    }

    pub fn with_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Takes effect on the scheduler's next sort (every add and every fired tick).
    pub fn set_priority(&mut self, priority: i32) {
        self.priority = priority;
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn is_actionable(&self) -> bool {
        self.actionable
    }

    pub fn last_blocker(&self) -> Option<Blocker> {
        self.last_blocker
    }

    pub fn kind(&self) -> &GoalKind<W> {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut GoalKind<W> {
        &mut self.kind
    }

    /// Back to the initial state: not done, actionable.
    pub fn reset(&mut self) {
        self.done = false;
        self.actionable = true;
        self.last_blocker = None;
    }

    pub fn describe(&self) -> String {
        self.to_string()
    }
}

impl<W> Goal<W>
where
    W: WorldView + ?Sized,
{
    /// Runs the gates and caches the verdict.
    ///
    /// A done goal stays done and is not re-checked until [`Goal::reset`].
    pub fn evaluate(&mut self, world: &W) -> bool {
        if self.done {
            self.actionable = false;
            return false;
        }

        let gate = match &self.kind {
            GoalKind::Structure(g) => g.gate(world),
            GoalKind::Production(g) => g.gate(world),
        };

        match gate {
            Gate::Open => {
                self.actionable = true;
                self.last_blocker = None;
                true
            }
            Gate::Complete => {
                debug!(goal = %self.name, "goal complete");
                self.done = true;
                self.actionable = false;
                self.last_blocker = None;
                false
            }
            Gate::Blocked(blocker) => {
                debug!(goal = %self.name, %blocker, "goal gated");
                self.actionable = false;
                self.last_blocker = Some(blocker);
                false
            }
        }
    }
}

impl<W> Goal<W>
where
    W: WorldMut + ?Sized,
{
    /// Issues one command. Callers are expected to have just seen `evaluate` pass; nothing is
    /// re-validated here.
    ///
    /// Structure goals go inactionable after issuing, whatever the outcome. Production goals
    /// leave their flags untouched so they can issue again on the very next tick.
    pub fn execute(&mut self, world: &mut W) -> CommandOutcome {
        let outcome = match &self.kind {
            GoalKind::Structure(g) => {
                let outcome = g.issue(world);
                self.actionable = false;
                outcome
            }
            GoalKind::Production(g) => g.issue(world),
        };

        match outcome {
            CommandOutcome::Success => {
                info!(goal = %self.name, priority = self.priority, "command issued")
            }
            CommandOutcome::Failure => {
                warn!(goal = %self.name, priority = self.priority, "command rejected")
            }
        }
        outcome
    }
}

impl<W: ?Sized> fmt::Display for Goal<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [priority={} done={} actionable={}] ",
            self.name, self.priority, self.done, self.actionable
        )?;
        match &self.kind {
            GoalKind::Structure(g) => write!(f, "{g}")?,
            GoalKind::Production(g) => write!(f, "{g}")?,
        }
        if let Some(blocker) = self.last_blocker {
            write!(f, " blocked_by=\"{blocker}\"")?;
        }
        Ok(())
    }
}

impl<W: ?Sized> fmt::Debug for Goal<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Goal")
            .field("name", &self.name)
            .field("priority", &self.priority)
            .field("done", &self.done)
            .field("actionable", &self.actionable)
            .field("kind", &self.kind)
            .finish()
    }
}
