use std::cmp::Reverse;
use std::fmt;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use skirmish_tools::trace::{TAG_DONE, TAG_EVICTED, TAG_EXECUTED};
use skirmish_tools::{NullTraceSink, TraceEvent, TraceSink};
use tracing::debug;

use crate::world::{WorldMut, WorldView};
use crate::{CommandOutcome, Goal};

/// Handle to a goal inside a [`Scheduler`]. Assigned in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GoalId(pub u64);

impl fmt::Display for GoalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct SchedulerConfig {
    /// Minimum wall-clock gap between two decision passes.
    pub tick_interval_ms: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 250,
        }
    }
}

impl SchedulerConfig {
    /// Intervals are kept in whole milliseconds. A non-zero interval shorter than that rounds up
    /// to 1 ms so it still throttles; longer ones truncate to the millisecond.
    pub fn with_interval(interval: Duration) -> Self {
        let ms = match interval.as_millis() {
            0 if !interval.is_zero() => 1,
            ms => u64::try_from(ms).unwrap_or(u64::MAX),
        };
        Self {
            tick_interval_ms: ms,
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// `None` means no tick has fired yet, which is always due.
    pub fn is_due(&self, last: Option<Duration>, now: Duration) -> bool {
        match last {
            None => true,
            Some(last) => now.saturating_sub(last) >= self.tick_interval(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Called before the interval elapsed; nothing was evaluated.
    Throttled,
    /// Fired, but no goal passed its gates.
    Idle,
    Executed { id: GoalId, outcome: CommandOutcome },
}

struct Entry<W: ?Sized> {
    id: GoalId,
    goal: Goal<W>,
}

/// Owns the goal pool and runs at most one goal per fired tick.
pub struct Scheduler<W: ?Sized> {
    config: SchedulerConfig,
    goals: Vec<Entry<W>>,
    next_id: u64,
    last_tick: Option<Duration>,
    ticks_fired: u64,
    executions: u64,
    trace: Box<dyn TraceSink>,
}

impl<W: ?Sized> Default for Scheduler<W> {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}

impl<W: ?Sized> Scheduler<W> {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            goals: Vec::new(),
            next_id: 0,
            last_tick: None,
            ticks_fired: 0,
            executions: 0,
            trace: Box::new(NullTraceSink),
        }
    }

    pub fn with_trace_sink(mut self, sink: Box<dyn TraceSink>) -> Self {
        self.trace = sink;
        self
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn add(&mut self, goal: Goal<W>) -> GoalId {
        let id = GoalId(self.next_id);
        self.next_id += 1;
        self.goals.push(Entry { id, goal });
        self.sort();
        id
    }

    pub fn remove(&mut self, id: GoalId) -> Option<Goal<W>> {
        let idx = self.goals.iter().position(|e| e.id == id)?;
        Some(self.goals.remove(idx).goal)
    }

    pub fn clear(&mut self) {
        self.goals.clear();
    }

    pub fn get(&self, id: GoalId) -> Option<&Goal<W>> {
        self.goals.iter().find(|e| e.id == id).map(|e| &e.goal)
    }

    pub fn get_mut(&mut self, id: GoalId) -> Option<&mut Goal<W>> {
        self.goals.iter_mut().find(|e| e.id == id).map(|e| &mut e.goal)
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    /// Goals not yet done.
    pub fn active_count(&self) -> usize {
        self.goals.iter().filter(|e| !e.goal.is_done()).count()
    }

    pub fn ticks_fired(&self) -> u64 {
        self.ticks_fired
    }

    pub fn executions(&self) -> u64 {
        self.executions
    }

    /// Priority-ordered view of the pool, ties by insertion order.
    pub fn ordered(&self) -> Vec<(GoalId, &Goal<W>)> {
        let mut view: Vec<(GoalId, &Goal<W>)> =
            self.goals.iter().map(|e| (e.id, &e.goal)).collect();
        view.sort_by_key(|(id, goal)| (Reverse(goal.priority()), *id));
        view
    }

    /// Highest-priority goal whose cached verdict is actionable. Evaluates nothing.
    pub fn next_actionable(&self) -> Option<(GoalId, &Goal<W>)> {
        self.goals
            .iter()
            .filter(|e| !e.goal.is_done() && e.goal.is_actionable())
            .min_by_key(|e| (Reverse(e.goal.priority()), e.id))
            .map(|e| (e.id, &e.goal))
    }

    pub fn describe_all(&self) -> String {
        self.ordered()
            .into_iter()
            .map(|(id, goal)| format!("{id} {goal}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Drops every done goal; returns how many were removed.
    pub fn remove_done(&mut self) -> usize {
        let before = self.goals.len();
        let tick = self.ticks_fired;
        let trace = &mut self.trace;
        self.goals.retain(|e| {
            if e.goal.is_done() {
                trace.emit(
                    TraceEvent::new(tick, TAG_EVICTED, e.id.0).with_priority(e.goal.priority()),
                );
                false
            } else {
                true
            }
        });
        before - self.goals.len()
    }

    fn sort(&mut self) {
        self.goals.sort_by_key(|e| (Reverse(e.goal.priority()), e.id));
    }
}

impl<W> Scheduler<W>
where
    W: WorldMut + ?Sized,
{
    /// One decision pass, if the interval has elapsed since the last one.
    ///
    /// Every remaining goal is evaluated in priority order so all cached flags are fresh, then
    /// only the first goal that passed is executed.
    pub fn tick(&mut self, now: Duration, world: &mut W) -> TickOutcome {
        if !self.config.is_due(self.last_tick, now) {
            return TickOutcome::Throttled;
        }
        self.last_tick = Some(now);
        self.ticks_fired += 1;

        let evicted = self.remove_done();
        self.sort();

        let tick = self.ticks_fired;
        let mut winner: Option<usize> = None;
        for (idx, entry) in self.goals.iter_mut().enumerate() {
            let passed = entry.goal.evaluate(&*world);
            if passed && winner.is_none() {
                winner = Some(idx);
            } else if entry.goal.is_done() {
                self.trace.emit(
                    TraceEvent::new(tick, TAG_DONE, entry.id.0)
                        .with_priority(entry.goal.priority()),
                );
            }
        }

        let Some(idx) = winner else {
            debug!(tick, evicted, goals = self.goals.len(), "no actionable goal");
            return TickOutcome::Idle;
        };

        let entry = &mut self.goals[idx];
        let outcome = entry.goal.execute(world);
        self.executions += 1;
        self.trace.emit(
            TraceEvent::new(tick, TAG_EXECUTED, entry.id.0)
                .with_priority(entry.goal.priority())
                .with_success(outcome.is_success()),
        );
        TickOutcome::Executed {
            id: entry.id,
            outcome,
        }
    }
}

impl<W> Scheduler<W>
where
    W: WorldView + ?Sized,
{
    /// Evaluates every goal without executing anything. Refreshes the cached flags that
    /// [`Scheduler::next_actionable`] reads.
    ///
    /// Goals that complete here are traced as done under the current tick count, the same way
    /// [`Scheduler::tick`] reports them, and are evicted on the next fired tick.
    pub fn refresh(&mut self, world: &W) -> usize {
        self.sort();
        let tick = self.ticks_fired;
        let trace = &mut self.trace;
        let mut passed = 0;
        for entry in &mut self.goals {
            let was_done = entry.goal.is_done();
            if entry.goal.evaluate(world) {
                passed += 1;
            } else if !was_done && entry.goal.is_done() {
                trace.emit(
                    TraceEvent::new(tick, TAG_DONE, entry.id.0)
                        .with_priority(entry.goal.priority()),
                );
            }
        }
        passed
    }
}
