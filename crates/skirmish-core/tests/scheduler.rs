use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

use skirmish_core::{
    CommandOutcome, CountUnits, Goal, GoalId, ProductionGoal, ResourceLedger, Scheduler,
    SchedulerConfig, StructureGoal, StructureKind, TickOutcome, UnitCensus, UnitKind, WorldMut,
    WorldView,
};
use skirmish_tools::trace::{TAG_DONE, TAG_EVICTED, TAG_EXECUTED};
use skirmish_tools::{TraceEvent, TraceSink};

const REFINERY: StructureKind = StructureKind::from_static("refinery");
const TURRET: StructureKind = StructureKind::from_static("turret");
const FACTORY: StructureKind = StructureKind::from_static("war_factory");
const TANK: UnitKind = UnitKind::from_static("tank");

struct Ledger {
    gold: u32,
}

impl ResourceLedger for Ledger {
    fn gold(&self) -> u32 {
        self.gold
    }

    fn available_energy(&self) -> u32 {
        u32::MAX
    }
}

struct World {
    ledger: Ledger,
    structures: BTreeMap<StructureKind, u32>,
    tanks: u32,
    log: Vec<String>,
}

impl Default for World {
    fn default() -> Self {
        Self {
            ledger: Ledger { gold: 10_000 },
            structures: BTreeMap::new(),
            tanks: 0,
            log: Vec::new(),
        }
    }
}

impl WorldView for World {
    type Ledger = Ledger;

    fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    fn structure_count(&self, kind: &StructureKind) -> u32 {
        self.structures.get(kind).copied().unwrap_or(0)
    }

    fn is_under_construction(&self, _kind: &StructureKind) -> bool {
        false
    }

    fn build_cooldown_active(&self) -> bool {
        false
    }

    fn has_building(&self, kind: &StructureKind) -> bool {
        self.structure_count(kind) > 0
    }

    fn production_queue_full(&self, _producer: &StructureKind) -> bool {
        false
    }
}

impl WorldMut for World {
    fn build(&mut self, kind: &StructureKind) -> CommandOutcome {
        self.log.push(format!("build {kind}"));
        CommandOutcome::Success
    }

    fn produce(&mut self, unit: &UnitKind, _producer: &StructureKind) -> CommandOutcome {
        self.log.push(format!("produce {unit}"));
        CommandOutcome::Success
    }
}

impl UnitCensus for World {
    fn unit_count(&self, unit: &UnitKind) -> u32 {
        if *unit == TANK {
            self.tanks
        } else {
            0
        }
    }
}

#[derive(Clone, Default)]
struct RcSink(Rc<RefCell<Vec<TraceEvent>>>);

impl TraceSink for RcSink {
    fn emit(&mut self, event: TraceEvent) {
        self.0.borrow_mut().push(event);
    }
}

fn build(priority: i32, kind: StructureKind) -> Goal<World> {
    Goal::new(priority, StructureGoal::new(kind))
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn scheduler() -> Scheduler<World> {
    Scheduler::new(SchedulerConfig::with_interval(ms(250)))
}

#[test]
fn tick_executes_only_the_highest_priority_goal() {
    let mut sched = scheduler();
    let low = sched.add(build(50, TURRET));
    let high = sched.add(build(90, REFINERY));
    let mut world = World::default();

    let outcome = sched.tick(ms(0), &mut world);

    assert_eq!(
        outcome,
        TickOutcome::Executed {
            id: high,
            outcome: CommandOutcome::Success
        }
    );
    assert_eq!(world.log, vec!["build refinery".to_string()]);
    assert_eq!(sched.executions(), 1);

    // The lower goal was still evaluated and cached as actionable.
    assert!(sched.get(low).unwrap().is_actionable());
    assert!(!sched.get(high).unwrap().is_actionable());
    assert_eq!(sched.next_actionable().map(|(id, _)| id), Some(low));
}

#[test]
fn ties_break_by_insertion_order() {
    let mut sched = scheduler();
    let first = sched.add(build(70, TURRET));
    let _second = sched.add(build(70, REFINERY));
    let mut world = World::default();

    assert!(matches!(
        sched.tick(ms(0), &mut world),
        TickOutcome::Executed { id, .. } if id == first
    ));
}

#[test]
fn ties_follow_insertion_order_even_after_priority_changes() {
    let mut sched = scheduler();
    let a = sched.add(build(50, TURRET));
    let b = sched.add(build(60, REFINERY));
    sched.get_mut(b).unwrap().set_priority(50);

    let order: Vec<GoalId> = sched.ordered().into_iter().map(|(id, _)| id).collect();
    assert_eq!(order, vec![a, b]);

    let mut world = World::default();
    assert!(matches!(
        sched.tick(ms(0), &mut world),
        TickOutcome::Executed { id, .. } if id == a
    ));
}

#[test]
fn ticks_inside_the_interval_are_throttled() {
    let mut sched = scheduler();
    sched.add(build(10, TURRET).with_name("a"));
    sched.add(build(5, REFINERY).with_name("b"));
    let mut world = World::default();

    assert!(matches!(sched.tick(ms(1_000), &mut world), TickOutcome::Executed { .. }));
    assert_eq!(sched.tick(ms(1_100), &mut world), TickOutcome::Throttled);
    assert_eq!(sched.tick(ms(1_249), &mut world), TickOutcome::Throttled);
    assert_eq!(sched.ticks_fired(), 1);
    assert_eq!(world.log.len(), 1);

    assert!(matches!(sched.tick(ms(1_250), &mut world), TickOutcome::Executed { .. }));
    assert_eq!(sched.ticks_fired(), 2);
}

#[test]
fn sub_millisecond_interval_still_throttles() {
    assert_eq!(SchedulerConfig::with_interval(Duration::ZERO).tick_interval_ms, 0);
    assert_eq!(SchedulerConfig::with_interval(Duration::from_micros(1_700)).tick_interval_ms, 1);

    let config = SchedulerConfig::with_interval(Duration::from_micros(300));
    assert_eq!(config.tick_interval_ms, 1);

    let mut sched = Scheduler::new(config);
    sched.add(build(10, TURRET));
    let mut world = World::default();
    assert!(matches!(sched.tick(ms(0), &mut world), TickOutcome::Executed { .. }));
    assert_eq!(sched.tick(Duration::from_micros(300), &mut world), TickOutcome::Throttled);
    assert!(matches!(sched.tick(ms(1), &mut world), TickOutcome::Executed { .. }));
}

#[test]
fn done_goals_are_evicted_on_the_next_fired_tick() {
    let mut sched = scheduler();
    let refinery = sched.add(build(90, REFINERY));
    let turret = sched.add(build(10, TURRET));
    let mut world = World::default();
    world.structures.insert(REFINERY, 1);

    sched.tick(ms(0), &mut world);
    assert!(sched.get(refinery).unwrap().is_done());
    assert_eq!(sched.len(), 2);
    assert_eq!(sched.active_count(), 1);
    assert_eq!(world.log, vec!["build turret".to_string()]);

    sched.tick(ms(250), &mut world);
    assert!(sched.get(refinery).is_none());
    assert!(sched.get(turret).is_some());
}

#[test]
fn production_goal_runs_every_tick_until_target() {
    let mut sched = scheduler();
    sched.add(Goal::new(
        80,
        ProductionGoal::new(TANK, FACTORY, 2, CountUnits(TANK)).with_cost(300, 0),
    ));
    let mut world = World::default();
    world.structures.insert(FACTORY, 1);

    for step in 0..3u64 {
        sched.tick(ms(step * 250), &mut world);
    }
    assert_eq!(world.log.len(), 3);

    world.tanks = 2;
    assert_eq!(sched.tick(ms(750), &mut world), TickOutcome::Idle);
    assert_eq!(sched.active_count(), 0);

    sched.tick(ms(1_000), &mut world);
    assert!(sched.is_empty());
}

#[test]
fn empty_pool_is_idle() {
    let mut sched = scheduler();
    let mut world = World::default();

    assert_eq!(sched.tick(ms(0), &mut world), TickOutcome::Idle);
    assert!(sched.next_actionable().is_none());
    assert_eq!(sched.describe_all(), "");
}

#[test]
fn add_remove_clear() {
    let mut sched = scheduler();
    let a = sched.add(build(1, TURRET));
    let b = sched.add(build(2, REFINERY));
    assert_ne!(a, b);
    assert_eq!(sched.len(), 2);

    let removed = sched.remove(a).unwrap();
    assert_eq!(removed.name(), "build turret");
    assert!(sched.remove(a).is_none());

    sched.clear();
    assert!(sched.is_empty());
}

#[test]
fn next_actionable_reads_cached_flags_without_evaluating() {
    let mut sched = scheduler();
    let a = sched.add(build(5, TURRET));
    let b = sched.add(build(9, REFINERY));

    // Fresh goals start out actionable.
    assert_eq!(sched.next_actionable().map(|(id, _)| id), Some(b));

    let mut world = World::default();
    world.structures.insert(REFINERY, 1);
    assert_eq!(sched.refresh(&world), 1);
    assert_eq!(sched.next_actionable().map(|(id, _)| id), Some(a));
    assert!(world.log.is_empty());
}

#[test]
fn describe_all_lists_in_priority_order() {
    let mut sched = scheduler();
    sched.add(build(5, TURRET));
    sched.add(build(9, REFINERY));

    let text = sched.describe_all();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("#1 build refinery"));
    assert!(lines[1].starts_with("#0 build turret"));
}

#[test]
fn trace_sink_records_decisions() {
    let sink = RcSink::default();
    let events = sink.0.clone();
    let mut sched = scheduler().with_trace_sink(Box::new(sink));
    let refinery = sched.add(build(90, REFINERY));
    let turret = sched.add(build(10, TURRET));
    let mut world = World::default();
    world.structures.insert(REFINERY, 1);

    sched.tick(ms(0), &mut world);
    sched.tick(ms(250), &mut world);

    let events = events.borrow();
    let tags: Vec<(u64, &str, u64)> = events
        .iter()
        .map(|e| (e.tick, e.tag.as_ref(), e.goal))
        .collect();
    assert_eq!(
        tags,
        vec![
            (1, TAG_DONE, refinery.0),
            (1, TAG_EXECUTED, turret.0),
            (2, TAG_EVICTED, refinery.0),
            (2, TAG_EXECUTED, turret.0),
        ]
    );
    assert_eq!(events[1].success, Some(true));
}

#[test]
fn refresh_traces_goals_it_completes() {
    let sink = RcSink::default();
    let events = sink.0.clone();
    let mut sched = scheduler().with_trace_sink(Box::new(sink));
    let refinery = sched.add(build(90, REFINERY));
    let turret = sched.add(build(10, TURRET));
    let mut world = World::default();
    world.structures.insert(REFINERY, 1);

    assert_eq!(sched.refresh(&world), 1);
    // Already done: a second refresh reports nothing new.
    assert_eq!(sched.refresh(&world), 1);
    sched.tick(ms(0), &mut world);

    let tags: Vec<(u64, String, u64)> = events
        .borrow()
        .iter()
        .map(|e| (e.tick, e.tag.to_string(), e.goal))
        .collect();
    assert_eq!(
        tags,
        vec![
            (0, TAG_DONE.to_string(), refinery.0),
            (1, TAG_EVICTED.to_string(), refinery.0),
            (1, TAG_EXECUTED.to_string(), turret.0),
        ]
    );
}
