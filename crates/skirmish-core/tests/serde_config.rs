#![cfg(feature = "serde")]

use std::time::Duration;

use skirmish_core::{SchedulerConfig, StructureKind};

#[test]
fn scheduler_config_reads_millis_and_defaults() {
    let config: SchedulerConfig = serde_json::from_str(r#"{"tick_interval_ms": 400}"#).unwrap();
    assert_eq!(config.tick_interval(), Duration::from_millis(400));

    let config: SchedulerConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config, SchedulerConfig::default());
}

#[test]
fn kinds_are_plain_strings_on_the_wire() {
    let kind: StructureKind = serde_json::from_str(r#""war_factory""#).unwrap();
    assert_eq!(kind, StructureKind::from_static("war_factory"));
    assert_eq!(serde_json::to_string(&kind).unwrap(), r#""war_factory""#);
}
