//! Configuration loading, from .skirmish/config.yaml

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use skirmish_catalog::{Posture, PostureSpec, StrategyCatalog};
use skirmish_core::{Scheduler, SchedulerConfig, UnitCensus};

use crate::sandbox::SandboxConfig;

pub const CONFIG_PATH: &str = ".skirmish/config.yaml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SkirmishConfig {
    /// Decision cadence
    pub scheduler: SchedulerConfig,

    /// Sandbox world tuning
    pub sandbox: SandboxConfig,

    /// Extra postures, selectable by name next to the built-in ones
    pub postures: Vec<PostureSpec>,
}

impl SkirmishConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        for posture in &config.postures {
            posture
                .validate()
                .with_context(|| format!("Invalid posture in {}", path.display()))?;
        }
        Ok(config)
    }

    /// Load from project root, falling back to defaults when there is no config file
    pub fn load_from_project(project_root: &Path) -> Result<Self> {
        let config_path = project_root.join(CONFIG_PATH);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Built-in postures win over configured ones with the same name.
    pub fn resolve_posture(&self, name: &str) -> Result<PostureChoice> {
        if let Ok(posture) = name.parse::<Posture>() {
            return Ok(PostureChoice::BuiltIn(posture));
        }
        match self.postures.iter().find(|p| p.name == name) {
            Some(spec) => Ok(PostureChoice::Custom(spec.clone())),
            None => bail!("Unknown posture '{}'", name),
        }
    }

    pub fn posture_names(&self) -> Vec<String> {
        Posture::ALL
            .iter()
            .map(|p| p.name().to_string())
            .chain(self.postures.iter().map(|p| p.name.clone()))
            .collect()
    }
}

#[derive(Debug, Clone)]
pub enum PostureChoice {
    BuiltIn(Posture),
    Custom(PostureSpec),
}

impl PostureChoice {
    pub fn name(&self) -> &str {
        match self {
            PostureChoice::BuiltIn(p) => p.name(),
            PostureChoice::Custom(spec) => &spec.name,
        }
    }

    pub fn install<W>(&self, scheduler: &mut Scheduler<W>)
    where
        W: UnitCensus + 'static,
    {
        match self {
            PostureChoice::BuiltIn(p) => StrategyCatalog::apply(*p, scheduler),
            PostureChoice::Custom(spec) => spec.install(scheduler),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = SkirmishConfig::load_from_project(dir.path()).unwrap();
        assert_eq!(config.scheduler.tick_interval_ms, 250);
        assert!(config.postures.is_empty());
    }

    #[test]
    fn loads_partial_yaml() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(".skirmish")).unwrap();
        std::fs::write(
            dir.path().join(CONFIG_PATH),
            r#"
scheduler:
  tick_interval_ms: 500
sandbox:
  starting_gold: 42
postures:
  - name: turtle
    goals:
      - type: structure
        structure: turret
        priority: 50
        max_count: 6
"#,
        )
        .unwrap();

        let config = SkirmishConfig::load_from_project(dir.path()).unwrap();
        assert_eq!(config.scheduler.tick_interval_ms, 500);
        assert_eq!(config.sandbox.starting_gold, 42);
        assert_eq!(config.sandbox.queue_capacity, SandboxConfig::default().queue_capacity);

        let choice = config.resolve_posture("turtle").unwrap();
        assert_eq!(choice.name(), "turtle");
        assert!(matches!(
            config.resolve_posture("military").unwrap(),
            PostureChoice::BuiltIn(Posture::Military)
        ));
        assert!(config.resolve_posture("nope").is_err());
        assert_eq!(config.posture_names().len(), 6);
    }

    #[test]
    fn invalid_posture_is_reported_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "postures:\n  - name: bad\n    goals:\n      - type: structure\n        structure: turret\n        priority: 1\n        max_count: 0\n",
        )
        .unwrap();

        let err = SkirmishConfig::load(&path).unwrap_err();
        assert!(err.to_string().starts_with("Invalid posture in"));
    }
}
