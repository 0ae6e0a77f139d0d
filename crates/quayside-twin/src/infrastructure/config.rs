//! Scenario configuration (serde / JSON)
//!
//! A scenario names everything the bootstrap wires together: berth, cranes,
//! yard blocks, hatch profiles, vessels and the arrival schedule. Vessels
//! refer to hatch profiles by name and schedule entries refer to vessels
//! and cranes by name. Crane names are only resolved at run time, so an
//! unknown crane is reported by the running vessel rather than rejected
//! here.

use super::distributions::{DurationSpec, SampledDuration};
use crate::domain::port::{HatchProfile, HatchRow, Operation, PlacementFailurePolicy};
use crate::domain::yard::{ContainerSize, ContainerType, RetrievalPolicy};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration failures
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the file failed
    #[error("cannot read {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Not valid scenario JSON
    #[error("invalid scenario JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Well-formed but inconsistent
    #[error("invalid scenario: {0}")]
    Invalid(String),
}

/// The single berth
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BerthConfig {
    /// Berth name
    pub name: String,
    /// Simultaneous vessels
    pub capacity: usize,
}

/// One crane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CraneConfig {
    /// Crane name, referenced by schedule entries
    pub name: String,
    /// Time to load one container
    #[serde(default = "default_move")]
    pub loading_time: DurationSpec,
    /// Time to discharge one container
    #[serde(default = "default_move")]
    pub unloading_time: DurationSpec,
}

/// One yard block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockConfig {
    /// Block name
    pub name: String,
    /// Total containers
    pub capacity: usize,
    /// Declared bays (physical bays are `2 * bays - 1`)
    pub bays: usize,
    /// Cells per bay
    pub cells: usize,
    /// Tier bound per stack
    pub tiers: usize,
    /// What a missed retrieval does with disturbed containers
    #[serde(default)]
    pub retrieval_policy: RetrievalPolicy,
}

/// A named hatch profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HatchProfileConfig {
    /// Profile name, referenced by vessels
    pub name: String,
    /// Manifest rows
    pub rows: Vec<HatchRow>,
}

/// One vessel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VesselConfig {
    /// Vessel name, referenced by schedule entries
    pub name: String,
    /// Length in metres
    #[serde(default = "default_length")]
    pub length: f64,
    /// Width in metres
    #[serde(default = "default_width")]
    pub width: f64,
    /// Hatch profile names, in the order they are added
    #[serde(default)]
    pub hatches: Vec<String>,
}

/// One port call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Vessel name
    pub vessel: String,
    /// Arrival time
    pub arrival_time: f64,
    /// Berthing point
    #[serde(default = "default_berth_position")]
    pub berth_position: u32,
    /// Crane names
    #[serde(default)]
    pub cranes: Vec<String>,
    /// Pre-inspection duration
    #[serde(default = "default_pcat")]
    pub pre_pcat: f64,
    /// Post-inspection duration
    #[serde(default = "default_pcat")]
    pub post_pcat: f64,
}

/// Complete scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Seed of the run's random stream
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Run horizon; `None` runs until no event is left
    #[serde(default = "default_until")]
    pub until: Option<f64>,
    /// The berth
    pub berth: BerthConfig,
    /// Cranes in registration order
    pub cranes: Vec<CraneConfig>,
    /// Yard blocks in scan order
    pub blocks: Vec<BlockConfig>,
    /// Hatch profiles
    #[serde(default)]
    pub hatch_profiles: Vec<HatchProfileConfig>,
    /// Vessels
    pub vessels: Vec<VesselConfig>,
    /// Port calls
    pub schedule: Vec<ScheduleConfig>,
    /// What cranes do when the yard is full
    #[serde(default)]
    pub placement_failure: PlacementFailurePolicy,
}

const fn default_move() -> DurationSpec {
    DurationSpec::DEFAULT_CRANE_MOVE
}

const fn default_length() -> f64 {
    300.0
}

const fn default_width() -> f64 {
    30.0
}

const fn default_berth_position() -> u32 {
    1
}

const fn default_pcat() -> f64 {
    1000.0
}

const fn default_seed() -> u64 {
    42
}

#[allow(clippy::unnecessary_wraps)]
const fn default_until() -> Option<f64> {
    Some(1_000_000.0)
}

impl Default for ScenarioConfig {
    /// Two cranes, two vessels sharing one two-slot berth, two yard blocks
    fn default() -> Self {
        let crane = |name: &str| CraneConfig {
            name: name.into(),
            loading_time: default_move(),
            unloading_time: default_move(),
        };
        let block = |name: &str| BlockConfig {
            name: name.into(),
            capacity: 1000,
            bays: 50,
            cells: 6,
            tiers: 6,
            retrieval_policy: RetrievalPolicy::default(),
        };
        let vessel = |name: &str| VesselConfig {
            name: name.into(),
            length: default_length(),
            width: default_width(),
            hatches: vec!["Hatch_1".into(), "Hatch_1".into()],
        };
        let call = |name: &str, arrival_time: f64| ScheduleConfig {
            vessel: name.into(),
            arrival_time,
            berth_position: 1,
            cranes: vec!["Crane1".into(), "Crane2".into()],
            pre_pcat: default_pcat(),
            post_pcat: default_pcat(),
        };
        Self {
            seed: default_seed(),
            until: default_until(),
            berth: BerthConfig {
                name: "Berth1".into(),
                capacity: 2,
            },
            cranes: vec![crane("Crane1"), crane("Crane2")],
            blocks: vec![block("Block1"), block("Block2")],
            hatch_profiles: vec![HatchProfileConfig {
                name: "Hatch_1".into(),
                rows: vec![
                    HatchRow::new(Operation::Discharge, ContainerType::Laden, ContainerSize::TwentyFt, 100, 120),
                    HatchRow::new(Operation::Load, ContainerType::Laden, ContainerSize::FortyFt, 200, 220),
                ],
            }],
            vessels: vec![vessel("Vessel1"), vessel("Vessel2")],
            schedule: vec![call("Vessel1", 10.0), call("Vessel2", 20.0)],
            placement_failure: PlacementFailurePolicy::default(),
        }
    }
}

impl ScenarioConfig {
    /// Parse and validate JSON text
    ///
    /// # Errors
    /// [`ConfigError::Parse`] or [`ConfigError::Invalid`].
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file
    ///
    /// # Errors
    /// [`ConfigError::Io`] when the file cannot be read, otherwise as
    /// [`ScenarioConfig::from_json_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Pretty JSON
    ///
    /// # Errors
    /// Propagates serializer errors.
    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Hatch profile by name, validated
    ///
    /// # Errors
    /// [`ConfigError::Invalid`] for an unknown name or a bad row range.
    pub fn hatch_profile(&self, name: &str) -> Result<HatchProfile, ConfigError> {
        let cfg = self
            .hatch_profiles
            .iter()
            .find(|h| h.name == name)
            .ok_or_else(|| ConfigError::Invalid(format!("unknown hatch profile `{name}`")))?;
        HatchProfile::new(cfg.name.clone(), cfg.rows.clone()).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Check internal consistency
    ///
    /// # Errors
    /// [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if self.berth.capacity == 0 {
            return invalid(format!("berth `{}` has zero capacity", self.berth.name));
        }
        if let Some(until) = self.until {
            if !until.is_finite() || until < 0.0 {
                return invalid(format!("horizon {until} must be a finite non-negative time"));
            }
        }

        let mut crane_names = HashSet::new();
        for crane in &self.cranes {
            if !crane_names.insert(crane.name.as_str()) {
                return invalid(format!("duplicate crane `{}`", crane.name));
            }
            for spec in [&crane.loading_time, &crane.unloading_time] {
                SampledDuration::from_spec(spec)
                    .map_err(|e| ConfigError::Invalid(format!("crane `{}`: {e}", crane.name)))?;
            }
        }

        let mut block_names = HashSet::new();
        for block in &self.blocks {
            if !block_names.insert(block.name.as_str()) {
                return invalid(format!("duplicate block `{}`", block.name));
            }
            if block.capacity == 0 || block.bays == 0 || block.cells == 0 || block.tiers == 0 {
                return invalid(format!("block `{}` has a zero dimension", block.name));
            }
        }

        for profile in &self.hatch_profiles {
            self.hatch_profile(&profile.name)?;
        }

        let mut vessel_names = HashSet::new();
        for vessel in &self.vessels {
            if !vessel_names.insert(vessel.name.as_str()) {
                return invalid(format!("duplicate vessel `{}`", vessel.name));
            }
            for hatch in &vessel.hatches {
                if !self.hatch_profiles.iter().any(|h| &h.name == hatch) {
                    return invalid(format!("vessel `{}` uses unknown hatch profile `{hatch}`", vessel.name));
                }
            }
        }

        let mut scheduled = HashSet::new();
        for call in &self.schedule {
            if !vessel_names.contains(call.vessel.as_str()) {
                return invalid(format!("schedule references unknown vessel `{}`", call.vessel));
            }
            if !scheduled.insert(call.vessel.as_str()) {
                return invalid(format!("vessel `{}` is scheduled twice", call.vessel));
            }
            let times = [call.arrival_time, call.pre_pcat, call.post_pcat];
            if times.iter().any(|t| !t.is_finite() || *t < 0.0) {
                return invalid(format!(
                    "vessel `{}`: arrival and inspection times must be finite and non-negative",
                    call.vessel
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_bootstrap() {
        let config = ScenarioConfig::default();
        config.validate().unwrap();
        assert_eq!(config.seed, 42);
        assert_eq!(config.until, Some(1_000_000.0));
        assert_eq!(config.berth.capacity, 2);
        assert_eq!(config.cranes.len(), 2);
        assert_eq!(config.blocks[1].bays, 50);
        assert_eq!(config.schedule[1].arrival_time, 20.0);
        let hatch = config.hatch_profile("Hatch_1").unwrap();
        assert_eq!(hatch.range(Operation::Load), (200, 220));
    }

    #[test]
    fn test_json_round_trip_keeps_defaults() {
        let config = ScenarioConfig::default();
        let text = config.to_json_pretty().unwrap();
        assert_eq!(ScenarioConfig::from_json_str(&text).unwrap(), config);
    }

    #[test]
    fn test_optional_fields_default() {
        let text = r#"{
            "berth": {"name": "B", "capacity": 1},
            "cranes": [{"name": "C"}],
            "blocks": [{"name": "Y", "capacity": 10, "bays": 2, "cells": 2, "tiers": 2}],
            "vessels": [{"name": "V"}],
            "schedule": [{"vessel": "V", "arrival_time": 5.0, "cranes": ["C"]}]
        }"#;
        let config = ScenarioConfig::from_json_str(text).unwrap();
        assert_eq!(config.seed, 42);
        assert_eq!(config.cranes[0].loading_time, DurationSpec::DEFAULT_CRANE_MOVE);
        assert_eq!(config.blocks[0].retrieval_policy, RetrievalPolicy::LeaveReshuffled);
        assert_eq!(config.schedule[0].pre_pcat, 1000.0);
        assert_eq!(config.placement_failure, PlacementFailurePolicy::Skip);
    }

    #[test]
    fn test_rejects_inconsistent_scenarios() {
        let mut config = ScenarioConfig::default();
        config.schedule[0].vessel = "Ghost".into();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = ScenarioConfig::default();
        config.hatch_profiles[0].rows[0].min_count = 500;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = ScenarioConfig::default();
        config.blocks[0].tiers = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = ScenarioConfig::default();
        config.schedule[1].pre_pcat = -1.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_unknown_crane_is_accepted() {
        let mut config = ScenarioConfig::default();
        config.schedule[0].cranes.push("Crane9".into());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(ScenarioConfig::from_json_str("{"), Err(ConfigError::Parse(_))));
    }
}
