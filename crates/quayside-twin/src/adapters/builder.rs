//! Scenario bootstrap
//!
//! Turns a [`ScenarioConfig`] into a populated [`Port`]: berth, cranes with
//! their duration distributions, yard blocks, vessels with their hatch
//! profiles, and the schedule. [`run_scenario`] then dispatches arrivals,
//! runs to the configured horizon and summarises the result.

use crate::domain::error::SimError;
use crate::domain::kernel::RunReport;
use crate::domain::port::{Port, ScheduleEntry, Vessel, VesselState};
use crate::domain::stats::{Metric, StatsCollector, Summary};
use crate::domain::tracing::EventSink;
use crate::domain::yard::{YardBlock, YardPlanner, YardSnapshot};
use crate::infrastructure::config::{ConfigError, ScenarioConfig};
use crate::infrastructure::distributions::{DistributionError, SampledDuration};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Bootstrap failures
#[derive(Debug, Error)]
pub enum BuildError {
    /// Configuration rejected
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Domain object rejected
    #[error(transparent)]
    Sim(#[from] SimError),
}

/// Per-vessel result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VesselSummary {
    /// Vessel name
    pub name: String,
    /// Final lifecycle state
    pub state: VesselState,
    /// Arrival time
    pub arrived_at: Option<f64>,
    /// Berth grant time
    pub berthed_at: Option<f64>,
    /// Departure time
    pub departed_at: Option<f64>,
    /// Hatches worked
    pub finished_hatches: usize,
}

/// Per-crane statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CraneSummary {
    /// Crane name
    pub name: String,
    /// Loading/unloading summaries
    pub stats: BTreeMap<Metric, Summary>,
}

/// Serializable summary of a finished run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunOutcome {
    /// Seed used
    pub seed: u64,
    /// Kernel counters
    pub report: RunReport,
    /// Aborted processes, `label: error`
    pub failures: Vec<String>,
    /// Vessels in registration order
    pub vessels: Vec<VesselSummary>,
    /// Vessels that departed
    pub departed: usize,
    /// Containers created by discharge
    pub containers_created: u64,
    /// Containers currently in the yard
    pub containers_stored: usize,
    /// Containers the yard could not take
    pub containers_unplaced: usize,
    /// Berth waiting and turnaround summaries
    pub berth_stats: BTreeMap<Metric, Summary>,
    /// Per-crane summaries
    pub cranes: Vec<CraneSummary>,
    /// Loading/unloading summaries over every crane
    pub crane_totals: BTreeMap<Metric, Summary>,
}

/// A finished run: the summary plus the port for further inspection
#[derive(Debug)]
pub struct ScenarioRun {
    /// Summary
    pub outcome: RunOutcome,
    /// Port after the run
    pub port: Port,
}

impl ScenarioRun {
    /// Yard stack heights after the run
    pub fn snapshot(&self) -> YardSnapshot {
        self.port.terminal().yard().snapshot()
    }
}

/// Build a port from a validated configuration
///
/// # Errors
/// [`BuildError::Config`] if validation fails, [`BuildError::Sim`] if a
/// domain constructor rejects a value.
pub fn build_port(config: &ScenarioConfig, sinks: Vec<Box<dyn EventSink>>) -> Result<Port, BuildError> {
    config.validate()?;

    let mut yard = YardPlanner::new();
    for block in &config.blocks {
        let block = YardBlock::new(block.name.clone(), block.capacity, block.bays, block.cells, block.tiers)
            .map_err(SimError::from)?
            .with_retrieval_policy(block.retrieval_policy);
        yard.add_block(block);
    }

    let mut port = Port::new(config.berth.name.clone(), config.berth.capacity, yard, config.seed)
        .map_err(SimError::from)?;
    port.set_placement_failure_policy(config.placement_failure);
    for sink in sinks {
        port.add_sink(sink);
    }

    for crane in &config.cranes {
        let invalid = |e: DistributionError| {
            ConfigError::Invalid(format!("crane `{}`: {e}", crane.name))
        };
        let loading = SampledDuration::boxed(&crane.loading_time).map_err(invalid)?;
        let unloading = SampledDuration::boxed(&crane.unloading_time).map_err(invalid)?;
        port.add_crane(crane.name.clone(), loading, unloading)
            .map_err(SimError::from)?;
    }

    for vessel_cfg in &config.vessels {
        let mut vessel = Vessel::new(vessel_cfg.name.clone(), vessel_cfg.length, vessel_cfg.width);
        for hatch in &vessel_cfg.hatches {
            vessel.add_hatch_profile(config.hatch_profile(hatch)?);
        }
        port.add_vessel(vessel);
    }

    for call in &config.schedule {
        let vessel = port
            .terminal()
            .vessel_by_name(&call.vessel)
            .ok_or_else(|| ConfigError::Invalid(format!("unknown vessel `{}`", call.vessel)))?;
        port.add_schedule(ScheduleEntry {
            vessel,
            arrival_time: call.arrival_time,
            berth_position: call.berth_position,
            cranes: call.cranes.clone(),
            pre_pcat: call.pre_pcat,
            post_pcat: call.post_pcat,
        })?;
    }
    Ok(port)
}

/// Build, dispatch arrivals, run to `config.until` and summarise
///
/// # Errors
/// As [`build_port`], plus kernel spawn failures.
pub fn run_scenario(config: &ScenarioConfig, sinks: Vec<Box<dyn EventSink>>) -> Result<ScenarioRun, BuildError> {
    let mut port = build_port(config, sinks)?;
    let dispatched = port.process_arrivals()?;
    tracing::info!(vessels = dispatched, seed = config.seed, until = ?config.until, "scenario started");

    let report = port.run(config.until);
    let outcome = summarize(config.seed, &port, report);
    tracing::info!(
        events = outcome.report.events_processed,
        final_time = outcome.report.final_time,
        departed = outcome.departed,
        aborted = outcome.report.aborted,
        "scenario finished"
    );
    Ok(ScenarioRun { outcome, port })
}

fn summarize(seed: u64, port: &Port, report: RunReport) -> RunOutcome {
    let terminal = port.terminal();
    let vessels: Vec<VesselSummary> = terminal
        .vessels()
        .iter()
        .map(|v| VesselSummary {
            name: v.name().to_owned(),
            state: v.state(),
            arrived_at: v.arrived_at(),
            berthed_at: v.berthed_at(),
            departed_at: v.departed_at(),
            finished_hatches: v.finished_hatches(),
        })
        .collect();
    let mut crane_totals = StatsCollector::new();
    for crane in terminal.cranes() {
        crane_totals.merge(crane.stats());
    }
    RunOutcome {
        seed,
        report,
        failures: port
            .simulation()
            .failures()
            .iter()
            .map(|f| format!("{}: {}", f.label, f.error))
            .collect(),
        departed: vessels.iter().filter(|v| v.state == VesselState::Departed).count(),
        vessels,
        containers_created: terminal.containers_created(),
        containers_stored: terminal.yard().stored(),
        containers_unplaced: terminal.unplaced().len(),
        berth_stats: terminal.stats().summaries(),
        cranes: terminal
            .cranes()
            .iter()
            .map(|c| CraneSummary {
                name: c.name().to_owned(),
                stats: c.stats().summaries(),
            })
            .collect(),
        crane_totals: crane_totals.summaries(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::distributions::DurationSpec;

    #[test]
    fn test_build_registers_everything() {
        let config = ScenarioConfig::default();
        let port = build_port(&config, Vec::new()).unwrap();
        let terminal = port.terminal();
        assert_eq!(terminal.berth().name(), "Berth1");
        assert_eq!(terminal.berth().capacity(), 2);
        assert_eq!(terminal.cranes().len(), 2);
        assert_eq!(terminal.yard().blocks().len(), 2);
        assert_eq!(terminal.vessels()[0].hatch_profiles().len(), 2);
        assert_eq!(terminal.schedule().len(), 2);
    }

    #[test]
    fn test_invalid_config_is_rejected_before_building() {
        let mut config = ScenarioConfig::default();
        config.cranes[0].loading_time = DurationSpec::Exponential { rate: -1.0 };
        assert!(matches!(
            build_port(&config, Vec::new()),
            Err(BuildError::Config(ConfigError::Invalid(_)))
        ));
    }

    #[test]
    fn test_small_scenario_runs_to_completion() {
        let mut config = ScenarioConfig::default();
        config.until = None;
        for crane in &mut config.cranes {
            crane.loading_time = DurationSpec::Fixed { value: 1.0 };
            crane.unloading_time = DurationSpec::Fixed { value: 2.0 };
        }
        for row in &mut config.hatch_profiles[0].rows {
            row.min_count = 2;
            row.max_count = 3;
        }

        let run = run_scenario(&config, Vec::new()).unwrap();
        let outcome = &run.outcome;
        assert_eq!(outcome.departed, 2);
        assert!(outcome.failures.is_empty());
        assert_eq!(outcome.report.live, 0);
        assert_eq!(outcome.containers_stored as u64, outcome.containers_created);
        assert!(outcome.vessels.iter().all(|v| v.finished_hatches == 2));
        assert_eq!(run.snapshot().blocks.len(), 2);

        let moves: usize = outcome
            .cranes
            .iter()
            .filter_map(|c| c.stats.get(&Metric::UnloadingTime))
            .map(|s| s.count)
            .sum();
        let total = outcome.crane_totals[&Metric::UnloadingTime];
        assert_eq!(total.count, moves);
        assert_eq!(total.count as u64, outcome.containers_created);
        assert_eq!(total.average, 2.0);
    }
}
