//! Adapters Layer - Ports & Adapters Pattern
//!
//! Connects the domain to its inputs and outputs: a scenario
//! configuration goes in, a ready [`Port`](crate::domain::port::Port)
//! and, after the run, a serializable [`RunOutcome`] come out.

pub mod builder;

pub use builder::{build_port, run_scenario, BuildError, CraneSummary, RunOutcome, ScenarioRun, VesselSummary};
