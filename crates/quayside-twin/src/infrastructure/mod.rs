//! Infrastructure Layer - External Technology Stack
//!
//! Concrete implementations that depend on external libraries:
//! - `rand_distr` service-time distributions behind
//!   [`DurationSource`](crate::domain::DurationSource)
//! - serde/JSON scenario configuration

pub mod config;
pub mod distributions;

pub use config::{
    BerthConfig, BlockConfig, ConfigError, CraneConfig, HatchProfileConfig, ScenarioConfig, ScheduleConfig,
    VesselConfig,
};
pub use distributions::{DistributionError, DurationSpec, SampledDuration};
