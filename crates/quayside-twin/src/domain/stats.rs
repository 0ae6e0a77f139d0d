//! Append-only statistics

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// What a sample measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// One container loaded by a crane
    LoadingTime,
    /// One container discharged by a crane
    UnloadingTime,
    /// Arrival until berth grant
    BerthWaitingTime,
    /// Arrival until departure
    TurnaroundTime,
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::LoadingTime => "loading_time",
            Self::UnloadingTime => "unloading_time",
            Self::BerthWaitingTime => "berth_waiting_time",
            Self::TurnaroundTime => "turnaround_time",
        };
        f.write_str(name)
    }
}

/// Summary of one metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    /// Number of samples
    pub count: usize,
    /// Sum
    pub total: f64,
    /// Smallest sample
    pub min: f64,
    /// Largest sample
    pub max: f64,
    /// Mean
    pub average: f64,
}

/// Samples keyed by [`Metric`]; values are only ever appended
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatsCollector {
    samples: BTreeMap<Metric, Vec<f64>>,
}

impl StatsCollector {
    /// Empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sample
    pub fn add(&mut self, metric: Metric, value: f64) {
        self.samples.entry(metric).or_default().push(value);
    }

    /// All samples of `metric`, oldest first
    pub fn values(&self, metric: Metric) -> &[f64] {
        self.samples.get(&metric).map(Vec::as_slice).unwrap_or_default()
    }

    /// Number of samples
    pub fn count(&self, metric: Metric) -> usize {
        self.values(metric).len()
    }

    /// Sum of samples, 0 when empty
    pub fn total(&self, metric: Metric) -> f64 {
        self.values(metric).iter().sum()
    }

    /// Smallest sample
    pub fn min(&self, metric: Metric) -> Option<f64> {
        self.values(metric).iter().copied().reduce(f64::min)
    }

    /// Largest sample
    pub fn max(&self, metric: Metric) -> Option<f64> {
        self.values(metric).iter().copied().reduce(f64::max)
    }

    /// Mean of samples
    pub fn average(&self, metric: Metric) -> Option<f64> {
        let values = self.values(metric);
        (!values.is_empty()).then(|| self.total(metric) / values.len() as f64)
    }

    /// Summary of `metric`, `None` without samples
    pub fn summary(&self, metric: Metric) -> Option<Summary> {
        Some(Summary {
            count: self.count(metric),
            total: self.total(metric),
            min: self.min(metric)?,
            max: self.max(metric)?,
            average: self.average(metric)?,
        })
    }

    /// Summaries of every metric with samples
    pub fn summaries(&self) -> BTreeMap<Metric, Summary> {
        self.samples
            .keys()
            .filter_map(|&m| self.summary(m).map(|s| (m, s)))
            .collect()
    }

    /// Append every sample of `other`
    pub fn merge(&mut self, other: &StatsCollector) {
        for (metric, values) in &other.samples {
            self.samples.entry(*metric).or_default().extend_from_slice(values);
        }
    }
}
