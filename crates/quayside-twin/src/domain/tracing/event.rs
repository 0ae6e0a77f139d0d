//! Notable terminal events

use crate::domain::clock::SimTime;
use crate::domain::yard::Location;
use serde::Serialize;
use std::fmt;

/// Inspection window bracketing berth occupancy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InspectionPhase {
    /// Between berth grant and cargo operations
    Pre,
    /// Between the last crane release and berth release
    Post,
}

/// What happened
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventKind {
    /// Vessel reached its scheduled arrival time
    VesselArrived {
        /// Vessel name
        vessel: String,
    },
    /// Vessel asked for a berth slot
    BerthRequested {
        /// Vessel name
        vessel: String,
        /// Berth name
        berth: String,
    },
    /// Berth slot granted
    BerthAcquired {
        /// Vessel name
        vessel: String,
        /// Berth name
        berth: String,
        /// Scheduled berth position
        position: u32,
    },
    /// Inspection window opened
    InspectionStarted {
        /// Vessel name
        vessel: String,
        /// Pre or post
        phase: InspectionPhase,
    },
    /// Inspection window closed
    InspectionFinished {
        /// Vessel name
        vessel: String,
        /// Pre or post
        phase: InspectionPhase,
    },
    /// Vessel asked for a crane
    CraneRequested {
        /// Vessel name
        vessel: String,
        /// Crane name
        crane: String,
    },
    /// Scheduled crane name has no registered crane
    UnknownCrane {
        /// Vessel name
        vessel: String,
        /// Unmatched crane name
        crane: String,
    },
    /// Crane bound to the vessel
    CraneAcquired {
        /// Vessel name
        vessel: String,
        /// Crane name
        crane: String,
    },
    /// Container lifted off the vessel
    ContainerDischarged {
        /// Vessel name
        vessel: String,
        /// Crane name
        crane: String,
        /// Container id
        container: String,
    },
    /// Container stacked in the yard
    ContainerStored {
        /// Container id
        container: String,
        /// Where it went
        location: Location,
    },
    /// Container could not be stacked
    PlacementFailed {
        /// Container id
        container: String,
        /// Yard error text
        reason: String,
    },
    /// Container loaded onto the vessel
    ContainerLoaded {
        /// Vessel name
        vessel: String,
        /// Crane name
        crane: String,
    },
    /// All rows of a hatch processed
    HatchFinished {
        /// Vessel name
        vessel: String,
        /// Crane name
        crane: String,
        /// Hatch profile name
        hatch: String,
    },
    /// Crane unbound from the vessel
    CraneReleased {
        /// Vessel name
        vessel: String,
        /// Crane name
        crane: String,
    },
    /// Berth slot returned
    BerthReleased {
        /// Vessel name
        vessel: String,
        /// Berth name
        berth: String,
    },
    /// Vessel left the terminal
    VesselDeparted {
        /// Vessel name
        vessel: String,
    },
}

impl EventKind {
    /// Stable discriminant name, matching the serialized `kind` tag
    pub fn name(&self) -> &'static str {
        match self {
            Self::VesselArrived { .. } => "vessel_arrived",
            Self::BerthRequested { .. } => "berth_requested",
            Self::BerthAcquired { .. } => "berth_acquired",
            Self::InspectionStarted { .. } => "inspection_started",
            Self::InspectionFinished { .. } => "inspection_finished",
            Self::CraneRequested { .. } => "crane_requested",
            Self::UnknownCrane { .. } => "unknown_crane",
            Self::CraneAcquired { .. } => "crane_acquired",
            Self::ContainerDischarged { .. } => "container_discharged",
            Self::ContainerStored { .. } => "container_stored",
            Self::PlacementFailed { .. } => "placement_failed",
            Self::ContainerLoaded { .. } => "container_loaded",
            Self::HatchFinished { .. } => "hatch_finished",
            Self::CraneReleased { .. } => "crane_released",
            Self::BerthReleased { .. } => "berth_released",
            Self::VesselDeparted { .. } => "vessel_departed",
        }
    }

    /// Vessel the event concerns, if any
    pub fn vessel(&self) -> Option<&str> {
        match self {
            Self::VesselArrived { vessel }
            | Self::BerthRequested { vessel, .. }
            | Self::BerthAcquired { vessel, .. }
            | Self::InspectionStarted { vessel, .. }
            | Self::InspectionFinished { vessel, .. }
            | Self::CraneRequested { vessel, .. }
            | Self::UnknownCrane { vessel, .. }
            | Self::CraneAcquired { vessel, .. }
            | Self::ContainerDischarged { vessel, .. }
            | Self::ContainerLoaded { vessel, .. }
            | Self::HatchFinished { vessel, .. }
            | Self::CraneReleased { vessel, .. }
            | Self::BerthReleased { vessel, .. }
            | Self::VesselDeparted { vessel } => Some(vessel),
            Self::ContainerStored { .. } | Self::PlacementFailed { .. } => None,
        }
    }
}

/// A timestamped notification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortEvent {
    /// Simulation time
    pub time: SimTime,
    /// Payload
    #[serde(flatten)]
    pub kind: EventKind,
}

impl fmt::Display for PortEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:>10.2}] {}", self.time, self.kind.name())?;
        if let Some(vessel) = self.kind.vessel() {
            write!(f, " {vessel}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_tag_matches_name() {
        let event = PortEvent {
            time: 12.5,
            kind: EventKind::BerthAcquired {
                vessel: "Vessel1".into(),
                berth: "Berth1".into(),
                position: 1,
            },
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], event.kind.name());
        assert_eq!(json["time"], 12.5);
        assert_eq!(json["vessel"], "Vessel1");
        assert_eq!(event.to_string(), "[     12.50] berth_acquired Vessel1");
    }
}
