//! Vessel port-call process
//!
//! ```text
//!  Start ──sleep(arrival - now)──▶ Arriving ──acquire(berth)──▶ Berthing
//!    ──sleep(pre_pcat)──▶ PreInspecting ──spawn crane assignments──▶ Working
//!    ──(activated by last crane release)──▶ PostInspecting
//!    ──sleep(post_pcat)──▶ release berth ──▶ Departed
//! ```
//!
//! The vessel never waits on its cranes directly. It passivates after
//! spawning the crane assignments, and the crane whose release leaves the
//! vessel with no held and no queued crane activates it. Only then does
//! post-inspection start, so the berth is released exactly once.

use super::crane_ops::CraneAssignment;
use super::terminal::Terminal;
use super::vessel::{VesselId, VesselState};
use crate::domain::error::SimError;
use crate::domain::kernel::{Context, Process, Step, Wake};
use crate::domain::resources::Grant;
use crate::domain::stats::Metric;
use crate::domain::tracing::{EventKind, InspectionPhase};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Start,
    Arriving,
    Berthing,
    PreInspecting,
    Working,
    PostInspecting,
}

/// One vessel's port call, driven by a schedule entry
#[derive(Debug)]
pub struct VesselProcess {
    entry: usize,
    vessel: VesselId,
    label: String,
    stage: Stage,
}

impl VesselProcess {
    /// Process for schedule entry `entry` of `vessel`
    pub fn new(entry: usize, vessel: VesselId, label: String) -> Self {
        Self {
            entry,
            vessel,
            label,
            stage: Stage::Start,
        }
    }

    fn unexpected(&self, wake: Wake) -> SimError {
        SimError::UnexpectedWake {
            process: format!("{} in {:?}", self.label, self.stage),
            wake,
        }
    }

    fn begin(&mut self, cx: &mut Context<'_, Terminal>) -> Result<Step, SimError> {
        let now = cx.now();
        let terminal = cx.world_mut();
        let Some(entry) = terminal.schedule.get(self.entry).cloned() else {
            return Err(SimError::UnknownVessel(self.vessel));
        };
        let vessel = terminal.vessel_mut(self.vessel)?;
        vessel.pre_pcat = entry.pre_pcat.max(0.0);
        vessel.post_pcat = entry.post_pcat.max(0.0);
        vessel.arrival_time = entry.arrival_time;
        vessel.state = VesselState::Scheduled;

        self.stage = Stage::Arriving;
        Ok(Step::Sleep((entry.arrival_time - now).max(0.0)))
    }

    fn arrive(&mut self, cx: &mut Context<'_, Terminal>) -> Result<Step, SimError> {
        let now = cx.now();
        let terminal = cx.world_mut();
        let berth = terminal.berth.resource();
        let berth_name = terminal.berth.name().to_owned();
        let vessel = terminal.vessel_mut(self.vessel)?;
        vessel.arrived_at = Some(now);
        vessel.state = VesselState::Arrived;
        let name = vessel.name().to_owned();
        terminal.emit(now, EventKind::VesselArrived { vessel: name.clone() });

        terminal.vessel_mut(self.vessel)?.state = VesselState::AwaitingBerth;
        terminal.emit(
            now,
            EventKind::BerthRequested {
                vessel: name,
                berth: berth_name,
            },
        );
        self.stage = Stage::Berthing;
        Ok(Step::Acquire(berth))
    }

    fn moor(&mut self, grant: Grant, cx: &mut Context<'_, Terminal>) -> Result<Step, SimError> {
        let now = cx.now();
        let terminal = cx.world_mut();
        let position = terminal
            .schedule
            .get(self.entry)
            .map_or(0, |entry| entry.berth_position);
        terminal.berth.occupied_by.push(self.vessel);
        let berth_name = terminal.berth.name().to_owned();

        let vessel = terminal.vessel_mut(self.vessel)?;
        vessel.berth_grant = Some(grant);
        vessel.berthed_at = Some(now);
        vessel.state = VesselState::PreInspecting;
        let waited = now - vessel.arrived_at.unwrap_or(now);
        let pre_pcat = vessel.pre_pcat;
        let name = vessel.name().to_owned();

        terminal.stats.add(Metric::BerthWaitingTime, waited);
        terminal.emit(
            now,
            EventKind::BerthAcquired {
                vessel: name.clone(),
                berth: berth_name,
                position,
            },
        );
        terminal.emit(
            now,
            EventKind::InspectionStarted {
                vessel: name,
                phase: InspectionPhase::Pre,
            },
        );
        self.stage = Stage::PreInspecting;
        Ok(Step::Sleep(pre_pcat))
    }

    fn start_cargo(&mut self, cx: &mut Context<'_, Terminal>) -> Result<Step, SimError> {
        let now = cx.now();
        let terminal = cx.world_mut();
        let name = terminal.vessel_name(self.vessel);
        terminal.emit(
            now,
            EventKind::InspectionFinished {
                vessel: name.clone(),
                phase: InspectionPhase::Pre,
            },
        );
        terminal.vessel_mut(self.vessel)?.state = VesselState::OperatingCargo;

        let requested = terminal
            .schedule
            .get(self.entry)
            .map(|entry| entry.cranes.clone())
            .unwrap_or_default();
        let mut assignments = Vec::with_capacity(requested.len());
        for crane_name in requested {
            match terminal.crane_by_name(&crane_name) {
                Some(crane) => assignments.push(crane),
                None => {
                    tracing::warn!(vessel = %name, crane = %crane_name, "unknown crane, assignment skipped");
                    terminal.emit(
                        now,
                        EventKind::UnknownCrane {
                            vessel: name.clone(),
                            crane: crane_name,
                        },
                    );
                }
            }
        }
        terminal.vessel_mut(self.vessel)?.pending_cranes += assignments.len();

        if assignments.is_empty() {
            return self.start_post_inspection(cx);
        }
        for crane in assignments {
            cx.spawn(CraneAssignment::new(self.vessel, crane))?;
        }
        self.stage = Stage::Working;
        Ok(Step::Passivate)
    }

    fn start_post_inspection(&mut self, cx: &mut Context<'_, Terminal>) -> Result<Step, SimError> {
        let now = cx.now();
        let terminal = cx.world_mut();
        let vessel = terminal.vessel_mut(self.vessel)?;
        vessel.state = VesselState::PostInspecting;
        let post_pcat = vessel.post_pcat;
        let name = vessel.name().to_owned();
        terminal.emit(
            now,
            EventKind::InspectionStarted {
                vessel: name,
                phase: InspectionPhase::Post,
            },
        );
        self.stage = Stage::PostInspecting;
        Ok(Step::Sleep(post_pcat))
    }

    fn depart(&mut self, cx: &mut Context<'_, Terminal>) -> Result<Step, SimError> {
        let now = cx.now();
        let grant = {
            let vessel = cx.world_mut().vessel_mut(self.vessel)?;
            vessel.berth_grant.take()
        };
        if let Some(grant) = grant {
            cx.release(grant)?;
        }

        let terminal = cx.world_mut();
        terminal.berth.occupied_by.retain(|&v| v != self.vessel);
        let berth_name = terminal.berth.name().to_owned();
        let vessel = terminal.vessel_mut(self.vessel)?;
        vessel.state = VesselState::Departed;
        vessel.departed_at = Some(now);
        let turnaround = now - vessel.arrived_at.unwrap_or(now);
        let name = vessel.name().to_owned();

        terminal.stats.add(Metric::TurnaroundTime, turnaround);
        terminal.emit(
            now,
            EventKind::InspectionFinished {
                vessel: name.clone(),
                phase: InspectionPhase::Post,
            },
        );
        terminal.emit(
            now,
            EventKind::BerthReleased {
                vessel: name.clone(),
                berth: berth_name,
            },
        );
        terminal.emit(now, EventKind::VesselDeparted { vessel: name });
        Ok(Step::Finish)
    }
}

impl Process<Terminal> for VesselProcess {
    fn label(&self) -> String {
        self.label.clone()
    }

    fn resume(&mut self, wake: Wake, cx: &mut Context<'_, Terminal>) -> Result<Step, SimError> {
        match (self.stage, wake) {
            (Stage::Start, Wake::Start) => self.begin(cx),
            (Stage::Arriving, Wake::Timeout) => self.arrive(cx),
            (Stage::Berthing, Wake::Granted(grant)) => self.moor(grant, cx),
            (Stage::PreInspecting, Wake::Timeout) => self.start_cargo(cx),
            (Stage::Working, Wake::Activated) => {
                if cx.world_mut().vessel_mut(self.vessel)?.cranes_done() {
                    self.start_post_inspection(cx)
                } else {
                    Ok(Step::Passivate)
                }
            }
            (Stage::PostInspecting, Wake::Timeout) => self.depart(cx),
            _ => Err(self.unexpected(wake)),
        }
    }
}
