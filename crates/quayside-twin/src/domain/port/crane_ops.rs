//! Crane assignment and hatch processing

use super::berth::CraneId;
use super::hatch::{HatchProfile, Operation};
use super::terminal::{PlacementFailurePolicy, Terminal};
use super::vessel::{VesselId, VesselState};
use crate::domain::error::SimError;
use crate::domain::kernel::{Context, Process, Step, Wake};
use crate::domain::resources::Grant;
use crate::domain::stats::Metric;
use crate::domain::tracing::EventKind;
use crate::domain::yard::{Container, CtInterface};

/// Waits for one named crane on behalf of a vessel
///
/// Once granted, the crane is bound to the vessel and a
/// [`HatchProcessing`] process takes over.
#[derive(Debug)]
pub struct CraneAssignment {
    vessel: VesselId,
    crane: CraneId,
    requested: bool,
}

impl CraneAssignment {
    /// Assignment of `crane` to `vessel`
    pub fn new(vessel: VesselId, crane: CraneId) -> Self {
        Self {
            vessel,
            crane,
            requested: false,
        }
    }
}

impl Process<Terminal> for CraneAssignment {
    fn label(&self) -> String {
        format!("assign:{}->{}", self.crane, self.vessel)
    }

    fn resume(&mut self, wake: Wake, cx: &mut Context<'_, Terminal>) -> Result<Step, SimError> {
        let now = cx.now();
        match (self.requested, wake) {
            (false, Wake::Start) => {
                let terminal = cx.world_mut();
                let resource = terminal.crane_mut(self.crane)?.resource();
                let event = EventKind::CraneRequested {
                    vessel: terminal.vessel_name(self.vessel),
                    crane: terminal.crane_name(self.crane),
                };
                terminal.emit(now, event);
                self.requested = true;
                Ok(Step::Acquire(resource))
            }
            (true, Wake::Granted(grant)) => {
                let terminal = cx.world_mut();
                terminal.crane_mut(self.crane)?.serving = Some(self.vessel);
                let vessel = terminal.vessel_mut(self.vessel)?;
                vessel.crane_grants.push((self.crane, grant));
                vessel.pending_cranes = vessel.pending_cranes.saturating_sub(1);
                let event = EventKind::CraneAcquired {
                    vessel: terminal.vessel_name(self.vessel),
                    crane: terminal.crane_name(self.crane),
                };
                terminal.emit(now, event);

                cx.spawn(HatchProcessing::new(self.vessel, self.crane, grant))?;
                Ok(Step::Finish)
            }
            _ => Err(SimError::UnexpectedWake {
                process: self.label(),
                wake,
            }),
        }
    }
}

/// The unit of work the crane is sleeping on
#[derive(Debug)]
enum Move {
    Discharge(Container),
    Load,
}

/// A crane working through a vessel's hatches
///
/// Hatches are taken most-recently-added first. Each row draws a
/// container count in its range; every unit is one timed move. When the
/// vessel has no hatch left the crane releases itself.
#[derive(Debug)]
pub struct HatchProcessing {
    vessel: VesselId,
    crane: CraneId,
    grant: Grant,
    hatch: Option<HatchProfile>,
    next_row: usize,
    remaining: u32,
    in_flight: Option<Move>,
}

impl HatchProcessing {
    /// Processing by `crane` (holding `grant`) for `vessel`
    pub fn new(vessel: VesselId, crane: CraneId, grant: Grant) -> Self {
        Self {
            vessel,
            crane,
            grant,
            hatch: None,
            next_row: 0,
            remaining: 0,
            in_flight: None,
        }
    }

    /// Finish the move the crane just slept on
    fn complete(&mut self, cx: &mut Context<'_, Terminal>) -> Result<(), SimError> {
        let now = cx.now();
        let terminal = cx.world_mut();
        match self.in_flight.take() {
            Some(Move::Discharge(container)) => {
                let id = container.id().to_string();
                let event = EventKind::ContainerDischarged {
                    vessel: terminal.vessel_name(self.vessel),
                    crane: terminal.crane_name(self.crane),
                    container: id.clone(),
                };
                terminal.emit(now, event);
                match terminal.yard.place(container) {
                    Ok(location) => terminal.emit(
                        now,
                        EventKind::ContainerStored {
                            container: id,
                            location,
                        },
                    ),
                    Err(rejected) => match terminal.placement_failure {
                        PlacementFailurePolicy::Skip => {
                            tracing::warn!(container = %id, error = %rejected.error, "no yard slot, container set aside");
                            terminal.emit(
                                now,
                                EventKind::PlacementFailed {
                                    container: id,
                                    reason: rejected.error.to_string(),
                                },
                            );
                            terminal.unplaced.push(rejected.container);
                        }
                        PlacementFailurePolicy::Abort => return Err(rejected.error.into()),
                    },
                }
            }
            Some(Move::Load) => {
                let event = EventKind::ContainerLoaded {
                    vessel: terminal.vessel_name(self.vessel),
                    crane: terminal.crane_name(self.crane),
                };
                terminal.emit(now, event);
            }
            None => {}
        }
        Ok(())
    }

    /// Pick the next unit of work, returning its duration, or `None` when
    /// the vessel has no hatch left
    fn next_move(&mut self, cx: &mut Context<'_, Terminal>) -> Result<Option<f64>, SimError> {
        let now = cx.now();
        let terminal = cx.world_mut();
        loop {
            let Some(hatch) = self.hatch.as_ref() else {
                match terminal.vessel_mut(self.vessel)?.take_hatch() {
                    Some(next) => {
                        self.hatch = Some(next);
                        self.next_row = 0;
                        self.remaining = 0;
                        continue;
                    }
                    None => return Ok(None),
                }
            };

            let row_index = match self.remaining {
                0 if self.next_row < hatch.rows().len() => {
                    let row = &hatch.rows()[self.next_row];
                    self.remaining = row.draw_count(&mut terminal.rng);
                    self.next_row += 1;
                    continue;
                }
                0 => {
                    if let Some(done) = self.hatch.take() {
                        let event = EventKind::HatchFinished {
                            vessel: terminal.vessel_name(self.vessel),
                            crane: terminal.crane_name(self.crane),
                            hatch: done.name().to_owned(),
                        };
                        terminal.vessel_mut(self.vessel)?.finish_hatch(done);
                        terminal.emit(now, event);
                    }
                    continue;
                }
                _ => self.next_row - 1,
            };
            self.remaining -= 1;

            let row = hatch.rows()[row_index].clone();
            let crane = terminal
                .cranes
                .get_mut(self.crane.0)
                .ok_or(SimError::UnknownCrane(self.crane))?;
            let duration = match row.operation {
                Operation::Discharge => {
                    let container = terminal
                        .factory
                        .create(row.container_type, row.container_size)
                        .with_route(CtInterface::Vessel, CtInterface::Yard);
                    let duration = crane.unloading_time.generate(&mut terminal.rng);
                    crane.stats.add(Metric::UnloadingTime, duration);
                    self.in_flight = Some(Move::Discharge(container));
                    duration
                }
                Operation::Load => {
                    let duration = crane.loading_time.generate(&mut terminal.rng);
                    crane.stats.add(Metric::LoadingTime, duration);
                    self.in_flight = Some(Move::Load);
                    duration
                }
            };
            return Ok(Some(duration.max(0.0)));
        }
    }

    /// Unbind the crane; the release that leaves the vessel without cranes
    /// wakes the vessel for post-inspection
    fn release_crane(&mut self, cx: &mut Context<'_, Terminal>) -> Result<(), SimError> {
        let now = cx.now();
        cx.release(self.grant)?;

        let terminal = cx.world_mut();
        terminal.crane_mut(self.crane)?.serving = None;
        let event = EventKind::CraneReleased {
            vessel: terminal.vessel_name(self.vessel),
            crane: terminal.crane_name(self.crane),
        };
        let vessel = terminal.vessel_mut(self.vessel)?;
        vessel.crane_grants.retain(|(crane, _)| *crane != self.crane);
        let wake_vessel = if vessel.cranes_done() {
            vessel.process
        } else {
            vessel.state = VesselState::AwaitingCraneRelease;
            None
        };
        terminal.emit(now, event);

        if let Some(pid) = wake_vessel {
            cx.activate(pid)?;
        }
        Ok(())
    }
}

impl Process<Terminal> for HatchProcessing {
    fn label(&self) -> String {
        format!("hatches:{}@{}", self.crane, self.vessel)
    }

    fn resume(&mut self, wake: Wake, cx: &mut Context<'_, Terminal>) -> Result<Step, SimError> {
        match wake {
            Wake::Start | Wake::Timeout => {}
            _ => {
                return Err(SimError::UnexpectedWake {
                    process: self.label(),
                    wake,
                })
            }
        }
        self.complete(cx)?;
        match self.next_move(cx)? {
            Some(duration) => Ok(Step::Sleep(duration)),
            None => {
                self.release_crane(cx)?;
                Ok(Step::Finish)
            }
        }
    }
}
