use std::sync::Arc;

use log::debug;
use typed_index_collections::TiVec;

use crate::{
    problem::{Problem, Vessel, VesselIndex},
    solution::{InvariantViolation, ScheduleProposal, Voyage},
};

/// The vessels of a problem together with the schedule each of them is committed to.
#[derive(Debug, Clone)]
pub struct Fleet<S> {
    /// The problem the vessels belong to
    problem: Arc<Problem>,
    /// The committed schedule of each vessel
    schedules: TiVec<VesselIndex, S>,
}

impl<S> Fleet<S> {
    pub fn new(
        problem: Arc<Problem>,
        schedules: TiVec<VesselIndex, S>,
    ) -> Result<Self, InvariantViolation> {
        let expected = problem.vessels().len();
        if schedules.len() != expected {
            return Err(InvariantViolation::FleetSize {
                expected,
                actual: schedules.len(),
            });
        }

        Ok(Self { problem, schedules })
    }

    pub fn problem(&self) -> &Problem {
        &self.problem
    }

    pub fn vessels(&self) -> &TiVec<VesselIndex, Vessel> {
        self.problem.vessels()
    }

    pub fn schedules(&self) -> &TiVec<VesselIndex, S> {
        &self.schedules
    }

    /// Commit to the schedules of `proposal`, replacing the current ones.
    pub fn apply(&mut self, proposal: ScheduleProposal<S>) -> Result<(), InvariantViolation> {
        let schedules = proposal.into_schedules();
        if schedules.len() != self.schedules.len() {
            return Err(InvariantViolation::FleetSize {
                expected: self.schedules.len(),
                actual: schedules.len(),
            });
        }

        debug!("Committing new schedules for {} vessels", schedules.len());
        self.schedules = schedules;
        Ok(())
    }
}

impl Fleet<Voyage> {
    /// A fleet where no vessel has anything planned
    pub fn idle(problem: Arc<Problem>) -> Self {
        let schedules = problem
            .vessels()
            .iter_enumerated()
            .map(|(vessel, _)| Voyage::empty(problem.clone(), vessel))
            .collect();

        Self { problem, schedules }
    }
}
