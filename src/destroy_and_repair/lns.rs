use std::collections::{HashMap, HashSet};

use itertools::Itertools;
use log::{debug, info, trace};
use rand::{seq::index::sample, Rng};

use crate::{
    construction::GreedyInsertion,
    fleet::Fleet,
    problem::{Trade, TradeId},
    solution::{InvariantViolation, Schedule, ScheduleProposal},
    utils::EPSILON,
};

/// Large neighbourhood search over a proposal that already schedules every required trade.
///
/// Each iteration removes a few random trades and rebuilds the schedules from the fleet's committed
/// state, inserting the kept trades first and the removed ones last. A rebuilt proposal is only
/// adopted if it still schedules exactly the required trades and strictly lowers the total completion time.
#[derive(Debug, Clone, Copy)]
pub struct NeighborhoodRepair {
    /// The number of destroy and repair iterations
    pub iterations: usize,
    /// The number of trades removed in each iteration
    pub removal_count: usize,
}

impl NeighborhoodRepair {
    pub fn new(iterations: usize, removal_count: usize) -> Self {
        Self {
            iterations,
            removal_count,
        }
    }

    /// Refine `base`, which must schedule exactly the trades in `required`. Returns the best proposal
    /// found, or `base` itself if nothing improved on it.
    pub fn refine<S: Schedule, R: Rng>(
        &self,
        fleet: &Fleet<S>,
        required: &[Trade],
        base: ScheduleProposal<S>,
        rng: &mut R,
    ) -> Result<ScheduleProposal<S>, InvariantViolation> {
        let lookup: HashMap<TradeId, &Trade> = required.iter().map(|t| (t.id, t)).collect();
        let initial = base.total_completion_time();
        let mut best = base;
        let mut best_completion = initial;

        for iteration in 0..self.iterations {
            let current = best.scheduled();
            if current.is_empty() {
                break;
            }

            let amount = usize::min(self.removal_count, current.len());
            let removed = sample(rng, current.len(), amount).into_vec();
            let removed_set: HashSet<usize> = removed.iter().copied().collect();
            trace!(
                "Iteration {}: removing {}",
                iteration,
                removed.iter().map(|&i| current[i]).join(", ")
            );

            let order = (0..current.len())
                .filter(|i| !removed_set.contains(i))
                .chain(removed.iter().copied())
                .map(|i| {
                    lookup
                        .get(&current[i])
                        .copied()
                        .ok_or(InvariantViolation::UnknownTrade(current[i]))
                })
                .collect::<Result<Vec<_>, _>>()?;

            let candidate = GreedyInsertion.run(fleet, order)?;
            if !candidate.covers_exactly(required) {
                trace!("Iteration {}: repair dropped a trade", iteration);
                continue;
            }

            let completion = candidate.total_completion_time();
            if best_completion - completion > EPSILON {
                debug!(
                    "Iteration {}: total completion {} -> {}",
                    iteration, best_completion, completion
                );
                best = candidate;
                best_completion = completion;
            }
        }

        info!(
            "Neighbourhood repair: total completion {} -> {}",
            initial, best_completion
        );
        Ok(best)
    }
}
