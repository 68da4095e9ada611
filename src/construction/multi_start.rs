use log::{debug, info};
use rand::{seq::SliceRandom, Rng};

use crate::{
    fleet::Fleet,
    problem::Trade,
    solution::{InvariantViolation, Schedule, ScheduleProposal, Score},
};

use super::GreedyInsertion;

/// Runs the greedy insertion pass over several random orderings of the trades and keeps the best proposal.
#[derive(Debug, Clone, Copy)]
pub struct MultiStart {
    /// The number of orderings to try for small trade sets
    pub max_starts: usize,
    /// Whether the trades in the order they were given are evaluated before the shuffled ones
    pub keep_given_order: bool,
}

impl MultiStart {
    pub fn new(max_starts: usize) -> Self {
        Self {
            max_starts,
            keep_given_order: false,
        }
    }

    /// The number of random orderings used for `n` trades. Larger trade sets get fewer orderings.
    pub fn shuffle_count(&self, n: usize) -> usize {
        match n {
            0..=10 => self.max_starts,
            11..=25 => usize::max(3, self.max_starts / 2),
            26..=50 => 2,
            _ => 1,
        }
    }

    /// Search with the number of orderings given by [`MultiStart::shuffle_count`].
    pub fn run<S: Schedule, R: Rng>(
        &self,
        fleet: &Fleet<S>,
        trades: &[Trade],
        rng: &mut R,
    ) -> Result<ScheduleProposal<S>, InvariantViolation> {
        let starts = self.shuffle_count(trades.len());
        self.run_starts(fleet, trades, starts, rng)
    }

    /// Search with exactly `starts` random orderings (at least one). The orderings are drawn one after
    /// another from `rng`, so for a given seed the first `k` orderings do not depend on `starts`.
    pub fn run_starts<S: Schedule, R: Rng>(
        &self,
        fleet: &Fleet<S>,
        trades: &[Trade],
        starts: usize,
        rng: &mut R,
    ) -> Result<ScheduleProposal<S>, InvariantViolation> {
        let mut order: Vec<&Trade> = trades.iter().collect();
        let mut best: Option<(Score, ScheduleProposal<S>)> = None;

        let mut consider = |proposal: ScheduleProposal<S>, start: usize| {
            let score = proposal.score();
            debug!("Start {}: {}", start, score);
            if best.as_ref().map_or(true, |(b, _)| score < *b) {
                best = Some((score, proposal));
            }
        };

        if self.keep_given_order {
            consider(GreedyInsertion.run(fleet, order.iter().copied())?, 0);
        }

        for start in 1..=starts.max(1) {
            order.shuffle(rng);
            consider(GreedyInsertion.run(fleet, order.iter().copied())?, start);
        }

        match best {
            Some((score, proposal)) => {
                info!("Best of {} starts over {} trades: {}", starts.max(1), trades.len(), score);
                Ok(proposal)
            }
            None => Ok(ScheduleProposal::new(fleet.schedules().clone())),
        }
    }
}
