use derive_more::Display;
use log::{info, warn};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{
    construction::{GreedyInsertion, MultiStart},
    destroy_and_repair::NeighborhoodRepair,
    fleet::Fleet,
    problem::{Problem, Trade, TradeId},
    solution::{check_unique, InvariantViolation, Schedule, ScheduleProposal},
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Configuration determining how hard the scheduler searches.
pub struct Config {
    /// The maximum number of random orderings tried when estimating
    pub max_starts: usize,
    /// The number of destroy and repair iterations used to refine a commitment
    pub lns_iterations: usize,
    /// The number of trades removed in each destroy and repair iteration
    pub removal_count: usize,
    /// Seed of the random number generator. Seeded from entropy if absent.
    pub seed: Option<u64>,
    /// Whether the given order of the trades is evaluated in addition to the random orderings
    pub keep_given_order: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_starts: 5,
            lns_iterations: 20,
            removal_count: 2,
            seed: Some(42),
            keep_given_order: false,
        }
    }
}

/// The steps a scheduling call goes through.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Idle,
    Estimating,
    CommittingBase,
    CommittingFallback,
    Refining,
    Done,
    Failed,
}

/// Whether every won trade made it into the committed schedules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Outcome {
    Done,
    /// Some of the won trades could not be scheduled in either order
    Failed { unscheduled: Vec<TradeId> },
}

/// The result of estimating a set of trades up for auction. Never applied to the fleet.
#[derive(Debug, Clone)]
pub struct Estimate<S> {
    pub proposal: ScheduleProposal<S>,
    /// The phases traversed, in order
    pub phases: Vec<Phase>,
}

/// The result of committing to a set of won trades.
#[derive(Debug, Clone)]
pub struct Commitment<S> {
    /// The schedules the fleet should commit to
    pub proposal: ScheduleProposal<S>,
    pub outcome: Outcome,
    /// The phases traversed, in order
    pub phases: Vec<Phase>,
}

impl<S> Commitment<S> {
    pub fn is_done(&self) -> bool {
        self.outcome == Outcome::Done
    }
}

/// Builds schedules for a fleet in two situations: when pricing a set of trades that are up for
/// auction, and when committing to the trades that were actually won.
pub struct Scheduler<R> {
    config: Config,
    rng: R,
}

impl Scheduler<StdRng> {
    /// A scheduler whose random number generator is seeded as described by `config`.
    pub fn from_config(config: Config) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(config, rng)
    }
}

impl<R: Rng> Scheduler<R> {
    pub fn new(config: Config, rng: R) -> Self {
        Self { config, rng }
    }

    fn multi_start(&self) -> MultiStart {
        MultiStart {
            max_starts: self.config.max_starts,
            keep_given_order: self.config.keep_given_order,
        }
    }

    /// Estimate schedules (and thereby costs) for `trades` on top of the committed schedules of
    /// `fleet`. The fleet is left untouched.
    pub fn estimate<S: Schedule>(
        &mut self,
        fleet: &Fleet<S>,
        trades: &[Trade],
    ) -> Result<Estimate<S>, InvariantViolation> {
        check_input(fleet.problem(), trades)?;
        info!("Estimating {} trades", trades.len());

        let proposal = self.multi_start().run(fleet, trades, &mut self.rng)?;
        proposal.validate(trades)?;

        info!(
            "Estimated {} of {} trades at total cost {}",
            proposal.scheduled().len(),
            trades.len(),
            proposal.total_cost()
        );
        Ok(Estimate {
            proposal,
            phases: vec![Phase::Idle, Phase::Estimating, Phase::Done],
        })
    }

    /// Build the schedules that carry every trade in `won` on top of the committed schedules of `fleet`.
    ///
    /// The trades are first inserted in the order given, then in reverse order if that falls short.
    /// A proposal carrying all of them is refined by neighbourhood repair. If neither order carries all of
    /// them, the better of the two partial proposals is returned with the outcome `Failed`.
    pub fn commit<S: Schedule>(
        &mut self,
        fleet: &Fleet<S>,
        won: &[Trade],
    ) -> Result<Commitment<S>, InvariantViolation> {
        check_input(fleet.problem(), won)?;
        let mut phases = vec![Phase::Idle, Phase::CommittingBase];

        let base = GreedyInsertion.run(fleet, won)?;
        base.validate(won)?;

        let full = if base.covers_exactly(won) {
            base
        } else {
            phases.push(Phase::CommittingFallback);
            info!(
                "Forward order scheduled {} of {} won trades, trying reverse order",
                base.scheduled().len(),
                won.len()
            );

            let fallback = GreedyInsertion.run(fleet, won.iter().rev())?;
            fallback.validate(won)?;

            if fallback.covers_exactly(won) {
                fallback
            } else {
                phases.push(Phase::Failed);
                let proposal = if fallback.score() < base.score() {
                    fallback
                } else {
                    base
                };
                let unscheduled = proposal.unscheduled(won);
                warn!(
                    "Unable to schedule {} of {} won trades: {:?}",
                    unscheduled.len(),
                    won.len(),
                    unscheduled
                );

                return Ok(Commitment {
                    proposal,
                    outcome: Outcome::Failed { unscheduled },
                    phases,
                });
            }
        };

        phases.push(Phase::Refining);
        let repair = NeighborhoodRepair::new(self.config.lns_iterations, self.config.removal_count);
        let proposal = repair.refine(fleet, won, full, &mut self.rng)?;
        proposal.validate(won)?;
        phases.push(Phase::Done);

        Ok(Commitment {
            proposal,
            outcome: Outcome::Done,
            phases,
        })
    }
}

/// Trades must have distinct ids and only refer to ports of `problem`.
fn check_input(problem: &Problem, trades: &[Trade]) -> Result<(), InvariantViolation> {
    check_unique(trades)?;
    for trade in trades {
        problem.check_trade(trade)?;
    }
    Ok(())
}
