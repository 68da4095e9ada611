use float_ord::FloatOrd;
use log::{debug, trace};
use typed_index_collections::TiVec;

use crate::{
    cost::CostModel,
    fleet::Fleet,
    problem::{PortIndex, Trade, VesselIndex},
    solution::{InsertionError, InvariantViolation, Schedule, ScheduleProposal},
};

/// Inserts trades one at a time, in the order given, each at the position that lets the first vessel
/// able to carry it finish as early as possible. Trades that no vessel can carry are skipped.
///
/// The outcome only depends on the order of the trades and the committed schedules of the fleet.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyInsertion;

impl GreedyInsertion {
    /// The feasible schedule with the earliest completion time among all ways to insert `trade` into `schedule`.
    /// Ties are resolved in favour of the first candidate found.
    pub fn best_insertion<S: Schedule>(
        schedule: &S,
        trade: &Trade,
    ) -> Result<Option<S>, InsertionError> {
        let points = schedule.insertion_points();
        let mut best: Option<(FloatOrd<f64>, S)> = None;

        for (i, &pickup) in points.iter().enumerate() {
            for &dropoff in &points[i..] {
                let candidate = schedule.add_transportation(trade, pickup, dropoff)?;
                if !candidate.verify() {
                    continue;
                }

                let completion = FloatOrd(candidate.completion_time());
                if best.as_ref().map_or(true, |(b, _)| completion < *b) {
                    best = Some((completion, candidate));
                }
            }
        }

        Ok(best.map(|(_, schedule)| schedule))
    }

    /// Run a single insertion pass over `trades` on top of the committed schedules of `fleet`.
    pub fn run<'t, S, I>(
        &self,
        fleet: &Fleet<S>,
        trades: I,
    ) -> Result<ScheduleProposal<S>, InvariantViolation>
    where
        S: Schedule,
        I: IntoIterator<Item = &'t Trade>,
    {
        let problem = fleet.problem();
        let vessels = fleet.vessels();
        let costs = CostModel::new(problem);

        let mut proposal = ScheduleProposal::new(fleet.schedules().clone());
        // Where each vessel will be after the trades assigned to it so far in this pass
        let mut locations: TiVec<VesselIndex, PortIndex> =
            vessels.iter().map(|vessel| vessel.location()).collect();

        for trade in trades {
            let mut chosen = None;
            for (v, schedule) in proposal.schedules().iter_enumerated() {
                if let Some(candidate) = Self::best_insertion(schedule, trade)? {
                    chosen = Some((v, candidate));
                    break;
                }
            }

            match chosen {
                Some((v, schedule)) => {
                    let cost = costs.estimate(&vessels[v], trade, locations[v]);
                    trace!("Trade {} assigned to vessel {} at cost {}", trade.id, v, cost);
                    locations[v] = trade.destination;
                    proposal.assign(v, schedule, trade.id, cost);
                }
                None => debug!("No vessel can carry trade {}", trade.id),
            }
        }

        Ok(proposal)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        problem::{FuelCurve, Problem, TimeWindow, Vessel},
        solution::Voyage,
    };

    fn problem(vessels: Vec<Vessel>) -> Arc<Problem> {
        let distances = vec![
            vec![0.0, 10.0, 20.0],
            vec![10.0, 0.0, 10.0],
            vec![20.0, 10.0, 0.0],
        ];
        let ports = vec!["A".into(), "B".into(), "C".into()];
        Arc::new(Problem::new(ports, vessels, distances).unwrap())
    }

    fn vessel(name: &str, location: usize, capacity: f64) -> Vessel {
        Vessel::new(
            name,
            location.into(),
            1.0,
            capacity,
            10.0,
            1.0,
            FuelCurve::new(1.0, 1.0),
            FuelCurve::new(1.0, 1.0),
        )
    }

    fn trade(id: usize, origin: usize, destination: usize, amount: f64, end: f64) -> Trade {
        Trade::new(id, origin, destination, 0, amount, TimeWindow::new(0.0, end))
    }

    #[test]
    fn first_feasible_vessel_wins() {
        // The second vessel is already at the origin and would finish earlier, but the first one can also do it.
        let problem = problem(vec![vessel("far", 0, 100.0), vessel("near", 1, 100.0)]);
        let fleet = Fleet::idle(problem);
        let t = trade(0, 1, 2, 10.0, 1000.0);

        let proposal = GreedyInsertion.run(&fleet, [&t]).unwrap();
        assert_eq!(proposal.carrier(t.id), Some(VesselIndex::from(0)));
    }

    #[test]
    fn falls_through_to_next_vessel() {
        let problem = problem(vec![vessel("small", 0, 5.0), vessel("large", 0, 100.0)]);
        let fleet = Fleet::idle(problem);
        let t = trade(0, 1, 2, 10.0, 1000.0);

        let proposal = GreedyInsertion.run(&fleet, [&t]).unwrap();
        assert_eq!(proposal.carrier(t.id), Some(VesselIndex::from(1)));
    }

    #[test]
    fn infeasible_trade_is_skipped() {
        let problem = problem(vec![vessel("only", 0, 100.0)]);
        let fleet = Fleet::idle(problem);
        let ok = trade(0, 0, 1, 10.0, 1000.0);
        // Can not reach C in time.
        let late = trade(1, 0, 2, 10.0, 5.0);

        let trades = vec![ok.clone(), late.clone()];
        let proposal = GreedyInsertion.run(&fleet, &trades).unwrap();
        assert_eq!(proposal.scheduled(), &[ok.id]);
        assert_eq!(proposal.cost(late.id), None);
        assert!(proposal.validate(&trades).is_ok());
    }

    #[test]
    fn best_insertion_minimises_completion_time() {
        let problem = problem(vec![vessel("only", 0, 100.0)]);
        let base = Voyage::empty(problem.clone(), 0.into())
            .add_transportation(&trade(0, 0, 2, 10.0, 1000.0), 0, 0)
            .unwrap();
        // Carrying A -> B alongside A -> C is free in terms of sailing. Loading either trade first
        // finishes at the same time, and the first candidate found is kept.
        let t = trade(1, 0, 1, 10.0, 1000.0);

        let best = GreedyInsertion::best_insertion(&base, &t).unwrap().unwrap();
        let stops: Vec<_> = best.stops().iter().map(|s| usize::from(s.trade.id)).collect();
        assert_eq!(stops, vec![1, 0, 1, 0]);
        // Load 1 + load 1 + sail 10 + unload 1 + sail 10 + unload 1
        assert_eq!(best.completion_time(), 24.0);
    }

    #[test]
    fn later_trades_see_earlier_assignments() {
        let problem = problem(vec![vessel("only", 0, 100.0)]);
        let fleet = Fleet::idle(problem.clone());
        let first = trade(0, 0, 1, 10.0, 1000.0);
        let second = trade(1, 1, 2, 10.0, 1000.0);

        let proposal = GreedyInsertion.run(&fleet, [&first, &second]).unwrap();
        assert_eq!(proposal.scheduled(), &[first.id, second.id]);

        // The second trade is priced as if the vessel starts where the first one ends: no ballast leg.
        let model = CostModel::new(&*problem);
        let vessel = &problem.vessels()[VesselIndex::from(0)];
        assert_eq!(
            proposal.cost(second.id),
            Some(model.estimate(vessel, &second, first.destination))
        );
        assert_eq!(model.breakdown(vessel, &second, first.destination).ballast, 0.0);
    }
}
