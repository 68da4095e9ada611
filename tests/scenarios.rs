mod common;

use tramp::{
    construction::{GreedyInsertion, MultiStart},
    cost::CostModel,
    destroy_and_repair::NeighborhoodRepair,
    problem::{TradeId, VesselIndex},
    scheduler::{Config, Outcome, Phase, Scheduler},
    solution::Schedule,
    Fleet,
};

use common::*;

#[test]
fn one_vessel_two_compatible_trades() {
    let problem = triangle(vec![vessel("only", 0, 100.0, 10.0)]);
    let fleet = Fleet::idle(problem.clone());
    let trades = vec![trade(0, 0, 1, 20.0, 0.0, 100.0), trade(1, 1, 2, 30.0, 0.0, 100.0)];

    let proposal = GreedyInsertion.run(&fleet, &trades).unwrap();
    assert_eq!(proposal.scheduled(), &[TradeId::from(0), TradeId::from(1)]);
    assert_eq!(proposal.validate(&trades), Ok(()));

    // The second trade is priced from where the first one ends
    let model = CostModel::new(&*problem);
    let vessel = &problem.vessels()[VesselIndex::from(0)];
    let expected = model.estimate(vessel, &trades[0], vessel.location())
        + model.estimate(vessel, &trades[1], trades[0].destination);
    assert!((proposal.total_cost() - expected).abs() < 1e-9);
}

#[test]
fn forward_order_drops_a_trade() {
    let (problem, trades) = order_sensitive();
    let fleet = Fleet::idle(problem);

    let forward = GreedyInsertion.run(&fleet, &trades).unwrap();
    assert_eq!(forward.scheduled(), &[TradeId::from(0)]);

    let reverse = GreedyInsertion.run(&fleet, trades.iter().rev()).unwrap();
    assert_eq!(reverse.scheduled(), &[TradeId::from(1), TradeId::from(0)]);
    assert_eq!(reverse.carrier(1.into()), Some(VesselIndex::from(0)));
    assert_eq!(reverse.carrier(0.into()), Some(VesselIndex::from(1)));
}

#[test]
fn multi_start_finds_the_order_that_schedules_both() {
    let (problem, trades) = order_sensitive();
    let fleet = Fleet::idle(problem);

    let proposal = MultiStart::new(16)
        .run(&fleet, &trades, &mut rng(11))
        .unwrap();
    assert!(proposal.covers_exactly(&trades));
    assert_eq!(proposal.validate(&trades), Ok(()));
}

#[test]
fn multi_start_can_start_from_the_given_order() {
    let (problem, mut trades) = order_sensitive();
    trades.reverse();
    let fleet = Fleet::idle(problem);

    let search = MultiStart {
        max_starts: 1,
        keep_given_order: true,
    };
    let proposal = search.run(&fleet, &trades, &mut rng(11)).unwrap();
    assert!(proposal.covers_exactly(&trades));
}

#[test]
fn neighborhood_repair_keeps_an_optimal_commitment() {
    // With room for one cargo at a time, alternating between A and B without empty legs is optimal
    let problem = triangle(vec![vessel("only", 0, 10.0, 10.0)]);
    let fleet = Fleet::idle(problem);
    let trades = vec![
        trade(0, 0, 1, 10.0, 0.0, 100.0),
        trade(1, 1, 0, 10.0, 0.0, 100.0),
        trade(2, 0, 1, 10.0, 0.0, 100.0),
    ];

    let base = GreedyInsertion.run(&fleet, &trades).unwrap();
    assert!(base.covers_exactly(&trades));
    assert_eq!(base.total_completion_time(), 36.0);

    let refined = NeighborhoodRepair::new(50, 2)
        .refine(&fleet, &trades, base.clone(), &mut rng(3))
        .unwrap();
    assert_eq!(refined, base);
}

#[test]
fn fallback_order_completes_the_commitment() {
    let (problem, trades) = order_sensitive();
    let fleet = Fleet::idle(problem);

    let mut scheduler = Scheduler::new(Config::default(), rng(1));
    let commitment = scheduler.commit(&fleet, &trades).unwrap();

    assert_eq!(commitment.outcome, Outcome::Done);
    assert_eq!(
        commitment.phases,
        vec![
            Phase::Idle,
            Phase::CommittingBase,
            Phase::CommittingFallback,
            Phase::Refining,
            Phase::Done
        ]
    );
    assert!(commitment.proposal.covers_exactly(&trades));
    assert_eq!(commitment.proposal.carrier(1.into()), Some(VesselIndex::from(0)));
}

#[test]
fn commitments_build_on_each_other() {
    let problem = triangle(vec![vessel("only", 0, 100.0, 10.0)]);
    let mut fleet = Fleet::idle(problem);
    let mut scheduler = Scheduler::new(Config::default(), rng(2));

    let first = vec![trade(0, 0, 1, 10.0, 0.0, 100.0)];
    let commitment = scheduler.commit(&fleet, &first).unwrap();
    assert!(commitment.is_done());
    fleet.apply(commitment.proposal).unwrap();

    // The next trade is scheduled after the one already committed to
    let second = vec![trade(1, 1, 2, 10.0, 0.0, 100.0)];
    let commitment = scheduler.commit(&fleet, &second).unwrap();
    assert!(commitment.is_done());
    assert_eq!(commitment.proposal.scheduled(), &[TradeId::from(1)]);

    let voyage = &commitment.proposal.schedules()[VesselIndex::from(0)];
    assert_eq!(voyage.trades(), vec![TradeId::from(0), TradeId::from(1)]);
    // Load at A, sail to B, then both unloading and loading at B before sailing on to C
    assert_eq!(voyage.completion_time(), 24.0);
}

#[test]
fn neighborhood_repair_rejects_faster_repairs_that_drop_a_trade() {
    let (problem, trades) = order_sensitive();
    let fleet = Fleet::idle(problem);

    let base = GreedyInsertion.run(&fleet, trades.iter().rev()).unwrap();
    assert!(base.covers_exactly(&trades));

    // Repairing in the forward order finishes earlier, but leaves the second trade behind
    let forward = GreedyInsertion.run(&fleet, &trades).unwrap();
    assert!(forward.total_completion_time() < base.total_completion_time());
    assert!(!forward.covers_exactly(&trades));

    for seed in 0..5 {
        let refined = NeighborhoodRepair::new(20, 2)
            .refine(&fleet, &trades, base.clone(), &mut rng(seed))
            .unwrap();
        assert!(refined.covers_exactly(&trades));
        assert_eq!(refined, base);
    }
}
