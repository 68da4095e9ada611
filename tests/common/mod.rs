#![allow(dead_code)]

use std::sync::Arc;

use rand::{rngs::StdRng, Rng, SeedableRng};
use tramp::problem::{FuelCurve, Problem, TimeWindow, Trade, Vessel};

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// A vessel sailing at unit speed with linear consumption curves
pub fn vessel(name: &str, location: usize, capacity: f64, loading_rate: f64) -> Vessel {
    Vessel::new(
        name,
        location.into(),
        1.0,
        capacity,
        loading_rate,
        1.0,
        FuelCurve::new(1.0, 1.0),
        FuelCurve::new(0.5, 1.0),
    )
}

pub fn trade(id: usize, origin: usize, destination: usize, amount: f64, start: f64, end: f64) -> Trade {
    Trade::new(id, origin, destination, 0, amount, TimeWindow::new(start, end))
}

/// Three ports, `A`, `B` and `C`, all 10 apart
pub fn triangle(vessels: Vec<Vessel>) -> Arc<Problem> {
    let distances = vec![
        vec![0.0, 10.0, 10.0],
        vec![10.0, 0.0, 10.0],
        vec![10.0, 10.0, 0.0],
    ];
    let ports = vec!["A".into(), "B".into(), "C".into()];
    Arc::new(Problem::new(ports, vessels, distances).unwrap())
}

/// Two vessels at `A`: a large one that can carry either of the two trades but not both, and a small
/// one that can only carry the first. Inserting the first trade before the second leaves the second
/// without a vessel, while the reverse order schedules both.
pub fn order_sensitive() -> (Arc<Problem>, Vec<Trade>) {
    let problem = triangle(vec![
        vessel("large", 0, 100.0, 100.0),
        vessel("small", 0, 50.0, 100.0),
    ]);
    let trades = vec![trade(0, 0, 1, 40.0, 0.0, 12.0), trade(1, 0, 2, 100.0, 0.0, 13.0)];
    (problem, trades)
}

/// Ports scattered on a grid, with vessels and trades drawn at random.
pub fn random_instance(
    rng: &mut StdRng,
    ports: usize,
    vessels: usize,
    trades: usize,
) -> (Arc<Problem>, Vec<Trade>) {
    let points: Vec<(f64, f64)> = (0..ports)
        .map(|_| (rng.gen_range(0..100) as f64, rng.gen_range(0..100) as f64))
        .collect();
    let distances: Vec<Vec<f64>> = points
        .iter()
        .map(|a| {
            points
                .iter()
                .map(|b| ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt().round())
                .collect()
        })
        .collect();

    let fleet: Vec<Vessel> = (0..vessels)
        .map(|v| {
            Vessel::new(
                format!("vessel-{}", v),
                rng.gen_range(0..ports).into(),
                rng.gen_range(1.0..3.0),
                rng.gen_range(50.0..150.0),
                10.0,
                1.0,
                FuelCurve::new(0.1, 2.0),
                FuelCurve::new(0.08, 2.0),
            )
        })
        .collect();

    let trades: Vec<Trade> = (0..trades)
        .map(|id| {
            let origin = rng.gen_range(0..ports);
            let destination = (origin + rng.gen_range(1..ports)) % ports;
            let start = rng.gen_range(0.0..50.0);
            let end = start + rng.gen_range(50.0..300.0);
            trade(id, origin, destination, rng.gen_range(10.0..80.0), start, end)
        })
        .collect();

    let names: Vec<String> = (0..ports).map(|p| format!("port-{}", p)).collect();
    let problem = Problem::new(names, fleet, distances).unwrap();
    (Arc::new(problem), trades)
}
