use serde::Serialize;

use crate::problem::{Cost, DistanceOracle, PortIndex, Trade, Vessel};

/// The consumption incurred by a vessel serving a single trade, split by activity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostBreakdown {
    /// Consumption while loading at the origin
    pub loading: Cost,
    /// Consumption while unloading at the destination
    pub unloading: Cost,
    /// Consumption sailing empty from the prior location to the origin
    pub ballast: Cost,
    /// Consumption sailing loaded from the origin to the destination
    pub laden: Cost,
}

impl CostBreakdown {
    pub fn total(&self) -> Cost {
        self.loading + self.unloading + self.ballast + self.laden
    }
}

/// Estimates what it costs a vessel to serve a trade, given where the vessel is coming from.
#[derive(Debug, Clone, Copy)]
pub struct CostModel<D> {
    network: D,
}

impl<D: DistanceOracle> CostModel<D> {
    pub fn new(network: D) -> Self {
        Self { network }
    }

    pub fn breakdown(&self, vessel: &Vessel, trade: &Trade, prior: PortIndex) -> CostBreakdown {
        let speed = vessel.speed();

        let loading_time = vessel.loading_time(trade.cargo, trade.amount);
        let loading = vessel.loading_consumption(loading_time);
        // There is no separate unloading operation, so unloading mirrors loading.
        let unloading = vessel.loading_consumption(loading_time);

        let empty = vessel.travel_time(self.network.distance(prior, trade.origin));
        let ballast = vessel.ballast_consumption(empty, speed);

        let loaded = vessel.travel_time(self.network.distance(trade.origin, trade.destination));
        let laden = vessel.laden_consumption(loaded, speed);

        CostBreakdown {
            loading,
            unloading,
            ballast,
            laden,
        }
    }

    /// The total estimated cost of `vessel` serving `trade` after having been at `prior`
    pub fn estimate(&self, vessel: &Vessel, trade: &Trade, prior: PortIndex) -> Cost {
        self.breakdown(vessel, trade, prior).total()
    }
}
