use derive_more::{Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use typed_index_collections::TiVec;

/// The type used for cargo quantity
pub type Quantity = f64;
/// The type used for distance
pub type Distance = f64;
/// The type used for cost (fuel consumed).
pub type Cost = f64;
/// The type used for time
pub type Time = f64;

#[derive(
    Deref, Debug, Display, PartialEq, Eq, PartialOrd, Ord, From, Into, Clone, Copy, Hash, Serialize, Deserialize,
)]
pub struct PortIndex(usize);

#[derive(
    Deref, Debug, Display, PartialEq, Eq, PartialOrd, Ord, From, Into, Clone, Copy, Hash, Serialize, Deserialize,
)]
pub struct VesselIndex(usize);

#[derive(
    Deref, Debug, Display, PartialEq, Eq, PartialOrd, Ord, From, Into, Clone, Copy, Hash, Serialize, Deserialize,
)]
pub struct TradeId(usize);

#[derive(
    Deref, Debug, Display, PartialEq, Eq, PartialOrd, Ord, From, Into, Clone, Copy, Hash, Serialize, Deserialize,
)]
pub struct CargoType(usize);

/// Something that knows the sailing distance between two ports. The distance is not assumed to be symmetric.
pub trait DistanceOracle {
    fn distance(&self, from: PortIndex, to: PortIndex) -> Distance;
}

impl<D: DistanceOracle + ?Sized> DistanceOracle for &D {
    fn distance(&self, from: PortIndex, to: PortIndex) -> Distance {
        D::distance(self, from, to)
    }
}

/// The interval in which a trade must be served. Cargo can not be picked up before `start`,
/// and must be delivered no later than `end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: Time,
    pub end: Time,
}

impl TimeWindow {
    pub fn new(start: Time, end: Time) -> Self {
        Self { start, end }
    }
}

/// A request to transport `amount` of `cargo` from `origin` to `destination` within `window`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Identifies the trade. Unique among the trades of a single scheduling call.
    pub id: TradeId,
    /// The port where the cargo is picked up.
    pub origin: PortIndex,
    /// The port where the cargo is dropped off.
    pub destination: PortIndex,
    /// The kind of cargo.
    pub cargo: CargoType,
    /// The quantity to be transported.
    pub amount: Quantity,
    /// When the trade must be served.
    pub window: TimeWindow,
}

impl Trade {
    pub fn new(
        id: usize,
        origin: usize,
        destination: usize,
        cargo: usize,
        amount: Quantity,
        window: TimeWindow,
    ) -> Self {
        Self {
            id: TradeId(id),
            origin: PortIndex(origin),
            destination: PortIndex(destination),
            cargo: CargoType(cargo),
            amount,
            window,
        }
    }
}

/// Fuel consumption per time unit at a given speed, modelled as `coefficient * speed^exponent`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuelCurve {
    pub coefficient: f64,
    pub exponent: f64,
}

impl FuelCurve {
    pub fn new(coefficient: f64, exponent: f64) -> Self {
        Self {
            coefficient,
            exponent,
        }
    }

    /// Consumption per time unit when sailing at `speed`
    pub fn rate(&self, speed: f64) -> f64 {
        self.coefficient * speed.powf(self.exponent)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vessel {
    /// The name of the vessel
    name: String,
    /// The port where the vessel is currently located
    location: PortIndex,
    /// The cruising speed of this vessel, in distance units per time unit
    speed: f64,
    /// The maximum quantity the vessel can carry at once
    capacity: Quantity,
    /// The quantity (un)loaded per time unit
    loading_rate: f64,
    /// The cargo types this vessel can carry. An empty list means that everything is accepted.
    #[serde(default)]
    cargo_types: Vec<CargoType>,
    /// The time from which the vessel becomes available
    #[serde(default)]
    available_from: Time,
    /// Consumption per time unit while (un)loading in port
    port_consumption: f64,
    /// Consumption curve when travelling with a load
    laden: FuelCurve,
    /// Consumption curve when travelling without a load
    ballast: FuelCurve,
}

impl Vessel {
    pub fn new(
        name: impl Into<String>,
        location: PortIndex,
        speed: f64,
        capacity: Quantity,
        loading_rate: f64,
        port_consumption: f64,
        laden: FuelCurve,
        ballast: FuelCurve,
    ) -> Self {
        Self {
            name: name.into(),
            location,
            speed,
            capacity,
            loading_rate,
            cargo_types: Vec::new(),
            available_from: 0.0,
            port_consumption,
            laden,
            ballast,
        }
    }

    /// Restrict the vessel to the given cargo types
    pub fn with_cargo_types(mut self, cargo_types: Vec<CargoType>) -> Self {
        self.cargo_types = cargo_types;
        self
    }

    /// Delay the time at which the vessel becomes available
    pub fn with_available_from(mut self, time: Time) -> Self {
        self.available_from = time;
        self
    }

    /// The name of the vessel
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
    /// The port where the vessel is currently located
    pub fn location(&self) -> PortIndex {
        self.location
    }
    /// The cruising speed of this vessel, in distance units per time unit
    pub fn speed(&self) -> f64 {
        self.speed
    }
    /// The maximum quantity the vessel can carry at once
    pub fn capacity(&self) -> Quantity {
        self.capacity
    }
    /// The time from which the vessel becomes available
    pub fn available_from(&self) -> Time {
        self.available_from
    }

    /// Whether the vessel is able to carry `cargo` at all
    pub fn carries(&self, cargo: CargoType) -> bool {
        self.cargo_types.is_empty() || self.cargo_types.contains(&cargo)
    }

    /// The time it takes to load (or unload) `amount` of `cargo`
    pub fn loading_time(&self, _cargo: CargoType, amount: Quantity) -> Time {
        amount / self.loading_rate
    }

    /// Consumption while (un)loading for `duration`
    pub fn loading_consumption(&self, duration: Time) -> Cost {
        duration * self.port_consumption
    }

    /// The time it takes to sail `distance` at cruising speed
    pub fn travel_time(&self, distance: Distance) -> Time {
        distance / self.speed
    }

    /// Consumption when sailing loaded for `duration` at `speed`
    pub fn laden_consumption(&self, duration: Time, speed: f64) -> Cost {
        duration * self.laden.rate(speed)
    }

    /// Consumption when sailing empty for `duration` at `speed`
    pub fn ballast_consumption(&self, duration: Time, speed: f64) -> Cost {
        duration * self.ballast.rate(speed)
    }
}

/// The static part of a scheduling problem: the port network and the fleet.
#[derive(Debug, Clone)]
pub struct Problem {
    /// The names of the ports, indexed by `PortIndex`.
    ports: Vec<String>,
    /// The vessels available. The order of this list is the fixed fleet order.
    vessels: TiVec<VesselIndex, Vessel>,
    /// A distance matrix between the ports.
    distances: Vec<Vec<Distance>>,
}

#[derive(Debug, Display)]
pub enum ProblemConstructionError {
    /// There must be at least one port
    NoPorts,
    /// The size of the distance matrix is not as expected
    #[display(fmt = "distance matrix is {:?}, expected {:?}", actual, expected)]
    DistanceSizeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },
    /// Distances must be non-negative numbers
    #[display(fmt = "invalid distance {} from port {} to port {}", distance, from, to)]
    InvalidDistance {
        from: usize,
        to: usize,
        distance: Distance,
    },
    /// Speed of vessel is not strictly positive.
    #[display(fmt = "vessel {} has non-positive speed", vessel)]
    SpeedIsZero { vessel: String },
    /// Loading rate of vessel is not strictly positive.
    #[display(fmt = "vessel {} has non-positive loading rate", vessel)]
    LoadingRateIsZero { vessel: String },
    /// Capacity of vessel is not strictly positive.
    #[display(fmt = "vessel {} has non-positive capacity", vessel)]
    NoCapacity { vessel: String },
    /// Location is not a valid port index
    #[display(fmt = "vessel {} is located at unknown port {}", vessel, port)]
    OriginDoesNotExist { vessel: String, port: PortIndex },
}

impl std::error::Error for ProblemConstructionError {}

/// Ways in which a trade can be inconsistent with the problem it is scheduled in.
#[derive(Debug, Display, Clone, PartialEq)]
pub enum InvalidTrade {
    #[display(fmt = "trade {} refers to unknown port {}", trade, port)]
    UnknownPort { trade: TradeId, port: PortIndex },
    #[display(fmt = "trade {} has an empty time window", trade)]
    EmptyWindow { trade: TradeId },
    #[display(fmt = "trade {} has a non-positive amount", trade)]
    NoCargo { trade: TradeId },
}

impl std::error::Error for InvalidTrade {}

impl Problem {
    pub fn new(
        ports: Vec<String>,
        vessels: Vec<Vessel>,
        distances: Vec<Vec<Distance>>,
    ) -> Result<Problem, ProblemConstructionError> {
        use ProblemConstructionError::*;
        let n = ports.len();
        if n == 0 {
            return Err(NoPorts);
        }

        let columns = distances.iter().map(|row| row.len()).find(|&len| len != n);
        if distances.len() != n || columns.is_some() {
            return Err(DistanceSizeMismatch {
                expected: (n, n),
                actual: (distances.len(), columns.unwrap_or(n)),
            });
        }

        for (from, row) in distances.iter().enumerate() {
            for (to, &distance) in row.iter().enumerate() {
                if !(distance >= 0.0 && distance.is_finite()) {
                    return Err(InvalidDistance { from, to, distance });
                }
            }
        }

        for vessel in &vessels {
            let name = || vessel.name.clone();
            if !(vessel.speed > 0.0) {
                return Err(SpeedIsZero { vessel: name() });
            }
            if !(vessel.loading_rate > 0.0) {
                return Err(LoadingRateIsZero { vessel: name() });
            }
            if !(vessel.capacity > 0.0) {
                return Err(NoCapacity { vessel: name() });
            }
            if *vessel.location >= n {
                return Err(OriginDoesNotExist {
                    vessel: name(),
                    port: vessel.location,
                });
            }
        }

        Ok(Self {
            ports,
            vessels: vessels.into(),
            distances,
        })
    }

    /// The vessels available for use in the problem, in fleet order
    pub fn vessels(&self) -> &TiVec<VesselIndex, Vessel> {
        &self.vessels
    }

    /// The names of the ports
    pub fn ports(&self) -> &[String] {
        &self.ports
    }

    /// The name of a port
    pub fn port_name(&self, port: PortIndex) -> &str {
        self.ports[*port].as_str()
    }

    /// Check that `trade` only refers to ports of this problem and is servable at all.
    pub fn check_trade(&self, trade: &Trade) -> Result<(), InvalidTrade> {
        for port in [trade.origin, trade.destination] {
            if *port >= self.ports.len() {
                return Err(InvalidTrade::UnknownPort {
                    trade: trade.id,
                    port,
                });
            }
        }

        if !(trade.window.end >= trade.window.start) {
            return Err(InvalidTrade::EmptyWindow { trade: trade.id });
        }

        if !(trade.amount > 0.0) {
            return Err(InvalidTrade::NoCargo { trade: trade.id });
        }

        Ok(())
    }
}

impl DistanceOracle for Problem {
    fn distance(&self, from: PortIndex, to: PortIndex) -> Distance {
        self.distances[*from][*to]
    }
}
