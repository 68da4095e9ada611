use std::{fmt::Debug, sync::Arc};

use derive_more::Display;
use log::trace;
use serde::Serialize;

use crate::{
    problem::{DistanceOracle, PortIndex, Problem, Quantity, Time, Trade, TradeId, VesselIndex},
    utils::EPSILON,
};

use super::{InsertionError, Schedule};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Operation {
    Pickup,
    Dropoff,
}

/// A single operation in a voyage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stop {
    /// The trade served at this stop
    pub trade: Trade,
    /// Whether the cargo of `trade` is loaded or unloaded
    pub operation: Operation,
}

impl Stop {
    /// The port at which the stop takes place
    pub fn port(&self) -> PortIndex {
        match self.operation {
            Operation::Pickup => self.trade.origin,
            Operation::Dropoff => self.trade.destination,
        }
    }
}

/// The outcome of sailing to a stop and performing its operation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Call {
    pub port: PortIndex,
    /// When the vessel reaches the port
    pub arrival: Time,
    /// When (un)loading starts, which might be after `arrival` if the vessel has to wait for a time window
    pub start: Time,
    /// When (un)loading is finished
    pub departure: Time,
    /// The quantity on board when leaving the port
    pub load: Quantity,
}

/// The reason a voyage can not be sailed as planned.
#[derive(Debug, Display, Clone, PartialEq)]
pub enum Violation {
    #[display(fmt = "the vessel can not carry the cargo of trade {}", _0)]
    Incompatible(TradeId),
    #[display(fmt = "load {} exceeds capacity {} when picking up trade {}", load, capacity, trade)]
    Capacity {
        trade: TradeId,
        load: Quantity,
        capacity: Quantity,
    },
    #[display(fmt = "trade {} is delivered at {}, after its deadline {}", trade, finish, deadline)]
    Late {
        trade: TradeId,
        finish: Time,
        deadline: Time,
    },
    #[display(fmt = "trade {} is dropped off without having been picked up", _0)]
    Precedence(TradeId),
    #[display(fmt = "trade {} is never dropped off", _0)]
    Unfinished(TradeId),
}

impl std::error::Error for Violation {}

/// The reference `Schedule`: the planned stops of one vessel, simulated from the vessel's current
/// location and the time at which it becomes available.
#[derive(Clone)]
pub struct Voyage {
    /// The problem the vessel belongs to
    problem: Arc<Problem>,
    /// The vessel sailing this voyage
    vessel: VesselIndex,
    /// The planned stops, in the order they are visited
    stops: Vec<Stop>,
}

impl Debug for Voyage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Voyage")
            .field("vessel", &self.vessel)
            .field("stops", &self.stops)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Voyage {
    fn eq(&self, other: &Self) -> bool {
        self.vessel == other.vessel && self.stops == other.stops
    }
}

impl Voyage {
    /// A voyage without any stops
    pub fn empty(problem: Arc<Problem>, vessel: VesselIndex) -> Self {
        Self::new(problem, vessel, Vec::new())
    }

    pub fn new(problem: Arc<Problem>, vessel: VesselIndex, stops: Vec<Stop>) -> Self {
        Self {
            problem,
            vessel,
            stops,
        }
    }

    pub fn problem(&self) -> &Problem {
        &self.problem
    }

    pub fn vessel(&self) -> VesselIndex {
        self.vessel
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// Sail the voyage, returning the call made at each stop or the first violation encountered.
    pub fn timeline(&self) -> Result<Vec<Call>, Violation> {
        let problem = &self.problem;
        let vessel = &problem.vessels()[self.vessel];

        let mut port = vessel.location();
        let mut time = vessel.available_from();
        let mut load = 0.0;
        let mut onboard: Vec<TradeId> = Vec::new();
        let mut calls = Vec::with_capacity(self.stops.len());

        for stop in &self.stops {
            let trade = &stop.trade;
            if !vessel.carries(trade.cargo) {
                return Err(Violation::Incompatible(trade.id));
            }

            let arrival = time + vessel.travel_time(problem.distance(port, stop.port()));
            let duration = vessel.loading_time(trade.cargo, trade.amount);

            let start = match stop.operation {
                Operation::Pickup => {
                    if onboard.contains(&trade.id) {
                        return Err(Violation::Precedence(trade.id));
                    }

                    load += trade.amount;
                    if load > vessel.capacity() + EPSILON {
                        return Err(Violation::Capacity {
                            trade: trade.id,
                            load,
                            capacity: vessel.capacity(),
                        });
                    }

                    onboard.push(trade.id);
                    arrival.max(trade.window.start)
                }
                Operation::Dropoff => {
                    match onboard.iter().position(|&id| id == trade.id) {
                        Some(i) => {
                            onboard.swap_remove(i);
                        }
                        None => return Err(Violation::Precedence(trade.id)),
                    }

                    let finish = arrival + duration;
                    if finish > trade.window.end + EPSILON {
                        return Err(Violation::Late {
                            trade: trade.id,
                            finish,
                            deadline: trade.window.end,
                        });
                    }

                    load -= trade.amount;
                    arrival
                }
            };

            time = start + duration;
            port = stop.port();
            calls.push(Call {
                port,
                arrival,
                start,
                departure: time,
                load,
            });
        }

        match onboard.first() {
            Some(&id) => Err(Violation::Unfinished(id)),
            None => Ok(calls),
        }
    }
}

impl Schedule for Voyage {
    fn insertion_points(&self) -> Vec<usize> {
        (0..=self.stops.len()).collect()
    }

    fn add_transportation(
        &self,
        trade: &Trade,
        pickup: usize,
        dropoff: usize,
    ) -> Result<Self, InsertionError> {
        let len = self.stops.len();
        if dropoff > len {
            return Err(InsertionError::PositionOutOfBounds {
                position: dropoff,
                len,
            });
        }

        if pickup > dropoff {
            return Err(InsertionError::DropoffBeforePickup { pickup, dropoff });
        }

        if self.stops.iter().any(|stop| stop.trade.id == trade.id) {
            return Err(InsertionError::AlreadyScheduled(trade.id));
        }

        // Inserting the drop-off first keeps `pickup` valid, and shifts the drop-off to `dropoff + 1`.
        let mut stops = Vec::with_capacity(len + 2);
        stops.extend_from_slice(&self.stops);
        stops.insert(
            dropoff,
            Stop {
                trade: trade.clone(),
                operation: Operation::Dropoff,
            },
        );
        stops.insert(
            pickup,
            Stop {
                trade: trade.clone(),
                operation: Operation::Pickup,
            },
        );

        Ok(Self {
            problem: self.problem.clone(),
            vessel: self.vessel,
            stops,
        })
    }

    fn verify(&self) -> bool {
        match self.timeline() {
            Ok(_) => true,
            Err(violation) => {
                trace!("voyage of vessel {} rejected: {}", self.vessel, violation);
                false
            }
        }
    }

    /// The departure from the last stop. Infeasible voyages never complete.
    fn completion_time(&self) -> Time {
        match self.timeline() {
            Ok(calls) => calls.last().map_or_else(
                || self.problem.vessels()[self.vessel].available_from(),
                |call| call.departure,
            ),
            Err(_) => f64::INFINITY,
        }
    }

    fn trades(&self) -> Vec<TradeId> {
        self.stops
            .iter()
            .filter(|stop| stop.operation == Operation::Pickup)
            .map(|stop| stop.trade.id)
            .collect()
    }
}
