use std::{
    cmp::Ordering,
    collections::{BTreeMap, BTreeSet, HashMap, HashSet},
};

use derive_more::Display;
use float_ord::FloatOrd;
use typed_index_collections::TiVec;

use crate::problem::{Cost, InvalidTrade, Time, Trade, TradeId, VesselIndex};

use super::{InsertionError, Schedule};

/// A broken contract between the scheduler and its collaborators. These are bugs, not outcomes,
/// and are never patched up or retried.
#[derive(Debug, Display, Clone, PartialEq)]
pub enum InvariantViolation {
    #[display(fmt = "trade {} appears more than once in the input", _0)]
    DuplicateTrade(TradeId),
    #[display(fmt = "scheduled trade {} is not part of the input", _0)]
    UnknownTrade(TradeId),
    #[display(fmt = "trade {} is listed as scheduled more than once", _0)]
    ScheduledTwice(TradeId),
    #[display(fmt = "trade {} is carried by {} schedules", trade, count)]
    Carriers { trade: TradeId, count: usize },
    #[display(fmt = "trade {} is recorded on vessel {:?}, but carried by vessel {}", trade, recorded, actual)]
    WrongCarrier {
        trade: TradeId,
        recorded: Option<VesselIndex>,
        actual: VesselIndex,
    },
    #[display(fmt = "scheduled trade {} has no cost", _0)]
    MissingCost(TradeId),
    #[display(fmt = "trade {} has a cost or carrier but is not scheduled", _0)]
    Stray(TradeId),
    #[display(fmt = "expected {} schedules, got {}", expected, actual)]
    FleetSize { expected: usize, actual: usize },
    #[display(fmt = "insertion failed: {}", _0)]
    Insertion(InsertionError),
    #[display(fmt = "{}", _0)]
    InvalidTrade(InvalidTrade),
}

impl std::error::Error for InvariantViolation {}

impl From<InsertionError> for InvariantViolation {
    fn from(error: InsertionError) -> Self {
        InvariantViolation::Insertion(error)
    }
}

impl From<InvalidTrade> for InvariantViolation {
    fn from(error: InvalidTrade) -> Self {
        InvariantViolation::InvalidTrade(error)
    }
}

/// Fail if any trade id occurs more than once in `trades`
pub fn check_unique(trades: &[Trade]) -> Result<(), InvariantViolation> {
    let mut seen = HashSet::with_capacity(trades.len());
    match trades.iter().find(|trade| !seen.insert(trade.id)) {
        Some(trade) => Err(InvariantViolation::DuplicateTrade(trade.id)),
        None => Ok(()),
    }
}

/// How good a proposal is. Scheduling more trades always wins; among proposals scheduling equally
/// many trades, the lower total completion time wins. Smaller is better.
#[derive(Debug, Display, Clone, Copy)]
#[display(fmt = "{} scheduled, total completion {}", scheduled, completion)]
pub struct Score {
    pub scheduled: usize,
    pub completion: Time,
}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .scheduled
            .cmp(&self.scheduled)
            .then_with(|| FloatOrd(self.completion).cmp(&FloatOrd(other.completion)))
    }
}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Score {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Score {}

/// The result of a scheduling call: a schedule for every vessel, the trades that made it into
/// those schedules (in the order they were inserted), and an estimated cost for each of them.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleProposal<S> {
    /// One schedule per vessel, in fleet order
    schedules: TiVec<VesselIndex, S>,
    /// The trades that were scheduled, in insertion order
    scheduled: Vec<TradeId>,
    /// Estimated cost of each scheduled trade
    costs: BTreeMap<TradeId, Cost>,
    /// The vessel carrying each scheduled trade
    carriers: BTreeMap<TradeId, VesselIndex>,
}

impl<S> ScheduleProposal<S> {
    /// A proposal that schedules nothing on top of `schedules`
    pub fn new(schedules: TiVec<VesselIndex, S>) -> Self {
        Self {
            schedules,
            scheduled: Vec::new(),
            costs: BTreeMap::new(),
            carriers: BTreeMap::new(),
        }
    }

    /// Replace the schedule of `vessel`, which now carries `trade` at the given `cost`.
    pub(crate) fn assign(&mut self, vessel: VesselIndex, schedule: S, trade: TradeId, cost: Cost) {
        self.schedules[vessel] = schedule;
        self.scheduled.push(trade);
        self.costs.insert(trade, cost);
        self.carriers.insert(trade, vessel);
    }

    pub fn schedules(&self) -> &TiVec<VesselIndex, S> {
        &self.schedules
    }

    pub fn into_schedules(self) -> TiVec<VesselIndex, S> {
        self.schedules
    }

    /// The trades that were scheduled, in insertion order
    pub fn scheduled(&self) -> &[TradeId] {
        &self.scheduled
    }

    pub fn is_scheduled(&self, trade: TradeId) -> bool {
        self.carriers.contains_key(&trade)
    }

    pub fn scheduled_set(&self) -> BTreeSet<TradeId> {
        self.scheduled.iter().copied().collect()
    }

    /// Whether exactly the trades in `required` are scheduled
    pub fn covers_exactly(&self, required: &[Trade]) -> bool {
        let required: BTreeSet<TradeId> = required.iter().map(|trade| trade.id).collect();
        self.scheduled.len() == required.len() && self.scheduled_set() == required
    }

    /// The trades of `required` that did not make it into the proposal
    pub fn unscheduled(&self, required: &[Trade]) -> Vec<TradeId> {
        required
            .iter()
            .map(|trade| trade.id)
            .filter(|&id| !self.is_scheduled(id))
            .collect()
    }

    /// The estimated cost of `trade`, defined iff it is scheduled
    pub fn cost(&self, trade: TradeId) -> Option<Cost> {
        self.costs.get(&trade).copied()
    }

    /// The vessel that carries `trade`, if it is scheduled
    pub fn carrier(&self, trade: TradeId) -> Option<VesselIndex> {
        self.carriers.get(&trade).copied()
    }

    pub fn total_cost(&self) -> Cost {
        self.costs.values().sum()
    }
}

impl<S: Schedule> ScheduleProposal<S> {
    /// The sum of the completion times of every vessel's schedule
    pub fn total_completion_time(&self) -> Time {
        self.schedules.iter().map(|s| s.completion_time()).sum()
    }

    pub fn score(&self) -> Score {
        Score {
            scheduled: self.scheduled.len(),
            completion: self.total_completion_time(),
        }
    }

    /// Check the invariants that must hold for a proposal built from `input`:
    /// * the scheduled trades are a subset of `input`, without repetitions
    /// * every scheduled trade is carried by exactly one schedule, which is the one recorded for it
    /// * a cost (and carrier) is recorded iff the trade is scheduled
    pub fn validate(&self, input: &[Trade]) -> Result<(), InvariantViolation> {
        use InvariantViolation::*;
        let known: HashSet<TradeId> = input.iter().map(|trade| trade.id).collect();

        let mut carried: HashMap<TradeId, Vec<VesselIndex>> = HashMap::new();
        for (vessel, schedule) in self.schedules.iter_enumerated() {
            for trade in schedule.trades() {
                carried.entry(trade).or_default().push(vessel);
            }
        }

        let mut seen = HashSet::with_capacity(self.scheduled.len());
        for &trade in &self.scheduled {
            if !known.contains(&trade) {
                return Err(UnknownTrade(trade));
            }
            if !seen.insert(trade) {
                return Err(ScheduledTwice(trade));
            }
            if !self.costs.contains_key(&trade) {
                return Err(MissingCost(trade));
            }

            match carried.get(&trade).map(Vec::as_slice).unwrap_or_default() {
                [actual] if self.carrier(trade) == Some(*actual) => (),
                [actual] => {
                    return Err(WrongCarrier {
                        trade,
                        recorded: self.carrier(trade),
                        actual: *actual,
                    })
                }
                vessels => {
                    return Err(Carriers {
                        trade,
                        count: vessels.len(),
                    })
                }
            }
        }

        match self
            .costs
            .keys()
            .chain(self.carriers.keys())
            .find(|trade| !seen.contains(trade))
        {
            Some(&trade) => Err(Stray(trade)),
            None => Ok(()),
        }
    }
}
