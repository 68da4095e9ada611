use std::fmt::Debug;

use derive_more::Display;

use crate::problem::{Time, Trade, TradeId};

pub mod proposal;
pub mod voyage;

pub use proposal::{check_unique, InvariantViolation, Score, ScheduleProposal};
pub use voyage::{Operation, Stop, Voyage};

/// The route of a single vessel: an ordered sequence of pick-up and drop-off operations.
///
/// `Clone` must produce an independent copy; no state may be shared between a schedule and
/// its clones, since candidate schedules are built by repeatedly copying a base schedule.
pub trait Schedule: Clone + Debug {
    /// The positions at which a new operation can be placed, in ascending order.
    fn insertion_points(&self) -> Vec<usize>;

    /// Returns a copy of this schedule where `trade` is picked up at `pickup` and dropped off at `dropoff`.
    /// Both positions refer to the schedule *before* insertion, and `pickup <= dropoff` must hold.
    fn add_transportation(
        &self,
        trade: &Trade,
        pickup: usize,
        dropoff: usize,
    ) -> Result<Self, InsertionError>;

    /// Whether the schedule can actually be sailed (capacity, time windows, precedence)
    fn verify(&self) -> bool;

    /// The time at which the last operation of the schedule is finished
    fn completion_time(&self) -> Time;

    /// The trades transported by this schedule
    fn trades(&self) -> Vec<TradeId>;
}

#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum InsertionError {
    /// The position we're trying to insert at is out of bounds
    #[display(fmt = "position {} is out of bounds for a schedule of {} stops", position, len)]
    PositionOutOfBounds { position: usize, len: usize },
    /// The drop-off would happen before the pick-up
    #[display(fmt = "drop-off at {} precedes pick-up at {}", dropoff, pickup)]
    DropoffBeforePickup { pickup: usize, dropoff: usize },
    /// The trade is already part of the schedule
    #[display(fmt = "trade {} is already scheduled", _0)]
    AlreadyScheduled(TradeId),
}

impl std::error::Error for InsertionError {}
