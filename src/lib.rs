pub mod construction;
pub mod cost;
pub mod destroy_and_repair;
pub mod fleet;
pub mod parse;
pub mod problem;
pub mod scheduler;
pub mod solution;
pub mod utils;

pub use fleet::Fleet;
pub use scheduler::{Commitment, Config, Estimate, Outcome, Phase, Scheduler};
