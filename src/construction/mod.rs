pub mod greedy;
pub mod multi_start;

pub use greedy::GreedyInsertion;
pub use multi_start::MultiStart;
