pub mod lns;

pub use lns::NeighborhoodRepair;
