/// Tolerance used when comparing times, quantities and objective values
pub const EPSILON: f64 = 1e-5;
