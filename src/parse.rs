use std::{path::Path, sync::Arc};

use derive_more::{Display, From};
use log::debug;
use serde::Deserialize;

use crate::{
    problem::{Distance, InvalidTrade, Problem, ProblemConstructionError, Trade, Vessel},
    solution::{check_unique, InvariantViolation},
};

#[derive(Debug, Display, From)]
pub enum ParseError {
    #[display(fmt = "failed to read instance: {}", _0)]
    Io(std::io::Error),
    #[display(fmt = "malformed instance: {}", _0)]
    Json(serde_json::Error),
    #[display(fmt = "invalid problem: {}", _0)]
    Problem(ProblemConstructionError),
    #[display(fmt = "invalid trade: {}", _0)]
    Trade(InvalidTrade),
    #[display(fmt = "{}", _0)]
    Duplicate(InvariantViolation),
}

impl std::error::Error for ParseError {}

/// The on-disk layout of an instance
#[derive(Debug, Deserialize)]
struct RawInstance {
    ports: Vec<String>,
    distances: Vec<Vec<Distance>>,
    vessels: Vec<Vessel>,
    #[serde(default)]
    trades: Vec<Trade>,
}

/// A problem together with the trades that are to be scheduled in it.
#[derive(Debug, Clone)]
pub struct Instance {
    pub problem: Arc<Problem>,
    pub trades: Vec<Trade>,
}

impl Instance {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ParseError> {
        let path = path.as_ref();
        debug!("Reading instance from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, ParseError> {
        let raw: RawInstance = serde_json::from_str(json)?;
        let problem = Problem::new(raw.ports, raw.vessels, raw.distances)?;

        for trade in &raw.trades {
            problem.check_trade(trade)?;
        }
        check_unique(&raw.trades)?;

        debug!(
            "Parsed instance with {} ports, {} vessels and {} trades",
            problem.ports().len(),
            problem.vessels().len(),
            raw.trades.len()
        );

        Ok(Self {
            problem: Arc::new(problem),
            trades: raw.trades,
        })
    }
}
