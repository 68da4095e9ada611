use std::{error::Error, path::PathBuf};

use clap::{Parser, Subcommand};
use log::info;
use serde::Serialize;

use tramp::{
    fleet::Fleet,
    parse::Instance,
    problem::{Cost, Time, TradeId},
    scheduler::{Config, Outcome, Phase, Scheduler},
    solution::{Operation, Schedule, ScheduleProposal, Voyage},
};

#[derive(Parser, Debug)]
#[clap(name = "tramp", about = "Schedules trades on a fleet of tramp vessels")]
struct Args {
    #[clap(subcommand)]
    command: Command,
    /// JSON file with the scheduler configuration
    #[clap(long, global = true)]
    config: Option<PathBuf>,
    /// Seed of the random number generator, overriding the configuration
    #[clap(long, global = true)]
    seed: Option<u64>,
    /// Log progress at debug level unless RUST_LOG says otherwise
    #[clap(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Estimate the cost of every trade in an instance, without committing to anything
    Estimate { instance: PathBuf },
    /// Commit to every trade in an instance, refining the schedules if all of them fit
    Commit { instance: PathBuf },
}

#[derive(Debug, Serialize)]
struct StopReport {
    trade: TradeId,
    operation: Operation,
    port: String,
    arrival: Time,
    departure: Time,
}

#[derive(Debug, Serialize)]
struct VesselReport {
    vessel: String,
    completion_time: Time,
    stops: Vec<StopReport>,
}

#[derive(Debug, Serialize)]
struct TradeReport {
    trade: TradeId,
    vessel: String,
    cost: Cost,
}

#[derive(Debug, Serialize)]
struct Report {
    vessels: Vec<VesselReport>,
    trades: Vec<TradeReport>,
    unscheduled: Vec<TradeId>,
    total_cost: Cost,
    total_completion_time: Time,
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<Outcome>,
    phases: Vec<Phase>,
}

impl Report {
    fn new(instance: &Instance, proposal: &ScheduleProposal<Voyage>) -> Result<Self, Box<dyn Error>> {
        let problem = &instance.problem;
        let mut vessels = Vec::with_capacity(proposal.schedules().len());
        for (v, voyage) in proposal.schedules().iter_enumerated() {
            let timeline = voyage.timeline()?;
            let stops = voyage
                .stops()
                .iter()
                .zip(timeline)
                .map(|(stop, call)| StopReport {
                    trade: stop.trade.id,
                    operation: stop.operation,
                    port: problem.port_name(call.port).to_string(),
                    arrival: call.arrival,
                    departure: call.departure,
                })
                .collect();

            vessels.push(VesselReport {
                vessel: problem.vessels()[v].name().to_string(),
                completion_time: voyage.completion_time(),
                stops,
            });
        }

        let trades = proposal
            .scheduled()
            .iter()
            .filter_map(|&trade| {
                let vessel = proposal.carrier(trade)?;
                Some(TradeReport {
                    trade,
                    vessel: problem.vessels()[vessel].name().to_string(),
                    cost: proposal.cost(trade)?,
                })
            })
            .collect();

        Ok(Self {
            vessels,
            trades,
            unscheduled: proposal.unscheduled(&instance.trades),
            total_cost: proposal.total_cost(),
            total_completion_time: proposal.total_completion_time(),
            outcome: None,
            phases: Vec::new(),
        })
    }
}

fn load_config(args: &Args) -> Result<Config, Box<dyn Error>> {
    let mut config: Config = match &args.config {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => Config::default(),
    };

    if args.seed.is_some() {
        config.seed = args.seed;
    }

    Ok(config)
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = load_config(&args)?;
    info!("Using {:?}", config);
    let mut scheduler = Scheduler::from_config(config);

    let report = match &args.command {
        Command::Estimate { instance } => {
            let instance = Instance::from_path(instance)?;
            let fleet = Fleet::idle(instance.problem.clone());
            let estimate = scheduler.estimate(&fleet, &instance.trades)?;

            let mut report = Report::new(&instance, &estimate.proposal)?;
            report.phases = estimate.phases;
            report
        }
        Command::Commit { instance } => {
            let instance = Instance::from_path(instance)?;
            let fleet = Fleet::idle(instance.problem.clone());
            let commitment = scheduler.commit(&fleet, &instance.trades)?;

            let mut report = Report::new(&instance, &commitment.proposal)?;
            report.outcome = Some(commitment.outcome);
            report.phases = commitment.phases;
            report
        }
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
