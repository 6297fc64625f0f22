//! `tracklet` CLI: simulate events, fit tracklets, print summaries.

use anyhow::Result;
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use serde::Serialize;
use sim::{EventGenerator, SimConfig};
use std::sync::Arc;
use tracklet_core::{
    EventId, FitResults, Fitter, LineFitConfig, LineFitter, ParticleTable, Tracklet,
};

#[derive(Parser)]
#[command(name = "tracklet", about = "Synthetic tracklet fitting CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate events, fit every tracklet with a straight line and print them.
    Simulate {
        /// Number of events
        #[arg(long, default_value_t = 1)]
        events: u64,
        /// Tracklets per event
        #[arg(long, default_value_t = 5)]
        tracklets: usize,
        /// Random seed for reproducibility
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Minimum hits for a line fit
        #[arg(long, default_value_t = 2)]
        min_hits: usize,
        /// Print fit results as JSON lines instead of summaries
        #[arg(long)]
        json: bool,
    },
    /// Print the standard particle table.
    Particles,
}

/// One JSON line of `simulate --json` output.
#[derive(Serialize)]
struct FitRecord<'a> {
    tracklet_id: u64,
    e_id: u64,
    particle: &'a str,
    hits: usize,
    front_hits: usize,
    back_hits: usize,
    fit: Option<&'a FitResults>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            events,
            tracklets,
            seed,
            min_hits,
            json,
        } => {
            let config = SimConfig {
                n_tracklets: tracklets,
                seed,
                ..Default::default()
            };
            run_simulation(config, events, LineFitConfig { min_hits }, json)?;
        }
        Commands::Particles => print_particles(ParticleTable::standard()),
    }

    Ok(())
}

fn run_simulation(
    config: SimConfig,
    events: u64,
    fit_config: LineFitConfig,
    json: bool,
) -> Result<()> {
    let table = ParticleTable::standard();
    let fitter: Arc<dyn Fitter> = Arc::new(LineFitter::new(fit_config));
    let mut generator = EventGenerator::new(config);
    let start = std::time::Instant::now();
    let mut total = 0usize;

    for e in 0..events {
        let mut tracklets: Vec<Tracklet> = generator
            .generate(EventId(e), table)
            .into_iter()
            .map(|t| t.with_fitter(fitter.clone()))
            .collect();

        tracklets
            .par_iter_mut()
            .try_for_each(|t| t.fit_and_set_endpoints().map(|_| ()))?;
        total += tracklets.len();

        for t in &tracklets {
            if json {
                let record = FitRecord {
                    tracklet_id: t.tracklet_id.0,
                    e_id: t.e_id.0,
                    particle: t.particle_name(),
                    hits: t.hits.len(),
                    front_hits: t.get_front_hits().len(),
                    back_hits: t.get_back_hits().len(),
                    fit: t.get_fit_results(),
                };
                println!("{}", serde_json::to_string(&record)?);
            } else {
                println!("{t}");
                if let Some(results) = t.get_fit_results() {
                    println!("    {}", format_fit(results));
                }
            }
        }
    }

    tracing::info!(
        events,
        tracklets = total,
        elapsed_s = start.elapsed().as_secs_f64(),
        "simulation done"
    );
    Ok(())
}

/// `key=value` pairs in key order.
fn format_fit(results: &FitResults) -> String {
    results
        .iter()
        .map(|(k, v)| format!("{k}={v:.4}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn print_particles(table: &ParticleTable) {
    for (id, info) in table.entries() {
        println!("{:>6}  {:<8} {}", id.0, info.name, info.color);
    }
    let default = table.default_info();
    println!("{:>6}  {:<8} {}", "*", default.name, default.color);
}
