//! vbb — transit trip routing over a small Berlin timetable.
//!
//! Generates a home/work population around the stops of four central
//! lines (U2, U5, S1, S5), routes every trip through the timetable graph
//! for a few iterations, and writes per-leg and mode-share CSVs.
//!
//! Pass a scenario JSON path to run a different configuration:
//!
//! ```text
//! cargo run -p vbb -- path/to/scenario.json
//! ```

mod network;

use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use tr_population::write_plans_csv;
use tr_sim::{
    ModeShareObserver, Scenario, ScenarioConfig, TripCsvObserver, write_mode_share_csv,
};

// ── Constants ─────────────────────────────────────────────────────────────────

const POPULATION:   usize = 200;
const SEED:         u64   = 42;
const ITERATIONS:   u32   = 2;
const SERVICE_DATE: &str  = "2024-06-03"; // a Monday
const OUTPUT_DIR:   &str  = "output/vbb";
const SAMPLE_ROWS:  usize = 8;

// ── Config ────────────────────────────────────────────────────────────────────

/// Built-in scenario: writes the timetable into the output directory and
/// points the config at it.
fn default_config() -> Result<ScenarioConfig> {
    let graph_dir = Path::new(OUTPUT_DIR).join("graph");
    fs::create_dir_all(&graph_dir)?;
    network::write_timetable(&graph_dir)?;

    let json = serde_json::json!({
        "graph_dir":       graph_dir,
        "service_date":    SERVICE_DATE,
        "time_zone":       "Europe/Berlin",
        "crs":             { "kind": "local_tangent", "origin": { "lat": 52.52, "lon": 13.40 } },
        "population_size": POPULATION,
        "seed":            SEED,
        "iterations":      ITERATIONS,
        "output_dir":      OUTPUT_DIR,
    });
    Ok(ScenarioConfig::from_json(&json.to_string())?)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("=== vbb — transit trip routing ===");

    // 1. Scenario config.
    let config = match std::env::args().nth(1) {
        Some(path) => {
            println!("Config: {path}");
            ScenarioConfig::load(Path::new(&path))?
        }
        None => {
            let config = default_config()?;
            println!(
                "Built-in network: {} stops, {} lines",
                network::stop_count(),
                network::line_count()
            );
            config
        }
    };
    println!(
        "Service day: {} {}  |  Iterations: {}  |  Seed: {}",
        config.service_date, config.time_zone, config.iterations, config.seed
    );
    println!();

    // 2. Load graph and population.
    let t0 = Instant::now();
    let mut scenario = Scenario::load(config)?;
    println!(
        "Loaded {} persons with {} trips in {:.3} s",
        scenario.population.len(),
        scenario.population.trip_count(),
        t0.elapsed().as_secs_f64()
    );

    let router = scenario.runner().router();
    let selector = router.selector();
    let choice = if selector.is_randomized() {
        format!("drawn from first {}", selector.draw_count())
    } else {
        "always first".to_owned()
    };
    println!(
        "Profiles: {} ({choice})  |  Feasibility slack: {} s",
        selector.profiles().len(),
        router.config().feasibility_slack_secs
    );
    println!();

    // 3. Set up output.
    let out_dir = scenario.config.output_dir.clone();
    fs::create_dir_all(&out_dir)?;
    let mut obs = (TripCsvObserver::create(&out_dir)?, ModeShareObserver::new());

    // 4. Route.
    let t1 = Instant::now();
    let summaries = scenario.run(&mut obs)?;
    let elapsed = t1.elapsed();

    if let Some(e) = obs.0.take_error() {
        eprintln!("output error: {e}");
    }
    obs.0.flush()?;

    // 5. Write plans and mode shares.
    write_plans_csv(&out_dir.join("plans.csv"), &scenario.population)?;
    write_mode_share_csv(&out_dir.join("mode_share.csv"), &obs.1)?;

    // 6. Summary.
    println!("Routing complete in {:.3} s", elapsed.as_secs_f64());
    println!("  trips.csv      : {} rows", obs.0.rows());
    println!("  mode_share.csv : {} modes", obs.1.counts().len());
    println!();

    println!(
        "{:<10} {:>9} {:>8} {:>11} {:>7}",
        "Iteration", "Requests", "Routed", "Teleported", "Failed"
    );
    println!("{}", "-".repeat(49));
    for s in &summaries {
        println!(
            "{:<10} {:>9} {:>8} {:>11} {:>7}",
            s.iteration, s.requests, s.routed, s.teleported, s.failed
        );
    }
    println!();

    // Shares accumulate over all iterations.
    println!("{:<24} {:>7} {:>8}", "Main mode", "Trips", "Share");
    println!("{}", "-".repeat(41));
    for (mode, trips) in obs.1.counts() {
        println!("{:<24} {:>7} {:>7.1}%", mode, trips, obs.1.share(mode) * 100.0);
    }
    println!();

    // 7. A few routed trips from the final iteration.
    println!("{:<8} {:<6} {:<10} {:<10} Legs", "Person", "Trip", "Depart", "Arrive");
    println!("{}", "-".repeat(72));
    let sample = scenario
        .population
        .persons()
        .iter()
        .flat_map(|p| p.plan.trips().map(move |slot| (p.id, slot)))
        .filter_map(|(id, slot)| slot.leg.route.as_ref().map(|trip| (id, slot.index, trip)))
        .take(SAMPLE_ROWS);
    for (id, index, trip) in sample {
        let legs: Vec<String> = trip
            .legs()
            .iter()
            .map(|leg| match &leg.line {
                Some(line) => format!("{}[{line}]", leg.mode),
                None => leg.mode.to_string(),
            })
            .collect();
        println!(
            "{:<8} {:<6} {:<10} {:<10} {}",
            id.0,
            index,
            trip.departure().to_string(),
            trip.arrival().to_string(),
            legs.join(" → ")
        );
    }

    Ok(())
}
