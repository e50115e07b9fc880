//! End-to-end wiring: config → graph → population → runner.

use tracing::info;

use tr_core::SimRng;
use tr_graph::{load_timetable_dir, GraphService};
use tr_population::{load_plans_csv, Population, PopulationGenerator};
use tr_router::TripRouter;

use crate::{RoutingObserver, RoutingRunner, RoutingSummary, ScenarioConfig, SimResult};

/// A loaded scenario ready to route.
pub struct Scenario {
    pub config:     ScenarioConfig,
    pub graphs:     GraphService,
    pub population: Population,
    runner:         RoutingRunner,
}

impl Scenario {
    /// Load the graph, then load or generate the population.
    ///
    /// Any failure here is fatal for the run: nothing can be routed
    /// without a graph, a population, and a valid profile set.
    pub fn load(config: ScenarioConfig) -> SimResult<Self> {
        config.validate()?;

        let graph = load_timetable_dir(&config.graph_dir)?;

        let population = match &config.plans_file {
            Some(path) => {
                let population = load_plans_csv(path)?;
                info!(path = %path.display(), persons = population.len(), "plans loaded");
                population
            }
            None => PopulationGenerator::from_graph(&graph, config.crs)?
                .with_jitter(config.jitter_m)
                .generate(config.population_size, &mut SimRng::new(config.seed))?,
        };

        Self::from_parts(config, GraphService::with_default(graph), population)
    }

    /// Assemble a scenario from an already-loaded graph service and
    /// population.
    pub fn from_parts(
        config:     ScenarioConfig,
        graphs:     GraphService,
        population: Population,
    ) -> SimResult<Self> {
        let router = TripRouter::new(
            graphs.default_handle()?,
            config.selector()?,
            config.router_config()?,
        );
        let runner = RoutingRunner::new(router).with_num_threads(config.num_threads)?;
        Ok(Self { config, graphs, population, runner })
    }

    /// Run `config.iterations` routing passes.
    pub fn run<O: RoutingObserver>(&mut self, observer: &mut O) -> SimResult<Vec<RoutingSummary>> {
        (0..self.config.iterations)
            .map(|iteration| self.runner.route_population(&mut self.population, iteration, observer))
            .collect()
    }

    pub fn runner(&self) -> &RoutingRunner {
        &self.runner
    }
}
