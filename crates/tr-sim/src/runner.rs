//! The routing pass: every planned leg of a population through the
//! [`TripRouter`].

use tracing::{info, warn};

use tr_core::Trip;
use tr_population::Population;
use tr_router::{RouteRequest, RouterResult, RoutingStrategy, TripRouter};

use crate::{RoutingObserver, SimResult};

/// Counts for one routing pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoutingSummary {
    pub iteration:  u32,
    /// Legs submitted to the router.
    pub requests:   usize,
    /// Legs whose route was replaced (graph-routed or teleported).
    pub routed:     usize,
    /// Subset of `routed` served by the teleport strategy.
    pub teleported: usize,
    /// Legs that kept their previous route because no route was found.
    pub failed:     usize,
}

/// Routes whole populations with one shared [`TripRouter`].
pub struct RoutingRunner {
    router:  TripRouter,
    history: Vec<RoutingSummary>,
    #[cfg(feature = "parallel")]
    pool:    Option<rayon::ThreadPool>,
}

impl RoutingRunner {
    pub fn new(router: TripRouter) -> Self {
        Self {
            router,
            history: Vec::new(),
            #[cfg(feature = "parallel")]
            pool: None,
        }
    }

    /// Use a dedicated Rayon pool of `n` threads; `None` keeps the global
    /// pool.  Without the `parallel` feature this only logs.
    pub fn with_num_threads(self, n: Option<usize>) -> SimResult<Self> {
        #[cfg(feature = "parallel")]
        {
            let mut this = self;
            if let Some(n) = n {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| crate::SimError::Config(format!("thread pool: {e}")))?;
                this.pool = Some(pool);
            }
            Ok(this)
        }

        #[cfg(not(feature = "parallel"))]
        {
            if n.is_some() {
                tracing::debug!("num_threads ignored: built without the `parallel` feature");
            }
            Ok(self)
        }
    }

    pub fn router(&self) -> &TripRouter {
        &self.router
    }

    /// Summaries of every pass so far, oldest first.
    pub fn history(&self) -> &[RoutingSummary] {
        &self.history
    }

    /// Route every leg of every person's selected plan for `iteration`.
    ///
    /// A leg that cannot be routed keeps its previous route (possibly none);
    /// the failure is counted and reported to `observer`.  Any other router
    /// error aborts the pass.
    pub fn route_population<O: RoutingObserver>(
        &mut self,
        population: &mut Population,
        iteration:  u32,
        observer:   &mut O,
    ) -> SimResult<RoutingSummary> {
        observer.on_iteration_start(iteration);

        // ── ① Collect ─────────────────────────────────────────────────────
        let requests: Vec<(usize, RouteRequest)> = population
            .persons()
            .iter()
            .enumerate()
            .flat_map(|(slot, person)| {
                person.plan.trips().map(move |t| {
                    (slot, RouteRequest {
                        from:           t.origin.coord,
                        to:             t.destination.coord,
                        departure_time: t.departure(),
                        mode:           t.leg.mode.clone(),
                        person:         person.id,
                        trip_index:     t.index,
                    })
                })
            })
            .collect();

        // ── ② Route ───────────────────────────────────────────────────────
        let results = self.route_all(&requests, iteration);

        // ── ③ Apply ───────────────────────────────────────────────────────
        //
        // Request order is ascending (person, trip), so observers and plans
        // see the same sequence whether or not ② ran in parallel.
        let mut summary = RoutingSummary { iteration, requests: requests.len(), ..Default::default() };
        for ((slot, req), result) in requests.iter().zip(results) {
            match result {
                Ok(trip) => {
                    summary.routed += 1;
                    if RoutingStrategy::for_mode(&req.mode) == RoutingStrategy::Teleport {
                        summary.teleported += 1;
                    }
                    observer.on_trip_routed(req.person, req.trip_index, &trip);
                    if let Some(leg) =
                        population.persons_mut()[*slot].plan.leg_mut(req.trip_index as usize)
                    {
                        leg.route = Some(trip);
                    }
                }
                Err(e) if e.is_recoverable() => {
                    summary.failed += 1;
                    warn!(
                        person = req.person.0,
                        trip = req.trip_index,
                        iteration,
                        error = %e,
                        "no route found; keeping previous route"
                    );
                    observer.on_route_failed(req.person, req.trip_index, &e);
                }
                Err(e) => return Err(e.into()),
            }
        }

        info!(
            iteration,
            requests = summary.requests,
            routed = summary.routed,
            teleported = summary.teleported,
            failed = summary.failed,
            "routing pass finished"
        );
        observer.on_iteration_end(&summary);
        self.history.push(summary.clone());
        Ok(summary)
    }

    fn route_all(&self, requests: &[(usize, RouteRequest)], iteration: u32) -> Vec<RouterResult<Trip>> {
        let router = &self.router;

        #[cfg(not(feature = "parallel"))]
        {
            requests.iter().map(|(_, req)| router.route(req, iteration)).collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            let run = || {
                requests
                    .par_iter()
                    .map(|(_, req)| router.route(req, iteration))
                    .collect::<Vec<_>>()
            };
            match &self.pool {
                Some(pool) => pool.install(run),
                None => run(),
            }
        }
    }
}
