//! The routing-graph seam: `RoutingGraph` trait, shared `GraphHandle`, and
//! the `GraphService` registry that loads graphs at startup.
//!
//! # Pluggability
//!
//! The trip router calls the graph only through [`RoutingGraph`], so any
//! backend that answers itinerary queries (a remote trip planner, a RAPTOR
//! implementation, a test double) can replace the bundled
//! [`TimetableGraph`][crate::TimetableGraph].

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::{GraphError, GraphResult, Itinerary, ItineraryQuery};
use crate::loader::load_timetable_dir;

// ── RoutingGraph trait ────────────────────────────────────────────────────────

/// An immutable multi-modal graph that answers itinerary queries.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync`: one graph is shared read-only by
/// every concurrent routing request.  A query must not block other queries
/// except through the implementation's own internal synchronisation.
pub trait RoutingGraph: Send + Sync {
    /// Candidate itineraries for `query`, best first according to the
    /// query profile's optimisation criterion.
    ///
    /// Returns at most `query.profile.num_itineraries` entries.  An empty
    /// `Vec` means no itinerary was found (or the search timed out).
    fn plan(&self, query: &ItineraryQuery<'_>) -> Vec<Itinerary>;
}

// ── GraphHandle ───────────────────────────────────────────────────────────────

/// Shared, read-only reference to a loaded graph.
///
/// Cloning copies a pointer, never the graph.
#[derive(Clone)]
pub struct GraphHandle(Arc<dyn RoutingGraph>);

impl GraphHandle {
    pub fn new<G: RoutingGraph + 'static>(graph: G) -> Self {
        GraphHandle(Arc::new(graph))
    }

    #[inline]
    pub fn plan(&self, query: &ItineraryQuery<'_>) -> Vec<Itinerary> {
        self.0.plan(query)
    }

    /// `true` if both handles point at the same graph instance.
    pub fn ptr_eq(&self, other: &GraphHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for GraphHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphHandle")
            .field("refs", &Arc::strong_count(&self.0))
            .finish()
    }
}

// ── GraphService ──────────────────────────────────────────────────────────────

/// Process-wide registry of loaded graphs keyed by router id.
///
/// Graphs are registered once at startup; there is no reload or removal.
#[derive(Default, Debug)]
pub struct GraphService {
    graphs: HashMap<String, GraphHandle>,
}

impl GraphService {
    /// The router id used when a deployment has a single graph.
    pub const DEFAULT_ID: &'static str = "";

    pub fn new() -> Self {
        Self::default()
    }

    /// Load the timetable graph in `dir` and register it under
    /// [`DEFAULT_ID`](Self::DEFAULT_ID).
    ///
    /// Fails if the directory or its files are missing or malformed; the
    /// caller is expected to abort, since no request can be routed without
    /// a graph.
    pub fn load(dir: &Path) -> GraphResult<GraphService> {
        Ok(Self::with_default(load_timetable_dir(dir)?))
    }

    /// A service holding `graph` under [`DEFAULT_ID`](Self::DEFAULT_ID).
    ///
    /// For callers that need the concrete graph before handing it over,
    /// e.g. to place a population around its stops.
    pub fn with_default<G: RoutingGraph + 'static>(graph: G) -> GraphService {
        let mut service = GraphService::new();
        service.register(Self::DEFAULT_ID, GraphHandle::new(graph));
        service
    }

    /// Register `handle` under `id`, replacing nothing: a second
    /// registration under the same id is ignored and returns `false`.
    pub fn register(&mut self, id: &str, handle: GraphHandle) -> bool {
        if self.graphs.contains_key(id) {
            return false;
        }
        self.graphs.insert(id.to_owned(), handle);
        true
    }

    /// The graph registered under `id`.
    pub fn handle(&self, id: &str) -> GraphResult<GraphHandle> {
        self.graphs
            .get(id)
            .cloned()
            .ok_or_else(|| GraphError::UnknownGraph(id.to_owned()))
    }

    /// The graph registered under [`DEFAULT_ID`](Self::DEFAULT_ID).
    pub fn default_handle(&self) -> GraphResult<GraphHandle> {
        self.handle(Self::DEFAULT_ID)
    }

    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }
}
