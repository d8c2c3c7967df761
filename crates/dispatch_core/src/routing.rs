//! Pluggable travel-time providers: trait abstraction over shortest-path
//! backends.
//!
//! Two implementations, selectable via [`TravelTimeKind`]:
//!
//! - **`DijkstraProvider`**: on-demand single-source Dijkstra per query. No
//!   setup cost; per-query cost grows with the network.
//! - **`AllPairsProvider`**: Floyd-Warshall precomputation, O(V³) setup and
//!   O(1) lookup. Pays off when queries (calls × fleet size) dominate.
//!
//! Either can sit behind [`CachedProvider`]. The provider is stored as a
//! `Box<dyn TravelTimeProvider>` ECS resource, constructed from
//! `TravelTimeKind` during scenario building.

use std::num::NonZeroUsize;
use std::sync::Mutex;

use bevy_ecs::prelude::Resource;
use lru::LruCache;
use pathfinding::directed::dijkstra::dijkstra;
use serde::{Deserialize, Serialize};

use crate::errors::NetworkError;
use crate::network::{LocationId, RoadNetwork};

/// Which shortest-path backend to use. Part of
/// [`ScenarioParams`](crate::scenario::ScenarioParams) so parameter sweeps
/// can serialize it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TravelTimeKind {
    /// Dijkstra per query, behind an LRU cache.
    #[default]
    OnDemand,
    /// Floyd-Warshall all-pairs matrix built at scenario setup.
    AllPairs,
}

/// Trait for travel-time backends. Implementations must be `Send + Sync` so
/// the provider can be stored as a shared ECS resource.
pub trait TravelTimeProvider: Send + Sync {
    /// Shortest travel time in ms from `from` to `to`. `Ok(None)` when no
    /// path exists. Costs are directed: `travel_time(a, b)` and
    /// `travel_time(b, a)` may differ.
    fn travel_time(&self, from: LocationId, to: LocationId)
        -> Result<Option<u64>, NetworkError>;
}

/// ECS resource wrapping a boxed travel-time provider.
#[derive(Resource)]
pub struct TravelTimeResource(pub Box<dyn TravelTimeProvider>);

impl std::ops::Deref for TravelTimeResource {
    type Target = dyn TravelTimeProvider;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

// ---------------------------------------------------------------------------
// On-demand Dijkstra
// ---------------------------------------------------------------------------

/// Computes each query with a fresh Dijkstra run over the network.
pub struct DijkstraProvider {
    network: RoadNetwork,
}

impl DijkstraProvider {
    pub fn new(network: RoadNetwork) -> Self {
        Self { network }
    }
}

impl TravelTimeProvider for DijkstraProvider {
    fn travel_time(
        &self,
        from: LocationId,
        to: LocationId,
    ) -> Result<Option<u64>, NetworkError> {
        if !self.network.contains(from) {
            return Err(NetworkError::UnknownLocation(from));
        }
        if !self.network.contains(to) {
            return Err(NetworkError::UnknownLocation(to));
        }
        if from == to {
            return Ok(Some(0));
        }
        let result = dijkstra(
            &from,
            |node| self.network.neighbors(*node).to_vec(),
            |node| *node == to,
        );
        Ok(result.map(|(_, cost)| cost))
    }
}

// ---------------------------------------------------------------------------
// All-pairs matrix
// ---------------------------------------------------------------------------

/// Floyd-Warshall all-pairs matrix: every query is a row-major lookup.
pub struct AllPairsProvider {
    node_count: usize,
    matrix: Vec<Option<u64>>,
}

impl AllPairsProvider {
    pub fn new(network: &RoadNetwork) -> Self {
        let n = network.node_count();
        let mut matrix: Vec<Option<u64>> = vec![None; n * n];
        for i in 0..n {
            matrix[i * n + i] = Some(0);
        }
        for from in 0..n {
            for &(to, cost) in network.neighbors(LocationId(from as u32)) {
                let cell = &mut matrix[from * n + to.0 as usize];
                *cell = Some(cell.map_or(cost, |existing| existing.min(cost)));
            }
        }
        for k in 0..n {
            for i in 0..n {
                let Some(ik) = matrix[i * n + k] else { continue };
                for j in 0..n {
                    let Some(kj) = matrix[k * n + j] else { continue };
                    let through = ik + kj;
                    if matrix[i * n + j].map_or(true, |direct| through < direct) {
                        matrix[i * n + j] = Some(through);
                    }
                }
            }
        }
        Self {
            node_count: n,
            matrix,
        }
    }
}

impl TravelTimeProvider for AllPairsProvider {
    fn travel_time(
        &self,
        from: LocationId,
        to: LocationId,
    ) -> Result<Option<u64>, NetworkError> {
        if from.0 as usize >= self.node_count {
            return Err(NetworkError::UnknownLocation(from));
        }
        if to.0 as usize >= self.node_count {
            return Err(NetworkError::UnknownLocation(to));
        }
        Ok(self.matrix[from.0 as usize * self.node_count + to.0 as usize])
    }
}

// ---------------------------------------------------------------------------
// Caching wrapper
// ---------------------------------------------------------------------------

/// LRU-cached wrapper around any [`TravelTimeProvider`].
///
/// Cache key is `(from, to)` (directional). Successful lookups are cached,
/// including "no path" results: nearest-unit search re-asks the same
/// unreachable pairs on every dispatch attempt. Errors pass through.
pub struct CachedProvider {
    inner: Box<dyn TravelTimeProvider>,
    cache: Mutex<LruCache<(LocationId, LocationId), Option<u64>>>,
}

impl CachedProvider {
    pub fn new(inner: Box<dyn TravelTimeProvider>, capacity: usize) -> Self {
        Self {
            inner,
            cache: Mutex::new(LruCache::new(
                NonZeroUsize::new(capacity.max(1)).expect("cache capacity must be > 0"),
            )),
        }
    }
}

impl TravelTimeProvider for CachedProvider {
    fn travel_time(
        &self,
        from: LocationId,
        to: LocationId,
    ) -> Result<Option<u64>, NetworkError> {
        let key = (from, to);

        // Fast path: cache hit
        if let Ok(mut cache) = self.cache.lock() {
            if let Some(cached) = cache.get(&key) {
                return Ok(*cached);
            }
        }

        // Slow path: query inner provider
        let result = self.inner.travel_time(from, to)?;

        if let Ok(mut cache) = self.cache.lock() {
            cache.put(key, result);
        }

        Ok(result)
    }
}

// ---------------------------------------------------------------------------
// Factory: build a provider from TravelTimeKind
// ---------------------------------------------------------------------------

/// Construct a boxed [`TravelTimeProvider`] from a kind descriptor.
///
/// - `OnDemand` is wrapped in a [`CachedProvider`] with the given capacity.
/// - `AllPairs` is returned bare; the matrix lookup is already O(1).
pub fn build_travel_time_provider(
    kind: TravelTimeKind,
    network: &RoadNetwork,
    cache_capacity: usize,
) -> Box<dyn TravelTimeProvider> {
    match kind {
        TravelTimeKind::OnDemand => Box::new(CachedProvider::new(
            Box::new(DijkstraProvider::new(network.clone())),
            cache_capacity,
        )),
        TravelTimeKind::AllPairs => Box::new(AllPairsProvider::new(network)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asymmetric_network() -> RoadNetwork {
        let mut network = RoadNetwork::new();
        network.add_edge("A", "B", 5);
        network.add_edge("B", "A", 9);
        network.add_edge("B", "C", 3);
        network.add_edge("A", "C", 20);
        // D is reachable from C but leads nowhere.
        network.add_edge("C", "D", 4);
        network
    }

    #[test]
    fn dijkstra_follows_directed_costs() {
        let network = asymmetric_network();
        let a = network.lookup("A").expect("A");
        let b = network.lookup("B").expect("B");
        let c = network.lookup("C").expect("C");
        let provider = DijkstraProvider::new(network);

        assert_eq!(provider.travel_time(a, b).expect("query"), Some(5));
        assert_eq!(provider.travel_time(b, a).expect("query"), Some(9));
        // A -> B -> C beats the direct A -> C edge.
        assert_eq!(provider.travel_time(a, c).expect("query"), Some(8));
        assert_eq!(provider.travel_time(a, a).expect("query"), Some(0));
    }

    #[test]
    fn dijkstra_reports_missing_paths() {
        let network = asymmetric_network();
        let a = network.lookup("A").expect("A");
        let d = network.lookup("D").expect("D");
        let provider = DijkstraProvider::new(network);

        assert_eq!(provider.travel_time(d, a).expect("query"), None);
    }

    #[test]
    fn providers_agree() {
        let network = asymmetric_network();
        let n = network.node_count() as u32;
        let on_demand = DijkstraProvider::new(network.clone());
        let all_pairs = AllPairsProvider::new(&network);

        for from in 0..n {
            for to in 0..n {
                let from = LocationId(from);
                let to = LocationId(to);
                assert_eq!(
                    on_demand.travel_time(from, to).expect("dijkstra"),
                    all_pairs.travel_time(from, to).expect("all-pairs"),
                    "providers disagree on {from:?} -> {to:?}"
                );
            }
        }
    }

    #[test]
    fn unknown_location_is_an_error() {
        let network = asymmetric_network();
        let a = network.lookup("A").expect("A");
        let bogus = LocationId(99);
        let provider = AllPairsProvider::new(&network);

        assert_eq!(
            provider.travel_time(a, bogus),
            Err(NetworkError::UnknownLocation(bogus))
        );
    }

    #[test]
    fn cached_provider_matches_inner() {
        let network = asymmetric_network();
        let a = network.lookup("A").expect("A");
        let c = network.lookup("C").expect("C");
        let cached = CachedProvider::new(Box::new(DijkstraProvider::new(network)), 16);

        assert_eq!(cached.travel_time(a, c).expect("first"), Some(8));
        // Second query is served from the cache.
        assert_eq!(cached.travel_time(a, c).expect("second"), Some(8));
    }
}
