//! Road network: interned location names and directed weighted edges.
//!
//! Edge costs are simulation milliseconds. The graph is directed and may be
//! asymmetric; nothing here assumes metric costs.

use std::collections::HashMap;

/// Interned index of a location name. Stable for the lifetime of the
/// [`RoadNetwork`] that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocationId(pub u32);

/// Directed weighted graph over interned locations.
#[derive(Debug, Clone, Default)]
pub struct RoadNetwork {
    names: Vec<String>,
    index: HashMap<String, LocationId>,
    adjacency: Vec<Vec<(LocationId, u64)>>,
}

impl RoadNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a location name, returning its id. Re-interning an existing
    /// name returns the original id.
    pub fn intern(&mut self, name: &str) -> LocationId {
        if let Some(id) = self.index.get(name) {
            return *id;
        }
        let id = LocationId(self.names.len() as u32);
        self.names.push(name.to_string());
        self.index.insert(name.to_string(), id);
        self.adjacency.push(Vec::new());
        id
    }

    pub fn lookup(&self, name: &str) -> Option<LocationId> {
        self.index.get(name).copied()
    }

    pub fn name(&self, id: LocationId) -> Option<&str> {
        self.names.get(id.0 as usize).map(String::as_str)
    }

    pub fn node_count(&self) -> usize {
        self.names.len()
    }

    pub fn contains(&self, id: LocationId) -> bool {
        (id.0 as usize) < self.names.len()
    }

    /// Add a directed edge, interning both endpoints. A parallel edge keeps
    /// the minimum cost.
    pub fn add_edge(&mut self, from: &str, to: &str, cost_ms: u64) {
        let from = self.intern(from);
        let to = self.intern(to);
        let edges = &mut self.adjacency[from.0 as usize];
        match edges.iter_mut().find(|(dest, _)| *dest == to) {
            Some((_, cost)) => *cost = (*cost).min(cost_ms),
            None => edges.push((to, cost_ms)),
        }
    }

    /// Outgoing edges of `id`; empty for unknown ids.
    pub fn neighbors(&self, id: LocationId) -> &[(LocationId, u64)] {
        self.adjacency
            .get(id.0 as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_is_idempotent() {
        let mut network = RoadNetwork::new();
        let a = network.intern("Hospital");
        let b = network.intern("Hospital");
        assert_eq!(a, b);
        assert_eq!(network.node_count(), 1);
        assert_eq!(network.name(a), Some("Hospital"));
    }

    #[test]
    fn parallel_edges_keep_minimum_cost() {
        let mut network = RoadNetwork::new();
        network.add_edge("A", "B", 300_000);
        network.add_edge("A", "B", 120_000);
        network.add_edge("A", "B", 240_000);

        let a = network.lookup("A").expect("node A");
        let b = network.lookup("B").expect("node B");
        assert_eq!(network.neighbors(a), &[(b, 120_000)]);
    }

    #[test]
    fn edges_are_directed() {
        let mut network = RoadNetwork::new();
        network.add_edge("A", "B", 60_000);

        let b = network.lookup("B").expect("node B");
        assert!(network.neighbors(b).is_empty());
    }
}
