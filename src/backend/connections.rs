use std::collections::{BTreeMap, BTreeSet};

use log::debug;
use petgraph::graphmap::UnGraphMap;

use super::HANDOVER_MARGIN;
use super::mathphysics::{Meter, Position};
use super::site::{IdToSiteMap, Site, SiteId};


/// Overlap predicate with the fixed handover margin: the cells must
/// overlap by more than 10% of their combined reach before they count as
/// a handover pair.
#[must_use]
pub fn overlaps(a: &Site, b: &Site) -> bool {
    if !a.is_active() || !b.is_active() || a.id() == b.id() {
        return false;
    }

    let distance = a.distance_to(b);
    let total_coverage = a.coverage_radius() + b.coverage_radius();

    distance < total_coverage * (1.0 - HANDOVER_MARGIN)
}


/// Adjacency view of the currently active sites: site id to the ordered
/// set of neighbor ids. The key set always equals the active-site id set
/// and neighbor sets stay symmetric.
#[derive(Clone, Debug, Default)]
pub struct OptimizedNetwork(BTreeMap<SiteId, BTreeSet<SiteId>>);

impl OptimizedNetwork {
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    #[must_use]
    pub fn contains(&self, site_id: SiteId) -> bool {
        self.0.contains_key(&site_id)
    }

    #[must_use]
    pub fn neighbors(&self, site_id: SiteId) -> Option<&BTreeSet<SiteId>> {
        self.0.get(&site_id)
    }

    #[must_use]
    pub fn is_isolated(&self, site_id: SiteId) -> bool {
        self.0
            .get(&site_id)
            .map_or(true, BTreeSet::is_empty)
    }

    #[must_use]
    pub fn ids(&self) -> Vec<SiteId> {
        self.0.keys().copied().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn connected_count(&self) -> usize {
        self.0
            .values()
            .filter(|neighbors| !neighbors.is_empty())
            .count()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn insert_site(&mut self, site_id: SiteId) {
        self.0.entry(site_id).or_default();
    }

    pub fn remove_site(&mut self, site_id: SiteId) {
        self.0.remove(&site_id);

        for neighbors in self.0.values_mut() {
            neighbors.remove(&site_id);
        }
    }

    pub fn connect(&mut self, a: SiteId, b: SiteId) {
        self.0.entry(a).or_default().insert(b);
        self.0.entry(b).or_default().insert(a);
    }

    /// Empties the site's neighbor set and strips the site from every
    /// other set, keeping the site itself a member of the network.
    pub fn disconnect(&mut self, site_id: SiteId) {
        for neighbors in self.0.values_mut() {
            neighbors.remove(&site_id);
        }
        if let Some(neighbors) = self.0.get_mut(&site_id) {
            neighbors.clear();
        }
    }

    /// Ascending (id, ordered neighbor list) pairs, the interchange
    /// format for downstream reporting.
    #[must_use]
    pub fn to_adjacency(&self) -> Vec<(SiteId, Vec<SiteId>)> {
        self.0
            .iter()
            .map(|(site_id, neighbors)|
                (*site_id, neighbors.iter().copied().collect())
            )
            .collect()
    }
}


#[derive(Clone, Debug, Default)]
pub struct CoverageGraph {
    graph_map: UnGraphMap<SiteId, Meter>,
}

impl CoverageGraph {
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph_map: UnGraphMap::new(),
        }
    }

    #[must_use]
    pub fn contains_site(&self, site_id: SiteId) -> bool {
        self.graph_map.contains_node(site_id)
    }

    #[must_use]
    pub fn contains_edge(&self, a: SiteId, b: SiteId) -> bool {
        self.graph_map.contains_edge(a, b)
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph_map.edge_count()
    }

    #[must_use]
    pub fn neighbor_ids(&self, site_id: SiteId) -> Vec<SiteId> {
        if !self.graph_map.contains_node(site_id) {
            return Vec::new();
        }

        let mut neighbor_ids: Vec<SiteId> = self.graph_map
            .neighbors(site_id)
            .collect();
        neighbor_ids.sort_unstable();

        neighbor_ids
    }

    /// Unordered edge pairs, normalized to (low, high) and sorted.
    #[must_use]
    pub fn edges(&self) -> Vec<(SiteId, SiteId)> {
        let mut edges: Vec<(SiteId, SiteId)> = self.graph_map
            .all_edges()
            .map(|(a, b, _)| if a < b { (a, b) } else { (b, a) })
            .collect();
        edges.sort_unstable();

        edges
    }

    pub fn clear(&mut self) {
        self.graph_map.clear();
    }

    pub fn remove_site(&mut self, site_id: SiteId) {
        self.graph_map.remove_node(site_id);
    }

    /// Rebuilds every edge touching the site against the current active
    /// set and patches the adjacency view symmetrically. O(active count);
    /// must run after any position, radius or activation change.
    pub fn recompute_for(
        &mut self,
        site_id: SiteId,
        site_map: &IdToSiteMap,
        network: &mut OptimizedNetwork,
    ) {
        self.graph_map.remove_node(site_id);
        network.disconnect(site_id);

        let Some(site) = site_map.get(&site_id) else {
            network.remove_site(site_id);
            return;
        };
        if !site.is_active() {
            network.remove_site(site_id);
            return;
        }

        self.graph_map.add_node(site_id);
        network.insert_site(site_id);

        let mut incidence = Vec::new();
        for other in site_map.active_sites() {
            if overlaps(site, other) {
                self.graph_map.add_edge(
                    site_id,
                    other.id(),
                    site.distance_to(other)
                );
                network.connect(site_id, other.id());
                incidence.push(other.id());
            }
        }

        debug!(
            "Recomputed edges for site {}: {} neighbor(s)",
            site_id,
            incidence.len()
        );
    }

    /// Rederives the whole graph and adjacency view from the active set.
    /// O(n^2); bulk load only.
    pub fn recompute_all(
        &mut self,
        site_map: &IdToSiteMap,
        network: &mut OptimizedNetwork,
    ) {
        self.graph_map.clear();
        network.clear();

        let active_ids = {
            let mut ids: Vec<SiteId> = site_map
                .active_sites()
                .map(Site::id)
                .collect();
            ids.sort_unstable();
            ids
        };

        for site_id in &active_ids {
            self.graph_map.add_node(*site_id);
            network.insert_site(*site_id);
        }

        for (i, a_id) in active_ids.iter().enumerate() {
            let Some(a) = site_map.get(a_id) else { continue };

            for b_id in active_ids.iter().skip(i + 1) {
                let Some(b) = site_map.get(b_id) else { continue };

                if overlaps(a, b) {
                    self.graph_map.add_edge(
                        *a_id,
                        *b_id,
                        a.distance_to(b)
                    );
                    network.connect(*a_id, *b_id);
                }
            }
        }

        debug!(
            "Recomputed all edges: {} site(s), {} edge(s)",
            active_ids.len(),
            self.graph_map.edge_count()
        );
    }
}
