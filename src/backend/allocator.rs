use std::collections::HashSet;

use log::debug;

use super::connections::CoverageGraph;
use super::mathphysics::{Megahertz, Meter, Point2D, Position};
use super::radio::Technology;
use super::site::{IdToSiteMap, SiteId};


/// Pool-exhaustion coloring: the first pool frequency not used by any
/// graph-adjacent site of the same technology, or `None` when the whole
/// pool is taken. Bulk-allocation policy.
#[must_use]
pub fn first_unused_frequency(
    site_id: SiteId,
    graph: &CoverageGraph,
    site_map: &IdToSiteMap,
) -> Option<Megahertz> {
    let site = site_map.get(&site_id)?;

    let used: HashSet<Megahertz> = graph
        .neighbor_ids(site_id)
        .iter()
        .filter_map(|neighbor_id| site_map.get(neighbor_id))
        .filter(|neighbor| neighbor.technology() == site.technology())
        .filter_map(|neighbor| neighbor.frequency())
        .collect();

    site.technology()
        .frequency_pool()
        .iter()
        .find(|frequency| !used.contains(frequency))
        .copied()
}

/// Farthest-neighbor policy for interactive placement: the pool frequency
/// whose nearest active same-technology emitter is farthest from the
/// candidate position (unused frequencies count as infinitely far). Ties
/// break by pool order.
#[must_use]
pub fn max_separation_frequency(
    position: &Point2D,
    technology: Technology,
    site_map: &IdToSiteMap,
) -> Megahertz {
    let pool = technology.frequency_pool();

    let mut best_frequency = pool[0];
    let mut best_separation = Meter::NEG_INFINITY;

    for frequency in pool {
        let separation = site_map
            .active_sites()
            .filter(|site| site.technology() == technology)
            .filter(|site| site.frequency() == Some(*frequency))
            .map(|site| position.distance_to(site))
            .fold(Meter::INFINITY, Meter::min);

        debug!("{frequency} MHz: nearest co-channel at {separation} m");

        if separation > best_separation {
            best_separation = separation;
            best_frequency = *frequency;
        }
    }

    debug!("Choice: {best_frequency} MHz");

    best_frequency
}
