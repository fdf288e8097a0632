use log::{debug, info};

use super::connections::{CoverageGraph, OptimizedNetwork};
use super::mathphysics::Position;
use super::site::{IdToSiteMap, ServiceTier, Site, SiteId};


// Tier passes run most-demanding first; Basic and Trivial share the last
// pass, as in the candidate source conventions.
const SELECTION_PASSES: [&[ServiceTier]; 4] = [
    &[ServiceTier::Critical],
    &[ServiceTier::Priority],
    &[ServiceTier::Enhanced],
    &[ServiceTier::Basic, ServiceTier::Trivial],
];

// Gap-fill scans the unselected pool cheapest tier first.
const GAP_FILL_ORDER: [ServiceTier; 4] = [
    ServiceTier::Trivial,
    ServiceTier::Basic,
    ServiceTier::Enhanced,
    ServiceTier::Priority,
];


#[derive(Clone, Debug, Default)]
pub struct OptimizeReport {
    pub selected: Vec<SiteId>,
    pub gap_filled: Vec<SiteId>,
    pub pruned: Vec<SiteId>,
}


/// Selects the tiered minimal active set and restores handover paths for
/// isolated picks. Rebuilds the graph and adjacency view around the new
/// active set; pruning is a separate pass so coverage patching can run
/// in between.
pub fn select_active_set(
    site_map: &mut IdToSiteMap,
    graph: &mut CoverageGraph,
    network: &mut OptimizedNetwork,
) -> OptimizeReport {
    let selected = tiered_selection(site_map);

    for site in site_map.sites_mut() {
        site.set_active(selected.contains(&site.id()));
    }
    graph.recompute_all(site_map, network);

    let gap_filled = fill_handover_gaps(site_map, graph, network);

    info!(
        "Optimization selected {} site(s), gap-filled {}",
        selected.len(),
        gap_filled.len()
    );

    OptimizeReport {
        selected,
        gap_filled,
        pruned: Vec::new(),
    }
}

/// Deletes every site the optimization left inactive, with its edges and
/// adjacency entries.
pub fn prune_unselected(
    site_map: &mut IdToSiteMap,
    graph: &mut CoverageGraph,
    network: &mut OptimizedNetwork,
) -> Vec<SiteId> {
    let pruned: Vec<SiteId> = site_map
        .sorted_ids()
        .into_iter()
        .filter(|site_id| !network.contains(*site_id))
        .collect();

    for site_id in &pruned {
        let _ = site_map.remove(site_id);
        graph.remove_site(*site_id);
        network.remove_site(*site_id);
    }

    info!("Pruned {} unselected site(s)", pruned.len());

    pruned
}


// Critical candidates are taken unconditionally; every later pass takes a
// candidate only if no already-selected site covers its position.
fn tiered_selection(site_map: &IdToSiteMap) -> Vec<SiteId> {
    let sorted_ids = site_map.sorted_ids();
    let mut selected: Vec<SiteId> = Vec::new();

    for (pass_index, pass_tiers) in SELECTION_PASSES.iter().enumerate() {
        for site_id in &sorted_ids {
            let Some(site) = site_map.get(site_id) else { continue };
            let Some(tier) = site.tier() else {
                if pass_index == 0 {
                    debug!(
                        "Site {} has no resolvable tier; skipping \
                         tier-based selection",
                        site_id
                    );
                }
                continue;
            };
            if !pass_tiers.contains(&tier) {
                continue;
            }

            if pass_index == 0 || !dominated(site, &selected, site_map) {
                selected.push(*site_id);
            }
        }
    }

    selected
}

// A candidate is dominated when its position already lies within the
// coverage radius of a selected site.
fn dominated(
    candidate: &Site,
    selected: &[SiteId],
    site_map: &IdToSiteMap
) -> bool {
    selected
        .iter()
        .filter_map(|site_id| site_map.get(site_id))
        .any(|site| {
            candidate.distance_to(site) < site.coverage_radius()
        })
}

// Every selected-but-isolated site activates the first unselected
// neighbor from its declared overlap list, scanning cheapest tier first.
fn fill_handover_gaps(
    site_map: &mut IdToSiteMap,
    graph: &mut CoverageGraph,
    network: &mut OptimizedNetwork,
) -> Vec<SiteId> {
    let mut gap_filled = Vec::new();

    for isolated_id in network.ids() {
        if !network.is_isolated(isolated_id) {
            continue;
        }

        let overlap_list = match site_map.get(&isolated_id) {
            Some(site) => site.overlaps().to_vec(),
            None => continue,
        };

        let fill_id = GAP_FILL_ORDER
            .iter()
            .find_map(|tier| {
                overlap_list
                    .iter()
                    .copied()
                    .find(|site_id| {
                        !network.contains(*site_id)
                            && site_map
                                .get(site_id)
                                .and_then(Site::tier)
                                == Some(*tier)
                    })
            });

        let Some(fill_id) = fill_id else { continue };

        if let Some(fill_site) = site_map.get_mut(&fill_id) {
            fill_site.set_active(true);
        }
        graph.recompute_for(fill_id, site_map, network);

        info!(
            "Gap-fill activated site {} for isolated site {}",
            fill_id,
            isolated_id
        );
        gap_filled.push(fill_id);
    }

    gap_filled
}


#[cfg(test)]
mod tests {
    use crate::backend::mathphysics::{Meter, Point2D};
    use crate::backend::radio::Technology;
    use crate::backend::site::SiteBuilder;

    use super::*;


    fn candidate(
        id: SiteId,
        x: f32,
        y: f32,
        tier: ServiceTier,
        coverage_radius: Meter,
        overlaps: &[SiteId],
    ) -> Site {
        SiteBuilder::new()
            .set_position(Point2D::new(x, y))
            .set_technology(Technology::Umts)
            .set_frequency(900)
            .set_tier(tier)
            .set_coverage_radius(coverage_radius)
            .set_overlaps(overlaps.to_vec())
            .set_active(true)
            .build(id)
            .unwrap_or_else(|error| panic!("{}", error))
    }

    fn run_selection(
        site_map: &mut IdToSiteMap
    ) -> (CoverageGraph, OptimizedNetwork, OptimizeReport) {
        let mut graph = CoverageGraph::new();
        let mut network = OptimizedNetwork::new();

        let report = select_active_set(site_map, &mut graph, &mut network);

        (graph, network, report)
    }


    #[test]
    fn critical_sites_are_selected_unconditionally() {
        // Both critical sites sit inside each other's coverage; the
        // dominance test must not apply to them.
        let mut site_map = IdToSiteMap::from([
            candidate(1, 0.0, 0.0, ServiceTier::Critical, 2_000.0, &[]),
            candidate(2, 500.0, 0.0, ServiceTier::Critical, 2_000.0, &[]),
        ]);

        let (_, network, report) = run_selection(&mut site_map);

        assert_eq!(vec![1, 2], report.selected);
        assert!(network.contains(1) && network.contains(2));
    }

    #[test]
    fn dominated_lower_tier_site_is_skipped() {
        let mut site_map = IdToSiteMap::from([
            candidate(1, 0.0, 0.0, ServiceTier::Critical, 2_000.0, &[]),
            // Inside site 1's radius: dominated.
            candidate(2, 1_000.0, 0.0, ServiceTier::Priority, 2_000.0, &[]),
            // Outside every selected radius: kept.
            candidate(3, 5_000.0, 0.0, ServiceTier::Priority, 2_000.0, &[]),
        ]);

        let (_, network, report) = run_selection(&mut site_map);

        assert_eq!(vec![1, 3], report.selected);
        assert!(!network.contains(2));
        assert!(
            !site_map
                .get(&2)
                .expect("Missing site")
                .is_active()
        );
    }

    #[test]
    fn tiers_are_selected_in_priority_order() {
        // An Enhanced site dominating a Priority position must not block
        // it: Priority passes run first.
        let mut site_map = IdToSiteMap::from([
            candidate(5, 0.0, 0.0, ServiceTier::Enhanced, 3_000.0, &[]),
            candidate(6, 1_000.0, 0.0, ServiceTier::Priority, 3_000.0, &[]),
        ]);

        let (_, _, report) = run_selection(&mut site_map);

        // The Priority site wins its pass, then dominates the Enhanced.
        assert_eq!(vec![6], report.selected);
    }

    #[test]
    fn untiered_sites_never_enter_selection() {
        let untiered = SiteBuilder::new()
            .set_position(Point2D::new(9_000.0, 9_000.0))
            .set_technology(Technology::Umts)
            .set_frequency(900)
            .set_coverage_radius(1_000.0)
            .set_active(true)
            .build(4)
            .unwrap_or_else(|error| panic!("{}", error));
        let mut site_map = IdToSiteMap::from([
            candidate(1, 0.0, 0.0, ServiceTier::Critical, 2_000.0, &[]),
            untiered,
        ]);

        let (_, network, report) = run_selection(&mut site_map);

        assert_eq!(vec![1], report.selected);
        assert!(!network.contains(4));
    }

    #[test]
    fn isolated_site_pulls_in_declared_neighbor() {
        // Site 1 is selected alone and isolated; its declared overlap 3
        // is a Trivial candidate nearby that gap-fill must activate.
        let mut site_map = IdToSiteMap::from([
            candidate(1, 0.0, 0.0, ServiceTier::Critical, 2_000.0, &[3]),
            candidate(3, 1_000.0, 0.0, ServiceTier::Trivial, 2_000.0, &[1]),
        ]);

        let (graph, network, report) = run_selection(&mut site_map);

        assert_eq!(vec![3], report.gap_filled);
        assert!(network.contains(3));
        assert!(graph.contains_edge(1, 3));
        assert!(!network.is_isolated(1));
    }

    #[test]
    fn gap_fill_prefers_cheapest_tier() {
        let mut site_map = IdToSiteMap::from([
            candidate(1, 0.0, 0.0, ServiceTier::Critical, 2_000.0, &[2, 3]),
            // Higher-need neighbor with a lower id...
            candidate(2, 900.0, 0.0, ServiceTier::Priority, 2_000.0, &[1]),
            // ...loses to the Trivial neighbor.
            candidate(3, 1_000.0, 0.0, ServiceTier::Trivial, 2_000.0, &[1]),
        ]);

        let (_, _, report) = run_selection(&mut site_map);

        assert_eq!(vec![3], report.gap_filled);
    }

    #[test]
    fn prune_removes_everything_unselected() {
        let mut site_map = IdToSiteMap::from([
            candidate(1, 0.0, 0.0, ServiceTier::Critical, 2_000.0, &[]),
            candidate(2, 1_000.0, 0.0, ServiceTier::Priority, 2_000.0, &[]),
            candidate(3, 20_000.0, 0.0, ServiceTier::Trivial, 2_000.0, &[]),
        ]);
        let mut graph = CoverageGraph::new();
        let mut network = OptimizedNetwork::new();

        select_active_set(&mut site_map, &mut graph, &mut network);
        let pruned = prune_unselected(
            &mut site_map,
            &mut graph,
            &mut network
        );

        assert_eq!(vec![2], pruned);
        assert!(!site_map.contains(&2));
        assert!(!graph.contains_site(2));
        assert!(!network.contains(2));
        for (_, neighbors) in network.to_adjacency() {
            assert!(!neighbors.contains(&2));
        }
    }

    #[test]
    fn selection_is_deterministic() {
        let build_map = || IdToSiteMap::from([
            candidate(4, 0.0, 0.0, ServiceTier::Critical, 2_500.0, &[7]),
            candidate(7, 1_200.0, 0.0, ServiceTier::Trivial, 2_500.0, &[4]),
            candidate(9, 6_000.0, 0.0, ServiceTier::Priority, 2_500.0, &[]),
            candidate(11, 6_500.0, 0.0, ServiceTier::Basic, 2_500.0, &[]),
        ]);

        let mut first_map = build_map();
        let mut second_map = build_map();

        let (_, first_network, first_report) =
            run_selection(&mut first_map);
        let (_, second_network, second_report) =
            run_selection(&mut second_map);

        assert_eq!(first_report.selected, second_report.selected);
        assert_eq!(first_report.gap_filled, second_report.gap_filled);
        assert_eq!(
            first_network.to_adjacency(),
            second_network.to_adjacency()
        );
    }
}
