use std::fmt;

use log::{info, warn};

use super::candidates::CoverageUnit;
use super::connections::{CoverageGraph, OptimizedNetwork};
use super::mathphysics::Position;
use super::site::IdToSiteMap;


// A coverage unit whose own covered fraction falls below this triggers
// force-activation of its associated site.
pub const COVERAGE_PATCH_THRESHOLD: f32 = 0.80;


#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NetworkMetrics {
    pub coverage_percent: f32,
    pub handover_percent: f32,
    pub interference_percent: f32,
}

impl fmt::Display for NetworkMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Coverage Level: {:.2}%", self.coverage_percent)?;
        writeln!(f, "Handover Level: {:.2}%", self.handover_percent)?;
        write!(
            f,
            "Interference Level: {:.2}%",
            self.interference_percent
        )
    }
}


/// Share of sample vertices within reach of at least one active site.
///
/// Units whose own covered fraction falls below the patching threshold
/// get their associated candidate site force-activated and wired into the
/// network, and their covered count corrected up to the full sample count
/// (never down).
pub fn evaluate_coverage(
    site_map: &mut IdToSiteMap,
    graph: &mut CoverageGraph,
    network: &mut OptimizedNetwork,
    coverage_units: &[CoverageUnit],
) -> f32 {
    let mut total_vertices = 0usize;
    let mut covered_vertices = 0usize;

    for unit in coverage_units {
        if unit.samples.is_empty() {
            warn!("Coverage unit {} has no sample points", unit.id);
            continue;
        }

        let unit_covered = unit.samples
            .iter()
            .filter(|sample|
                site_map
                    .active_sites()
                    .any(|site| site.covers(sample))
            )
            .count();

        total_vertices += unit.samples.len();
        covered_vertices += unit_covered;

        let fraction = unit_covered as f32 / unit.samples.len() as f32;
        if fraction >= COVERAGE_PATCH_THRESHOLD {
            continue;
        }

        // Patch the hole with the unit's own candidate site, assuming
        // full local coverage afterwards.
        let Some(site) = site_map.get_mut(&unit.id) else {
            warn!(
                "Coverage unit {} below threshold but has no \
                 candidate site",
                unit.id
            );
            continue;
        };

        site.set_active(true);
        graph.recompute_for(unit.id, site_map, network);

        covered_vertices -= unit_covered;
        covered_vertices += unit.samples.len();

        info!("Coverage patching selected site: {}", unit.id);
    }

    if total_vertices == 0 {
        warn!("No coverage sample points; reporting 0% coverage");
        return 0.0;
    }

    covered_vertices as f32 / total_vertices as f32 * 100.0
}

/// Share of active sites with at least one handover neighbor.
#[must_use]
pub fn evaluate_handover(network: &OptimizedNetwork) -> f32 {
    if network.is_empty() {
        warn!("No active sites; reporting 0% handover");
        return 0.0;
    }

    network.connected_count() as f32 / network.len() as f32 * 100.0
}

/// Mean per-site co-channel interference over the active set. Stores
/// each site's accumulated level as a side effect.
pub fn evaluate_interference(site_map: &mut IdToSiteMap) -> f32 {
    let levels: Vec<(u32, f32)> = site_map
        .active_sites()
        .map(|site| {
            let threshold = site.technology().reuse_threshold();

            let level = site_map
                .active_sites()
                .filter(|other| other.id() != site.id())
                .filter(|other|
                    other.frequency().is_some()
                        && other.frequency() == site.frequency()
                )
                .map(|other| site.distance_to(other))
                .filter(|distance| *distance < threshold)
                .map(|distance| ((threshold - distance) / threshold) / 2.0)
                .sum();

            (site.id(), level)
        })
        .collect();

    if levels.is_empty() {
        warn!("No active sites; reporting 0% interference");
        return 0.0;
    }

    let mut level_sum = 0.0;
    for (site_id, level) in &levels {
        if let Some(site) = site_map.get_mut(site_id) {
            site.set_interference_level(*level);
        }
        level_sum += level;
    }

    level_sum / levels.len() as f32 * 100.0
}
