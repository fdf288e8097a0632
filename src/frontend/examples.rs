use std::f32::consts::TAU;

use rand::prelude::*;

use crate::backend::candidates::{CandidateRecord, CoverageUnit};
use crate::backend::mathphysics::{Kilometer, Meter, Point2D};
use crate::backend::site::SiteId;


// Island demo layout: two staggered rows of hexagonal population cells,
// one candidate tower per cell.
const ROW_SPACING: Meter    = 4_000.0;
const COLUMN_SPACING: Meter = 4_000.0;
const HEX_RING_RADIUS: Meter = 2_000.0;

const UMTS_COVERAGE_KM: Kilometer = 4.2;
const LTE_COVERAGE_KM: Kilometer  = 2.1;

// Random scenario bounds, meters.
const AREA_SIDE: f32 = 20_000.0;

const RANDOM_TIERS: [&str; 5] =
    ["Critical", "Priority", "Enhanced", "Basic", "Trivial"];


fn hex_ring(center: Point2D, radius: Meter) -> Vec<Point2D> {
    // Closed exterior ring: six corners plus the repeated first vertex.
    let mut ring: Vec<Point2D> = (0..6)
        .map(|corner| {
            let angle = TAU * corner as f32 / 6.0;

            Point2D::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            )
        })
        .collect();
    ring.push(ring[0]);

    ring
}

fn island_record(
    id: SiteId,
    position: Point2D,
    technology: &str,
    tier: &str,
    frequency: u32,
    coverage_km: Kilometer,
    overlaps: &str,
) -> CandidateRecord {
    CandidateRecord {
        id: id.to_string(),
        position,
        technology: technology.to_string(),
        tier: tier.to_string(),
        frequency: Some(frequency),
        coverage_km: Some(coverage_km),
        overlaps: Some(overlaps.to_string()),
    }
}


/// Hand-laid island scenario: eight candidate towers over eight
/// hexagonal population cells, with precomputed coverage and declared
/// overlap lists the way a surveyed candidate layer carries them, plus
/// one unplanned relay with an opaque identifier.
#[must_use]
pub fn island_scenario() -> (Vec<CandidateRecord>, Vec<CoverageUnit>) {
    let centers = [
        Point2D::new(2_000.0, 2_000.0),
        Point2D::new(2_000.0 + COLUMN_SPACING, 2_000.0),
        Point2D::new(2_000.0 + 2.0 * COLUMN_SPACING, 2_000.0),
        Point2D::new(2_000.0 + 3.0 * COLUMN_SPACING, 2_000.0),
        Point2D::new(4_000.0, 2_000.0 + ROW_SPACING),
        Point2D::new(4_000.0 + COLUMN_SPACING, 2_000.0 + ROW_SPACING),
        Point2D::new(
            4_000.0 + 2.0 * COLUMN_SPACING,
            2_000.0 + ROW_SPACING
        ),
        Point2D::new(
            4_000.0 + 3.0 * COLUMN_SPACING,
            2_000.0 + ROW_SPACING
        ),
    ];

    let records = vec![
        island_record(
            1, centers[0], "3G", "Critical", 950,
            UMTS_COVERAGE_KM, "2,5"
        ),
        island_record(
            2, centers[1], "4G", "Priority", 2_100,
            LTE_COVERAGE_KM, "1,3,5"
        ),
        island_record(
            3, centers[2], "3G", "Enhanced", 925,
            UMTS_COVERAGE_KM, "2,4,6,7"
        ),
        island_record(
            4, centers[3], "4G", "Basic", 2_050,
            LTE_COVERAGE_KM, "3,7"
        ),
        island_record(
            5, centers[4], "3G", "Priority", 900,
            UMTS_COVERAGE_KM, "1,2,6"
        ),
        island_record(
            6, centers[5], "4G", "Trivial", 2_000,
            LTE_COVERAGE_KM, "3,5,7"
        ),
        // Co-channel with site 5 on purpose: the pair sits within the
        // UMTS reuse threshold and registers as interference.
        island_record(
            7, centers[6], "3G", "Basic", 900,
            UMTS_COVERAGE_KM, "3,4,6,8"
        ),
        // Legacy tier label from older candidate exports.
        island_record(
            8, centers[7], "4G", "Necessary", 1_950,
            LTE_COVERAGE_KM, "7"
        ),
        // Unplanned relay: opaque id, no resolvable tier.
        CandidateRecord {
            id: "RELAY-A".to_string(),
            position: Point2D::new(10_000.0, 12_000.0),
            technology: "3G".to_string(),
            tier: "Unplanned".to_string(),
            frequency: Some(875),
            coverage_km: Some(UMTS_COVERAGE_KM),
            overlaps: None,
        },
    ];

    let coverage_units = centers
        .iter()
        .enumerate()
        .map(|(index, center)| CoverageUnit {
            id: index as SiteId + 1,
            samples: hex_ring(*center, HEX_RING_RADIUS),
        })
        .collect();

    (records, coverage_units)
}

/// Uniformly scattered candidates over a 20 km x 20 km area, half per
/// technology, with no preassigned frequencies: bulk loading colors
/// them. Deterministic for a fixed seed.
#[must_use]
pub fn random_scenario(
    sites_per_technology: u32,
    seed: u64
) -> Vec<CandidateRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut records = Vec::new();

    for index in 0..sites_per_technology * 2 {
        let technology = if index % 2 == 0 { "3G" } else { "4G" };
        let tier = RANDOM_TIERS[index as usize % RANDOM_TIERS.len()];
        let position = Point2D::new(
            rng.gen_range(0.0..AREA_SIDE),
            rng.gen_range(0.0..AREA_SIDE),
        );

        records.push(CandidateRecord {
            id: (index + 1).to_string(),
            position,
            technology: technology.to_string(),
            tier: tier.to_string(),
            frequency: None,
            coverage_km: None,
            overlaps: None,
        });
    }

    records
}


#[cfg(test)]
mod tests {
    use crate::backend::networkmodel::NetworkModelBuilder;

    use super::*;


    #[test]
    fn hex_ring_is_closed_with_seven_vertices() {
        let ring = hex_ring(Point2D::new(1_000.0, 1_000.0), 500.0);

        assert_eq!(7, ring.len());
        assert_eq!(ring[0], ring[6]);
    }

    #[test]
    fn island_scenario_loads_cleanly() {
        let (records, coverage_units) = island_scenario();

        let model = NetworkModelBuilder::new()
            .set_candidates(records)
            .set_coverage_units(coverage_units)
            .build()
            .unwrap_or_else(|error| panic!("{}", error));

        // Eight towers plus the opaque-id relay.
        assert_eq!(9, model.site_count());
        assert!(
            model
                .site_map()
                .get(&9)
                .expect("Missing site")
                .external_ref()
                .is_some()
        );
    }

    #[test]
    fn island_optimization_keeps_the_network_connected() {
        let (records, coverage_units) = island_scenario();
        let mut model = NetworkModelBuilder::new()
            .set_candidates(records)
            .set_coverage_units(coverage_units)
            .build()
            .unwrap_or_else(|error| panic!("{}", error));

        model.optimize();

        let metrics = model.metrics();
        assert_eq!(100.0, metrics.coverage_percent);
        assert_eq!(100.0, metrics.handover_percent);
        // Sites 5 and 7 share 900 MHz within the reuse threshold.
        assert!(metrics.interference_percent > 0.0);

        // The untiered relay never survives optimization.
        assert!(!model.site_map().contains(&9));
    }

    #[test]
    fn random_scenario_is_deterministic_per_seed() {
        let first = random_scenario(10, 42);
        let second = random_scenario(10, 42);

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.position, b.position);
            assert_eq!(a.tier, b.tier);
        }
    }
}
