use log::warn;
use thiserror::Error;

use super::mathphysics::{
    km_to_meters, Kilometer, Megahertz, Point2D
};
use super::radio::Technology;
use super::site::{
    IdToSiteMap, ServiceTier, Site, SiteBuilder, SiteError, SiteId
};


#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Duplicate site identifier {0}")]
    DuplicateId(SiteId),
    #[error("Unknown technology tag `{0}`")]
    UnknownTechnology(String),
    #[error("Site construction failed with error `{0}`")]
    Site(#[from] SiteError),
}


/// One row of the external candidate source. Identifiers and tags arrive
/// as raw text; the loader applies the tolerances below.
#[derive(Clone, Debug)]
pub struct CandidateRecord {
    pub id: String,
    pub position: Point2D,
    pub technology: String,
    pub tier: String,
    pub frequency: Option<Megahertz>,
    pub coverage_km: Option<Kilometer>,
    pub overlaps: Option<String>,
}

/// A logical coverage unit: an identifier shared with its candidate site
/// and a fixed ring of geographic sample points.
#[derive(Clone, Debug)]
pub struct CoverageUnit {
    pub id: SiteId,
    pub samples: Vec<Point2D>,
}


/// Builds the site map from raw candidate records.
///
/// Tolerances: a non-integer identifier is kept opaquely as an external
/// reference and assigned the next free numeric id; a missing overlap
/// list is treated as empty; an unresolvable tier is kept unset (the
/// optimizer skips such sites). Loaded sites start active.
///
/// # Errors
///
/// Will return `Err` on a duplicate numeric identifier, an unknown
/// technology tag, or a frequency outside its technology pool; the load
/// aborts and no partial state is returned.
pub fn load_candidates(
    records: &[CandidateRecord]
) -> Result<IdToSiteMap, LoadError> {
    let mut site_map = IdToSiteMap::new();
    let mut opaque_records = Vec::new();

    for record in records {
        match record.id.trim().parse::<SiteId>() {
            Ok(site_id) => {
                if site_map.contains(&site_id) {
                    return Err(LoadError::DuplicateId(site_id));
                }

                let site = build_site(record, site_id, None)?;
                let _ = site_map.insert(site);
            }
            Err(_) => opaque_records.push(record),
        }
    }

    // Opaque identifiers are numbered after every explicit id is known.
    for record in opaque_records {
        let site_id = site_map.next_free_id();
        let site = build_site(
            record,
            site_id,
            Some(record.id.clone())
        )?;

        warn!(
            "Candidate id `{}` is not numeric; assigned id {}",
            record.id,
            site_id
        );
        let _ = site_map.insert(site);
    }

    Ok(site_map)
}

/// Comma-separated neighbor identifiers; blanks and non-numeric entries
/// are dropped.
#[must_use]
pub fn parse_overlap_list(raw: &str) -> Vec<SiteId> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| match entry.parse::<SiteId>() {
            Ok(site_id) => Some(site_id),
            Err(_) => {
                warn!("Skipping non-numeric overlap entry `{entry}`");
                None
            }
        })
        .collect()
}


fn build_site(
    record: &CandidateRecord,
    site_id: SiteId,
    external_ref: Option<String>,
) -> Result<Site, LoadError> {
    let Some(technology) = Technology::parse_tag(&record.technology)
    else {
        return Err(
            LoadError::UnknownTechnology(record.technology.clone())
        );
    };

    let mut builder = SiteBuilder::new()
        .set_position(record.position)
        .set_technology(technology)
        .set_active(true);

    match ServiceTier::parse_tag(&record.tier) {
        Some(tier) => builder = builder.set_tier(tier),
        None => warn!(
            "Candidate {} has unresolvable service tier `{}`",
            record.id,
            record.tier
        ),
    }

    if let Some(frequency) = record.frequency {
        builder = builder.set_frequency(frequency);
    }
    if let Some(coverage_km) = record.coverage_km {
        builder = builder.set_coverage_radius(km_to_meters(coverage_km));
    }
    if let Some(raw_overlaps) = &record.overlaps {
        builder = builder.set_overlaps(parse_overlap_list(raw_overlaps));
    }
    if let Some(external_ref) = external_ref {
        builder = builder.set_external_ref(external_ref);
    }

    Ok(builder.build(site_id)?)
}
