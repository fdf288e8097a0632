use log::{debug, info, warn};

use super::allocator::{
    first_unused_frequency, max_separation_frequency
};
use super::candidates::{
    load_candidates, CandidateRecord, CoverageUnit, LoadError
};
use super::connections::{CoverageGraph, OptimizedNetwork};
use super::mathphysics::{Megahertz, Meter, Point2D, Position};
use super::metrics::{
    evaluate_coverage, evaluate_handover, evaluate_interference,
    NetworkMetrics
};
use super::optimizer::{
    prune_unselected, select_active_set, OptimizeReport
};
use super::radio::Technology;
use super::site::{
    IdToSiteMap, ServiceTier, Site, SiteBuilder, SiteError, SiteId
};


/// Per-site row of the pull visualization snapshot.
#[derive(Clone, Debug)]
pub struct SiteView {
    pub id: SiteId,
    pub position: Point2D,
    pub technology: Technology,
    pub tier: Option<ServiceTier>,
    pub frequency: Option<Megahertz>,
    pub coverage_radius: Meter,
    pub interference_level: f32,
    pub selected: bool,
    pub external_ref: Option<String>,
}

/// Everything the visualization sink consumes: active sites, edges (with
/// in-flight-move edges filtered out), the adjacency export and the
/// current metrics.
#[derive(Clone, Debug, Default)]
pub struct NetworkSnapshot {
    pub sites: Vec<SiteView>,
    pub edges: Vec<(SiteId, SiteId)>,
    pub adjacency: Vec<(SiteId, Vec<SiteId>)>,
    pub metrics: NetworkMetrics,
}


#[derive(Clone, Debug, Default)]
pub struct NetworkModelBuilder {
    candidates: Option<Vec<CandidateRecord>>,
    coverage_units: Option<Vec<CoverageUnit>>,
}

impl NetworkModelBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn set_candidates(
        mut self,
        candidates: Vec<CandidateRecord>
    ) -> Self {
        self.candidates = Some(candidates);
        self
    }

    #[must_use]
    pub fn set_coverage_units(
        mut self,
        coverage_units: Vec<CoverageUnit>
    ) -> Self {
        self.coverage_units = Some(coverage_units);
        self
    }

    /// # Errors
    ///
    /// Will return `Err` if the candidate records fail to load; no
    /// partially built model escapes.
    pub fn build(self) -> Result<NetworkModel, LoadError> {
        let site_map = load_candidates(
            &self.candidates.unwrap_or_default()
        )?;

        let mut model = NetworkModel {
            site_map,
            graph: CoverageGraph::new(),
            network: OptimizedNetwork::new(),
            coverage_units: self.coverage_units.unwrap_or_default(),
            metrics: NetworkMetrics::default(),
        };

        model.graph.recompute_all(&model.site_map, &mut model.network);
        model.allocate_missing_frequencies();

        info!(
            "Loaded {} candidate site(s), {} coverage unit(s)",
            model.site_map.len(),
            model.coverage_units.len()
        );

        Ok(model)
    }
}


/// Owned planning state: the site collection, the derived coverage graph
/// and adjacency view, the coverage-sample units and the last computed
/// metrics. All mutation goes through the operations below, each of
/// which leaves the derived state consistent with the site set.
#[derive(Clone, Debug, Default)]
pub struct NetworkModel {
    site_map: IdToSiteMap,
    graph: CoverageGraph,
    network: OptimizedNetwork,
    coverage_units: Vec<CoverageUnit>,
    metrics: NetworkMetrics,
}

impl NetworkModel {
    #[must_use]
    pub fn site_map(&self) -> &IdToSiteMap {
        &self.site_map
    }

    #[must_use]
    pub fn graph(&self) -> &CoverageGraph {
        &self.graph
    }

    #[must_use]
    pub fn network(&self) -> &OptimizedNetwork {
        &self.network
    }

    #[must_use]
    pub fn metrics(&self) -> NetworkMetrics {
        self.metrics
    }

    #[must_use]
    pub fn site_count(&self) -> usize {
        self.site_map.len()
    }

    /// Runs the tiered selection, patches coverage holes, prunes the
    /// leftovers and refreshes every metric.
    pub fn optimize(&mut self) -> OptimizeReport {
        let mut report = select_active_set(
            &mut self.site_map,
            &mut self.graph,
            &mut self.network
        );

        // Coverage patching may resurrect unselected sites, so it runs
        // before the prune.
        self.metrics.coverage_percent = evaluate_coverage(
            &mut self.site_map,
            &mut self.graph,
            &mut self.network,
            &self.coverage_units
        );
        report.pruned = prune_unselected(
            &mut self.site_map,
            &mut self.graph,
            &mut self.network
        );

        self.metrics.handover_percent =
            evaluate_handover(&self.network);
        self.metrics.interference_percent =
            evaluate_interference(&mut self.site_map);

        report
    }

    /// Inserts an interactively placed site: frequency by maximum
    /// co-channel separation, radius from the propagation model, edges
    /// and metrics refreshed. Nothing changes if the site cannot be
    /// built.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the propagation model rejects the derived
    /// radius computation.
    pub fn add_site(
        &mut self,
        position: Point2D,
        technology: Technology,
    ) -> Result<SiteId, SiteError> {
        let frequency = max_separation_frequency(
            &position,
            technology,
            &self.site_map
        );

        // Building the site performs every fallible step; the model is
        // only touched afterwards.
        let site_id = self.site_map.next_free_id();
        let site = SiteBuilder::new()
            .set_position(position)
            .set_technology(technology)
            .set_tier(ServiceTier::Custom)
            .set_frequency(frequency)
            .set_active(true)
            .build(site_id)?;

        let _ = self.site_map.insert(site);
        self.graph.recompute_for(
            site_id,
            &self.site_map,
            &mut self.network
        );
        self.adopt_derived_overlaps(site_id);
        self.refresh_metrics();

        info!(
            "Added {technology} site {site_id} at {frequency} MHz"
        );

        Ok(site_id)
    }

    /// Repositions a site and rebuilds its edges and the metrics. The
    /// interactive drag applies intermediate positions through
    /// [`Self::set_position_only`] and calls this once on confirmation.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the site is unknown.
    pub fn apply_move(
        &mut self,
        site_id: SiteId,
        position: Point2D,
    ) -> Result<(), UnknownSite> {
        self.set_position_only(site_id, position)?;

        self.graph.recompute_for(
            site_id,
            &self.site_map,
            &mut self.network
        );
        self.adopt_derived_overlaps(site_id);
        self.refresh_metrics();

        debug!("Moved site {site_id}");

        Ok(())
    }

    /// Position update without derived-state recomputation, for
    /// in-flight drags only.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the site is unknown.
    pub fn set_position_only(
        &mut self,
        site_id: SiteId,
        position: Point2D,
    ) -> Result<(), UnknownSite> {
        match self.site_map.get_mut(&site_id) {
            Some(site) => {
                site.set_position(position);
                Ok(())
            }
            None => Err(UnknownSite(site_id)),
        }
    }

    /// Removes a site together with its edges, its adjacency entry and
    /// every appearance in other neighbor sets, then refreshes metrics.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the site is unknown.
    pub fn delete_site(
        &mut self,
        site_id: SiteId
    ) -> Result<(), UnknownSite> {
        if self.site_map.remove(&site_id).is_none() {
            return Err(UnknownSite(site_id));
        }

        self.graph.remove_site(site_id);
        self.network.remove_site(site_id);
        for site in self.site_map.sites_mut() {
            if site.overlaps().contains(&site_id) {
                let overlaps = site
                    .overlaps()
                    .iter()
                    .copied()
                    .filter(|overlap_id| *overlap_id != site_id)
                    .collect();
                site.set_overlaps(overlaps);
            }
        }
        self.refresh_metrics();

        info!("Deleted site {site_id} and updated network");

        Ok(())
    }

    /// Recomputes all three health metrics against the current state.
    pub fn refresh_metrics(&mut self) {
        self.metrics.coverage_percent = evaluate_coverage(
            &mut self.site_map,
            &mut self.graph,
            &mut self.network,
            &self.coverage_units
        );
        self.metrics.handover_percent =
            evaluate_handover(&self.network);
        self.metrics.interference_percent =
            evaluate_interference(&mut self.site_map);
    }

    /// Pull snapshot for the visualization sink. Edges touching
    /// `hidden_site` are filtered (used while a move is in flight);
    /// `selected_site` marks the operator selection.
    #[must_use]
    pub fn snapshot(
        &self,
        hidden_site: Option<SiteId>,
        selected_site: Option<SiteId>,
    ) -> NetworkSnapshot {
        let mut sites: Vec<SiteView> = self.site_map
            .active_sites()
            .map(|site| SiteView {
                id: site.id(),
                position: *site.position(),
                technology: site.technology(),
                tier: site.tier(),
                frequency: site.frequency(),
                coverage_radius: site.coverage_radius(),
                interference_level: site.interference_level(),
                selected: selected_site == Some(site.id()),
                external_ref: site
                    .external_ref()
                    .map(str::to_string),
            })
            .collect();
        sites.sort_unstable_by_key(|view| view.id);

        let edges = self.graph
            .edges()
            .into_iter()
            .filter(|(a, b)|
                hidden_site != Some(*a) && hidden_site != Some(*b)
            )
            .collect();

        NetworkSnapshot {
            sites,
            edges,
            adjacency: self.network.to_adjacency(),
            metrics: self.metrics,
        }
    }

    // Bulk pass of the pool-exhaustion coloring over sites the candidate
    // source left without a frequency.
    fn allocate_missing_frequencies(&mut self) {
        let unassigned: Vec<SiteId> = self.site_map
            .sorted_ids()
            .into_iter()
            .filter(|site_id|
                self.site_map
                    .get(site_id)
                    .is_some_and(|site| site.frequency().is_none())
            )
            .collect();

        for site_id in unassigned {
            let Some(frequency) = first_unused_frequency(
                site_id,
                &self.graph,
                &self.site_map
            ) else {
                warn!(
                    "Frequency pool exhausted around site {site_id}; \
                     left unassigned"
                );
                continue;
            };

            let assignment = self.site_map
                .get_mut(&site_id)
                .map(|site| site.set_frequency(frequency));
            match assignment {
                Some(Ok(())) => {
                    // The radius changed with the assignment.
                    self.graph.recompute_for(
                        site_id,
                        &self.site_map,
                        &mut self.network
                    );
                }
                Some(Err(error)) => warn!(
                    "Skipping frequency assignment for site \
                     {site_id}: {error}"
                ),
                None => {}
            }
        }
    }

    // Keeps the declared overlap list of a freshly placed or moved site
    // in sync with its derived neighbors, as the interactive editor in
    // the source system did.
    fn adopt_derived_overlaps(&mut self, site_id: SiteId) {
        let neighbor_ids = self.network
            .neighbors(site_id)
            .map(|neighbors| neighbors.iter().copied().collect())
            .unwrap_or_default();

        if let Some(site) = self.site_map.get_mut(&site_id) {
            site.set_overlaps(neighbor_ids);
        }
    }
}


#[derive(Debug, thiserror::Error)]
#[error("Unknown site {0}")]
pub struct UnknownSite(pub SiteId);
