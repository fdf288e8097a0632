use log::info;
use thiserror::Error;

use super::mathphysics::{Meter, Point2D, Position};
use super::networkmodel::{NetworkModel, NetworkSnapshot};
use super::optimizer::OptimizeReport;
use super::radio::Technology;
use super::site::{SiteError, SiteId};


// Selection hit radius around a pressed point.
const HIT_RADIUS: Meter = 300.0;


#[derive(Debug, Error)]
pub enum EditError {
    #[error("Unknown site {0}")]
    UnknownSite(SiteId),
    #[error("Another move is already in progress")]
    MoveInProgress,
    #[error("No move is in progress")]
    NoMoveInProgress,
    #[error("Site operation failed with error `{0}`")]
    Site(#[from] SiteError),
}


/// Outcome of a delete request; asking with nothing selected is a
/// reportable no-op, not an error.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DeleteOutcome {
    Deleted(SiteId),
    NothingToDelete,
}


#[derive(Clone, Copy, Debug, Default, PartialEq)]
enum DragState {
    #[default]
    Idle,
    Dragging {
        site_id: SiteId,
        last_position: Point2D,
    },
}


/// Single-owner editing session over a network model. Every operation
/// runs to completion and leaves the derived state consistent before the
/// next one is accepted.
#[derive(Clone, Debug, Default)]
pub struct EditSession {
    model: NetworkModel,
    selected: Option<SiteId>,
    drag: DragState,
}

impl EditSession {
    #[must_use]
    pub fn new(model: NetworkModel) -> Self {
        Self {
            model,
            selected: None,
            drag: DragState::Idle,
        }
    }

    #[must_use]
    pub fn model(&self) -> &NetworkModel {
        &self.model
    }

    #[must_use]
    pub fn selected(&self) -> Option<SiteId> {
        self.selected
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    /// Marks the site closest to the pressed point as selected, within
    /// the hit radius.
    pub fn select_at(&mut self, point: Point2D) -> Option<SiteId> {
        let hit = self.model
            .site_map()
            .active_sites()
            .map(|site| (site.id(), site.distance_to(&point)))
            .filter(|(_, distance)| *distance <= HIT_RADIUS)
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(site_id, _)| site_id);

        self.selected = hit;

        hit
    }

    /// # Errors
    ///
    /// Will return `Err` if the site is unknown.
    pub fn select(&mut self, site_id: SiteId) -> Result<(), EditError> {
        if !self.model.site_map().contains(&site_id) {
            return Err(EditError::UnknownSite(site_id));
        }

        self.selected = Some(site_id);

        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// # Errors
    ///
    /// Will return `Err` if the new site cannot be built; the model is
    /// left untouched in that case.
    pub fn add(
        &mut self,
        position: Point2D,
        technology: Technology,
    ) -> Result<SiteId, EditError> {
        Ok(self.model.add_site(position, technology)?)
    }

    /// `Idle -> Dragging`: selects the site and starts tracking its
    /// position. Edges touching it stay in the model but disappear from
    /// snapshots until the move is confirmed.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the site is unknown or a move is already in
    /// progress.
    pub fn begin_move(&mut self, site_id: SiteId) -> Result<(), EditError> {
        if self.is_dragging() {
            return Err(EditError::MoveInProgress);
        }
        let Some(site) = self.model.site_map().get(&site_id) else {
            return Err(EditError::UnknownSite(site_id));
        };

        self.drag = DragState::Dragging {
            site_id,
            last_position: *site.position(),
        };
        self.selected = Some(site_id);

        Ok(())
    }

    /// `Dragging -> Dragging`: applies an intermediate pointer position
    /// without recomputing derived state.
    ///
    /// # Errors
    ///
    /// Will return `Err` if no move is in progress.
    pub fn drag_to(&mut self, position: Point2D) -> Result<(), EditError> {
        let DragState::Dragging { site_id, .. } = self.drag else {
            return Err(EditError::NoMoveInProgress);
        };

        self.model
            .set_position_only(site_id, position)
            .map_err(|_| EditError::UnknownSite(site_id))?;
        self.drag = DragState::Dragging {
            site_id,
            last_position: position,
        };

        Ok(())
    }

    /// `Dragging -> Idle`: commits the move, rebuilding edges and
    /// metrics at the final position.
    ///
    /// # Errors
    ///
    /// Will return `Err` if no move is in progress.
    pub fn confirm_move(&mut self) -> Result<(), EditError> {
        let DragState::Dragging { site_id, last_position } = self.drag
        else {
            return Err(EditError::NoMoveInProgress);
        };

        self.model
            .apply_move(site_id, last_position)
            .map_err(|_| EditError::UnknownSite(site_id))?;
        self.drag = DragState::Idle;
        self.selected = None;

        Ok(())
    }

    /// Deletes the selected site, if any.
    pub fn delete(&mut self) -> DeleteOutcome {
        let Some(site_id) = self.selected else {
            info!("Delete requested with no site selected");
            return DeleteOutcome::NothingToDelete;
        };

        if self.model.delete_site(site_id).is_err() {
            // A stale selection counts as nothing to delete.
            self.selected = None;
            return DeleteOutcome::NothingToDelete;
        }

        self.selected = None;

        DeleteOutcome::Deleted(site_id)
    }

    /// Runs the optimizer; any selection or in-flight drag is discarded
    /// first so the operation starts from a settled state.
    pub fn optimize(&mut self) -> OptimizeReport {
        self.drag = DragState::Idle;
        self.selected = None;

        self.model.optimize()
    }

    /// Recomputes the health metrics against the current site set.
    pub fn refresh_metrics(&mut self) {
        self.model.refresh_metrics();
    }

    /// Snapshot for the visualization sink, with edges of an in-flight
    /// move hidden.
    #[must_use]
    pub fn snapshot(&self) -> NetworkSnapshot {
        let hidden_site = match self.drag {
            DragState::Dragging { site_id, .. } => Some(site_id),
            DragState::Idle => None,
        };

        self.model.snapshot(hidden_site, self.selected)
    }
}


#[cfg(test)]
mod tests {
    use crate::backend::candidates::CandidateRecord;
    use crate::backend::mathphysics::Megahertz;
    use crate::backend::networkmodel::NetworkModelBuilder;

    use super::*;


    fn umts_record(
        id: &str,
        x: f32,
        frequency: Megahertz
    ) -> CandidateRecord {
        CandidateRecord {
            id: id.to_string(),
            position: Point2D::new(x, 0.0),
            technology: "3G".to_string(),
            tier: "Basic".to_string(),
            frequency: Some(frequency),
            coverage_km: None,
            overlaps: None,
        }
    }

    fn session_with_pair() -> EditSession {
        let model = NetworkModelBuilder::new()
            .set_candidates(vec![
                umts_record("1", 0.0, 950),
                umts_record("2", 2_000.0, 925),
            ])
            .build()
            .unwrap_or_else(|error| panic!("{}", error));

        EditSession::new(model)
    }


    #[test]
    fn select_at_picks_nearest_site_within_hit_radius() {
        let mut session = session_with_pair();

        assert_eq!(
            Some(1),
            session.select_at(Point2D::new(150.0, 0.0))
        );
        assert_eq!(Some(1), session.selected());

        // Far from every site.
        assert_eq!(
            None,
            session.select_at(Point2D::new(1_000.0, 1_000.0))
        );
        assert_eq!(None, session.selected());
    }

    #[test]
    fn delete_without_selection_is_a_reported_noop() {
        let mut session = session_with_pair();

        assert_eq!(DeleteOutcome::NothingToDelete, session.delete());
        assert_eq!(2, session.model().site_count());
    }

    #[test]
    fn delete_removes_selected_site() {
        let mut session = session_with_pair();

        session.select(2).unwrap_or_else(|error| panic!("{}", error));

        assert_eq!(DeleteOutcome::Deleted(2), session.delete());
        assert_eq!(1, session.model().site_count());
        assert_eq!(None, session.selected());
    }

    #[test]
    fn drag_hides_edges_until_confirmation() {
        let mut session = session_with_pair();

        assert_eq!(vec![(1, 2)], session.snapshot().edges);

        session
            .begin_move(2)
            .unwrap_or_else(|error| panic!("{}", error));
        session
            .drag_to(Point2D::new(2_500.0, 0.0))
            .unwrap_or_else(|error| panic!("{}", error));

        // Mid-drag: the edge still exists in the model but the snapshot
        // filters it.
        assert!(session.snapshot().edges.is_empty());
        assert!(session.model().graph().contains_edge(1, 2));

        session
            .confirm_move()
            .unwrap_or_else(|error| panic!("{}", error));

        // 2.5 km apart with roughly 4 km radii still overlaps.
        assert_eq!(vec![(1, 2)], session.snapshot().edges);
        assert!(!session.is_dragging());
    }

    #[test]
    fn confirmed_move_recomputes_edges_once() {
        let mut session = session_with_pair();

        session
            .begin_move(2)
            .unwrap_or_else(|error| panic!("{}", error));
        session
            .drag_to(Point2D::new(50_000.0, 0.0))
            .unwrap_or_else(|error| panic!("{}", error));
        session
            .confirm_move()
            .unwrap_or_else(|error| panic!("{}", error));

        assert!(session.snapshot().edges.is_empty());
        assert!(!session.model().graph().contains_edge(1, 2));
    }

    #[test]
    fn only_one_move_at_a_time() {
        let mut session = session_with_pair();

        session
            .begin_move(1)
            .unwrap_or_else(|error| panic!("{}", error));

        assert!(matches!(
            session.begin_move(2),
            Err(EditError::MoveInProgress)
        ));
    }

    #[test]
    fn drag_requires_a_started_move() {
        let mut session = session_with_pair();

        assert!(matches!(
            session.drag_to(Point2D::new(1.0, 1.0)),
            Err(EditError::NoMoveInProgress)
        ));
        assert!(matches!(
            session.confirm_move(),
            Err(EditError::NoMoveInProgress)
        ));
    }

    #[test]
    fn add_places_selectable_site() {
        let mut session = session_with_pair();

        let site_id = session
            .add(Point2D::new(500.0, 500.0), Technology::Umts)
            .unwrap_or_else(|error| panic!("{}", error));

        assert_eq!(3, site_id);
        assert_eq!(
            Some(site_id),
            session.select_at(Point2D::new(520.0, 520.0))
        );
    }
}
