use std::fmt;

use thiserror::Error;

use super::mathphysics::{Megahertz, Meter, Point2D, Position};
use super::radio::{
    derived_coverage_radius, PropagationError, Technology
};


pub use idmaps::IdToSiteMap;


pub mod idmaps;


pub type SiteId = u32;


#[derive(Debug, Error)]
pub enum SiteError {
    #[error("Frequency {0} MHz is not in the {1} pool")]
    ForeignFrequency(Megahertz, Technology),
    #[error("Propagation model failed with error `{0}`")]
    Propagation(#[from] PropagationError),
}


/// Priority classification driving the selection order during
/// optimization, most demanding first.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ServiceTier {
    Critical,
    Priority,
    Enhanced,
    Basic,
    Trivial,
    Custom,
}

impl ServiceTier {
    #[must_use]
    pub fn parse_tag(tag: &str) -> Option<Self> {
        match tag.trim() {
            "Critical" => Some(Self::Critical),
            "Priority" => Some(Self::Priority),
            // Legacy candidate exports label the middle tier "Necessary".
            "Enhanced" | "Necessary" => Some(Self::Enhanced),
            "Basic"    => Some(Self::Basic),
            "Trivial"  => Some(Self::Trivial),
            "Custom"   => Some(Self::Custom),
            _ => None,
        }
    }
}

impl fmt::Display for ServiceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Critical => "Critical",
            Self::Priority => "Priority",
            Self::Enhanced => "Enhanced",
            Self::Basic    => "Basic",
            Self::Trivial  => "Trivial",
            Self::Custom   => "Custom",
        };

        write!(f, "{name}")
    }
}


#[derive(Clone, Debug, Default)]
pub struct SiteBuilder {
    position: Option<Point2D>,
    technology: Option<Technology>,
    tier: Option<ServiceTier>,
    frequency: Option<Megahertz>,
    coverage_radius: Option<Meter>,
    overlaps: Option<Vec<SiteId>>,
    external_ref: Option<String>,
    active: bool,
}

impl SiteBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn set_position(mut self, position: Point2D) -> Self {
        self.position = Some(position);
        self
    }

    #[must_use]
    pub fn set_technology(mut self, technology: Technology) -> Self {
        self.technology = Some(technology);
        self
    }

    #[must_use]
    pub fn set_tier(mut self, tier: ServiceTier) -> Self {
        self.tier = Some(tier);
        self
    }

    #[must_use]
    pub fn set_frequency(mut self, frequency: Megahertz) -> Self {
        self.frequency = Some(frequency);
        self
    }

    #[must_use]
    pub fn set_coverage_radius(mut self, coverage_radius: Meter) -> Self {
        self.coverage_radius = Some(coverage_radius);
        self
    }

    #[must_use]
    pub fn set_overlaps(mut self, overlaps: Vec<SiteId>) -> Self {
        self.overlaps = Some(overlaps);
        self
    }

    #[must_use]
    pub fn set_external_ref(mut self, external_ref: String) -> Self {
        self.external_ref = Some(external_ref);
        self
    }

    #[must_use]
    pub fn set_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// # Errors
    ///
    /// Will return `Err` if the frequency does not belong to the
    /// technology pool, or if no precomputed radius is given and the
    /// propagation model rejects the frequency.
    pub fn build(self, id: SiteId) -> Result<Site, SiteError> {
        let technology = self.technology.unwrap_or_default();

        if let Some(frequency) = self.frequency {
            if !technology.frequency_pool().contains(&frequency) {
                return Err(
                    SiteError::ForeignFrequency(frequency, technology)
                );
            }
        }

        let coverage_radius = match (self.coverage_radius, self.frequency) {
            (Some(radius), _) => radius,
            (None, Some(frequency)) =>
                derived_coverage_radius(technology, frequency)?,
            (None, None) => 0.0,
        };

        Ok(Site {
            id,
            position: self.position.unwrap_or_default(),
            technology,
            tier: self.tier,
            frequency: self.frequency,
            coverage_radius,
            overlaps: self.overlaps.unwrap_or_default(),
            external_ref: self.external_ref,
            active: self.active,
            interference_level: 0.0,
        })
    }
}


#[derive(Clone, Debug)]
pub struct Site {
    id: SiteId,
    position: Point2D,
    technology: Technology,
    tier: Option<ServiceTier>,
    frequency: Option<Megahertz>,
    coverage_radius: Meter,
    // Overlap neighbors declared by the candidate source; gap-fill
    // consults this list, not the derived graph.
    overlaps: Vec<SiteId>,
    external_ref: Option<String>,
    active: bool,
    interference_level: f32,
}

impl Site {
    #[must_use]
    pub fn id(&self) -> SiteId {
        self.id
    }

    #[must_use]
    pub fn technology(&self) -> Technology {
        self.technology
    }

    #[must_use]
    pub fn tier(&self) -> Option<ServiceTier> {
        self.tier
    }

    #[must_use]
    pub fn frequency(&self) -> Option<Megahertz> {
        self.frequency
    }

    #[must_use]
    pub fn coverage_radius(&self) -> Meter {
        self.coverage_radius
    }

    #[must_use]
    pub fn overlaps(&self) -> &[SiteId] {
        &self.overlaps
    }

    #[must_use]
    pub fn external_ref(&self) -> Option<&str> {
        self.external_ref.as_deref()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub fn interference_level(&self) -> f32 {
        self.interference_level
    }

    #[must_use]
    pub fn covers(&self, point: &Point2D) -> bool {
        self.distance_to(point) <= self.coverage_radius
    }

    pub fn set_position(&mut self, position: Point2D) {
        self.position = position;
    }

    pub fn set_tier(&mut self, tier: ServiceTier) {
        self.tier = Some(tier);
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn set_overlaps(&mut self, overlaps: Vec<SiteId>) {
        self.overlaps = overlaps;
    }

    pub fn set_interference_level(&mut self, interference_level: f32) {
        self.interference_level = interference_level;
    }

    /// Assigns an operating frequency and rederives the coverage radius.
    /// On failure the previous frequency and radius are kept.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the frequency does not belong to the
    /// technology pool or lies outside the propagation model domain.
    pub fn set_frequency(
        &mut self,
        frequency: Megahertz
    ) -> Result<(), SiteError> {
        if !self.technology.frequency_pool().contains(&frequency) {
            return Err(
                SiteError::ForeignFrequency(frequency, self.technology)
            );
        }

        let coverage_radius =
            derived_coverage_radius(self.technology, frequency)?;

        self.frequency = Some(frequency);
        self.coverage_radius = coverage_radius;

        Ok(())
    }
}

impl Position for Site {
    fn position(&self) -> &Point2D {
        &self.position
    }
}


#[cfg(test)]
mod tests {
    use super::*;


    #[test]
    fn builder_derives_radius_from_frequency() {
        let site = SiteBuilder::new()
            .set_technology(Technology::Umts)
            .set_frequency(950)
            .build(1)
            .unwrap_or_else(|error| panic!("{}", error));

        assert!(site.coverage_radius() > 0.0);
        assert_eq!(Some(950), site.frequency());
    }

    #[test]
    fn builder_prefers_precomputed_radius() {
        let site = SiteBuilder::new()
            .set_technology(Technology::Umts)
            .set_frequency(950)
            .set_coverage_radius(1_234.0)
            .build(1)
            .unwrap_or_else(|error| panic!("{}", error));

        assert_eq!(1_234.0, site.coverage_radius());
    }

    #[test]
    fn builder_rejects_foreign_frequency() {
        let result = SiteBuilder::new()
            .set_technology(Technology::Umts)
            .set_frequency(2_100)
            .build(1);

        assert!(matches!(
            result,
            Err(SiteError::ForeignFrequency(2_100, Technology::Umts))
        ));
    }

    #[test]
    fn frequency_change_rederives_radius() {
        let mut site = SiteBuilder::new()
            .set_technology(Technology::Lte)
            .set_frequency(2_100)
            .build(1)
            .unwrap_or_else(|error| panic!("{}", error));
        let radius_at_2100 = site.coverage_radius();

        site.set_frequency(1_850)
            .unwrap_or_else(|error| panic!("{}", error));

        // Lower frequency reaches farther.
        assert!(site.coverage_radius() > radius_at_2100);
    }

    #[test]
    fn failed_frequency_change_keeps_radius() {
        let mut site = SiteBuilder::new()
            .set_technology(Technology::Lte)
            .set_frequency(2_100)
            .build(1)
            .unwrap_or_else(|error| panic!("{}", error));
        let previous_radius = site.coverage_radius();

        assert!(site.set_frequency(950).is_err());
        assert_eq!(Some(2_100), site.frequency());
        assert_eq!(previous_radius, site.coverage_radius());
    }

    #[test]
    fn coverage_test_uses_derived_radius() {
        let site = SiteBuilder::new()
            .set_position(Point2D::new(0.0, 0.0))
            .set_technology(Technology::Umts)
            .set_frequency(950)
            .set_coverage_radius(1_000.0)
            .build(1)
            .unwrap_or_else(|error| panic!("{}", error));

        assert!(site.covers(&Point2D::new(999.0, 0.0)));
        assert!(!site.covers(&Point2D::new(1_001.0, 0.0)));
    }

    #[test]
    fn legacy_necessary_tier_maps_to_enhanced() {
        assert_eq!(
            Some(ServiceTier::Enhanced),
            ServiceTier::parse_tag("Necessary")
        );
        assert_eq!(None, ServiceTier::parse_tag("Irrelevant"));
    }
}
