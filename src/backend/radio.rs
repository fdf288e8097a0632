use std::fmt;

use super::mathphysics::{Megahertz, Meter};


pub use budget::{Decibel, RadioProfile};
pub use propagation::{
    PropagationError, PropagationModel, derived_coverage_radius
};


pub mod budget;
pub mod propagation;


// Operating pools in allocation order. The pools are disjoint, so a
// frequency identifies its technology.
pub const UMTS_FREQUENCY_POOL: [Megahertz; 6] =
    [950, 925, 900, 875, 850, 825];
pub const LTE_FREQUENCY_POOL: [Megahertz; 6] =
    [2_100, 2_050, 2_000, 1_950, 1_900, 1_850];

// Minimum separation before two co-channel cells degrade each other.
pub const UMTS_REUSE_THRESHOLD: Meter = 10_500.0;
pub const LTE_REUSE_THRESHOLD: Meter  = 2_000.0;


#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Technology {
    #[default]
    Umts,
    Lte,
}

impl Technology {
    #[must_use]
    pub fn parse_tag(tag: &str) -> Option<Self> {
        match tag.trim() {
            "3G" | "UMTS" | "umts" => Some(Self::Umts),
            "4G" | "LTE" | "lte"   => Some(Self::Lte),
            _ => None,
        }
    }

    #[must_use]
    pub fn frequency_pool(&self) -> &'static [Megahertz] {
        match self {
            Self::Umts => &UMTS_FREQUENCY_POOL,
            Self::Lte  => &LTE_FREQUENCY_POOL,
        }
    }

    #[must_use]
    pub fn reuse_threshold(&self) -> Meter {
        match self {
            Self::Umts => UMTS_REUSE_THRESHOLD,
            Self::Lte  => LTE_REUSE_THRESHOLD,
        }
    }
}

impl fmt::Display for Technology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Umts => write!(f, "UMTS"),
            Self::Lte  => write!(f, "LTE"),
        }
    }
}
