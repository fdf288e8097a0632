use thiserror::Error;

use crate::backend::{MAST_HEIGHT, MOBILE_HEIGHT};
use crate::backend::mathphysics::{
    km_to_meters, Kilometer, Megahertz, Meter
};

use super::{Decibel, RadioProfile, Technology};


// Shared slope term of both formulas.
const PATH_LOSS_SLOPE_BASE: f32        = 44.9;
const PATH_LOSS_SLOPE_MAST_FACTOR: f32 = 6.55;

const MIN_MAST_HEIGHT: Meter = 1.0;


#[derive(Debug, Error)]
pub enum PropagationError {
    #[error("Frequency must be a positive number of MHz")]
    NonPositiveFrequency,
    #[error("Mast height {0} m is outside the model domain (must exceed 1 m)")]
    MastHeightTooLow(Meter),
}


/// Empirical coverage-distance formulas, both solving
/// `L = A(f) - B(hb) - a(hm) + C(hb) * log10(d)` for `d`.
#[derive(Clone, Copy, Debug)]
pub enum PropagationModel {
    /// Okumura-Hata with a suburban correction, fit for wide macro cells.
    UrbanMacro,
    /// COST-231 Hata, fit for dense small cells at higher frequencies.
    DenseSmallCell,
}

impl PropagationModel {
    #[must_use]
    pub fn for_technology(technology: Technology) -> Self {
        match technology {
            Technology::Umts => Self::UrbanMacro,
            Technology::Lte  => Self::DenseSmallCell,
        }
    }

    /// Maximum distance at which the path loss stays within `threshold`.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the frequency or the mast height is outside
    /// the domain of the underlying logarithms.
    pub fn coverage_distance(
        &self,
        frequency: Megahertz,
        threshold: Decibel,
        mast_height: Meter,
        mobile_height: Meter,
    ) -> Result<Kilometer, PropagationError> {
        if frequency == 0 {
            return Err(PropagationError::NonPositiveFrequency);
        }
        if mast_height <= MIN_MAST_HEIGHT {
            return Err(PropagationError::MastHeightTooLow(mast_height));
        }

        let f = frequency as f32;
        let log_f = f.log10();
        let log_hb = mast_height.log10();

        let numerator = match self {
            Self::UrbanMacro => {
                let mobile_correction =
                    (1.1 * log_f - 0.7) * mobile_height
                        - (1.56 * log_f - 0.8);

                threshold.value() - 69.55 - 26.16 * log_f
                    + 13.82 * log_hb
                    + mobile_correction
                    + 2.0 * (f / 28.0).log10()
                    + 5.4
            }
            Self::DenseSmallCell => {
                let mobile_correction =
                    1.1 * (log_f - 0.7) * mobile_height
                        - (1.56 * log_f - 0.8);

                threshold.value() - 46.3 - 33.9 * log_f
                    + 13.82 * log_hb
                    + mobile_correction
            }
        };
        let denominator =
            PATH_LOSS_SLOPE_BASE - PATH_LOSS_SLOPE_MAST_FACTOR * log_hb;

        Ok(10f32.powf(numerator / denominator))
    }
}


/// Coverage radius in meters for a site of the given technology operating
/// at the given frequency, under the planning antenna heights.
///
/// # Errors
///
/// Will return `Err` if the frequency is outside the model domain.
pub fn derived_coverage_radius(
    technology: Technology,
    frequency: Megahertz,
) -> Result<Meter, PropagationError> {
    let threshold = RadioProfile::for_technology(technology)
        .max_path_loss();
    let distance = PropagationModel::for_technology(technology)
        .coverage_distance(
            frequency,
            threshold,
            MAST_HEIGHT,
            MOBILE_HEIGHT,
        )?;

    Ok(km_to_meters(distance))
}
