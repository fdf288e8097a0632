use std::ops;

use derive_more::Mul;
use impl_ops::{
    _impl_binary_op_borrowed_borrowed, _impl_binary_op_borrowed_owned,
    _impl_binary_op_internal, _impl_binary_op_owned_borrowed,
    _impl_binary_op_owned_owned, _parse_binary_op, impl_op, impl_op_ex
};

use crate::backend::site::ServiceTier;

use super::Technology;


// Budget tightening for link evaluation at demanding service tiers. The
// coverage radius derivation never applies it: the radius must stay a pure
// function of technology, frequency and antenna heights.
const CRITICAL_SERVICE_MARGIN: Decibel = Decibel(3.0);
const PRIORITY_SERVICE_MARGIN: Decibel = Decibel(2.0);
const ENHANCED_SERVICE_MARGIN: Decibel = Decibel(1.0);
const NO_SERVICE_MARGIN: Decibel       = Decibel(0.0);


#[derive(Clone, Copy, Debug, Default, Mul, PartialEq, PartialOrd)]
pub struct Decibel(f32);

impl Decibel {
    #[must_use]
    pub fn new(value: f32) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn value(&self) -> f32 {
        self.0
    }
}

impl_op_ex!(
    + |a: &Decibel, b: &Decibel| -> Decibel {
        Decibel(a.0 + b.0)
    }
);
impl_op_ex!(
    + |a: &Decibel, b: &f32| -> Decibel {
        Decibel(a.0 + b)
    }
);
impl_op_ex!(
    - |a: &Decibel, b: &Decibel| -> Decibel {
        Decibel(a.0 - b.0)
    }
);
impl_op_ex!(
    - |a: &Decibel, b: &f32| -> Decibel {
        Decibel(a.0 - b)
    }
);


/// Transmit-side and receive-side figures entering the link budget.
#[derive(Clone, Copy, Debug)]
pub struct RadioProfile {
    tx_power: Decibel,
    tx_gain: Decibel,
    rx_gain: Decibel,
    misc_loss: Decibel,
    rx_sensitivity: Decibel,
}

impl RadioProfile {
    #[must_use]
    pub fn new(
        tx_power: Decibel,
        tx_gain: Decibel,
        rx_gain: Decibel,
        misc_loss: Decibel,
        rx_sensitivity: Decibel,
    ) -> Self {
        Self {
            tx_power,
            tx_gain,
            rx_gain,
            misc_loss,
            rx_sensitivity,
        }
    }

    #[must_use]
    pub fn for_technology(technology: Technology) -> Self {
        match technology {
            Technology::Umts => Self::new(
                Decibel(30.0),
                Decibel(10.0),
                Decibel(0.0),
                Decibel(20.0),
                Decibel(-105.0),
            ),
            Technology::Lte => Self::new(
                Decibel(40.0),
                Decibel(10.0),
                Decibel(0.0),
                Decibel(15.0),
                Decibel(-100.0),
            ),
        }
    }

    /// Maximum tolerable path loss before the received signal drops under
    /// the receiver sensitivity.
    #[must_use]
    pub fn max_path_loss(&self) -> Decibel {
        self.tx_power + self.tx_gain + self.rx_gain
            - self.misc_loss - self.rx_sensitivity
    }

    /// Link-evaluation variant of [`Self::max_path_loss`] with the service
    /// margin of the given tier subtracted.
    #[must_use]
    pub fn max_path_loss_for_tier(&self, tier: ServiceTier) -> Decibel {
        self.max_path_loss() - service_margin(tier)
    }
}


#[must_use]
fn service_margin(tier: ServiceTier) -> Decibel {
    match tier {
        ServiceTier::Critical => CRITICAL_SERVICE_MARGIN,
        ServiceTier::Priority => PRIORITY_SERVICE_MARGIN,
        ServiceTier::Enhanced => ENHANCED_SERVICE_MARGIN,
        ServiceTier::Basic
            | ServiceTier::Trivial
            | ServiceTier::Custom => NO_SERVICE_MARGIN,
    }
}


#[cfg(test)]
mod tests {
    use super::*;


    #[test]
    fn umts_budget() {
        let max_path_loss = RadioProfile::for_technology(Technology::Umts)
            .max_path_loss();

        // 30 + 10 + 0 - 20 - (-105)
        assert_eq!(125.0, max_path_loss.value());
    }

    #[test]
    fn lte_budget() {
        let max_path_loss = RadioProfile::for_technology(Technology::Lte)
            .max_path_loss();

        // 40 + 10 + 0 - 15 - (-100)
        assert_eq!(135.0, max_path_loss.value());
    }

    #[test]
    fn tier_margin_tightens_budget() {
        let profile = RadioProfile::for_technology(Technology::Umts);

        assert_eq!(
            122.0,
            profile.max_path_loss_for_tier(ServiceTier::Critical).value()
        );
        assert_eq!(
            profile.max_path_loss(),
            profile.max_path_loss_for_tier(ServiceTier::Trivial)
        );
    }
}
