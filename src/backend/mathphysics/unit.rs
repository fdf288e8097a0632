pub type Meter = f32;
pub type Kilometer = f32;
pub type Megahertz = u32;


#[must_use]
pub fn km_to_meters(km: Kilometer) -> Meter {
    km * 1_000.0
}

#[must_use]
pub fn meters_to_km(meters: Meter) -> Kilometer {
    meters / 1_000.0
}


#[cfg(test)]
mod tests {
    use super::*;


    #[test]
    fn kilometer_round_trip() {
        assert_eq!(2_500.0, km_to_meters(2.5));
        assert_eq!(2.5, meters_to_km(2_500.0));
    }
}
