//! Vehicle classes and their fuel/axle figures.
//!
//! Mileage is in km per litre of diesel. Axle count selects the toll rate.
//! Classes not in the table are costed as a plain 2-axle truck.

/// Fuel efficiency and axle count for one vehicle class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleProfile {
    /// Class key as sent by clients (e.g. "2AxlesTruck").
    pub class: &'static str,
    /// km per litre.
    pub fuel_efficiency: f64,
    pub axle_count: u32,
    pub label: &'static str,
}

/// Class used when none is given or the given one is unknown.
pub const DEFAULT_VEHICLE_CLASS: &str = "2AxlesTruck";

const fn profile(
    class: &'static str,
    fuel_efficiency: f64,
    axle_count: u32,
    label: &'static str,
) -> VehicleProfile {
    VehicleProfile {
        class,
        fuel_efficiency,
        axle_count,
        label,
    }
}

const DEFAULT_PROFILE: VehicleProfile = profile(DEFAULT_VEHICLE_CLASS, 4.0, 2, "2-Axle Truck");

/// All known vehicle classes.
pub const VEHICLE_PROFILES: &[VehicleProfile] = &[
    // Light commercial
    profile("TataAce", 12.0, 2, "Tata Ace"),
    profile("Pickup", 10.0, 2, "Pickup"),
    profile("MiniTruck", 9.0, 2, "Mini Truck"),
    profile("LCV", 8.0, 2, "LCV"),
    // Medium commercial
    profile("ICV", 6.0, 2, "ICV (Intermediate)"),
    profile("MCV", 5.5, 2, "MCV (Medium)"),
    // Heavy commercial
    DEFAULT_PROFILE,
    profile("3AxlesTruck", 3.5, 3, "3-Axle Truck"),
    profile("MultiAxlesTruck", 3.0, 4, "Multi-Axle Truck"),
    profile("HCV", 3.5, 3, "HCV"),
    // Tipper & construction
    profile("Tipper", 3.5, 3, "Tipper / Dumper"),
    profile("Bulker", 3.0, 3, "Bulker (Cement)"),
    profile("EarthMover", 2.5, 4, "Earth Mover"),
    // Trailers
    profile("Trailer20ft", 4.0, 3, "Trailer (20ft)"),
    profile("Trailer40ft", 3.0, 4, "Trailer (40ft)"),
    profile("FlatbedTrailer", 3.5, 3, "Flatbed Trailer"),
    profile("LowBedTrailer", 2.5, 4, "Low Bed Trailer"),
    profile("SemiTrailer", 3.0, 3, "Semi Trailer"),
    profile("FTL", 3.5, 3, "Full Truck Load"),
    // Specialized
    profile("Tanker", 3.0, 3, "Tanker"),
    profile("Reefer", 3.0, 3, "Reefer (Refrigerated)"),
    profile("ContainerTruck", 3.0, 3, "Container Truck"),
    profile("CarCarrier", 3.0, 4, "Car Carrier"),
    profile("OpenBody", 4.0, 2, "Open Body Truck"),
    profile("ClosedBody", 4.0, 2, "Closed Body"),
];

/// Look up a vehicle class. Never fails.
pub fn lookup(class: &str) -> &'static VehicleProfile {
    VEHICLE_PROFILES
        .iter()
        .find(|p| p.class == class)
        .unwrap_or(&DEFAULT_PROFILE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn known_classes() {
        let p = lookup("TataAce");
        assert_eq!(p.fuel_efficiency, 12.0);
        assert_eq!(p.axle_count, 2);
        assert_eq!(p.label, "Tata Ace");

        let p = lookup("MultiAxlesTruck");
        assert_eq!(p.fuel_efficiency, 3.0);
        assert_eq!(p.axle_count, 4);

        let p = lookup("MCV");
        assert_eq!(p.fuel_efficiency, 5.5);
    }

    #[test]
    fn unknown_class_is_default_two_axle_truck() {
        for class in ["Spaceship", "", "2axlestruck"] {
            let p = lookup(class);
            assert_eq!(p.class, DEFAULT_VEHICLE_CLASS);
            assert_eq!(p.fuel_efficiency, 4.0);
            assert_eq!(p.axle_count, 2);
            assert_eq!(p.label, "2-Axle Truck");
        }
    }

    #[test]
    fn table_is_well_formed() {
        assert_eq!(VEHICLE_PROFILES.len(), 25);

        let classes: HashSet<_> = VEHICLE_PROFILES.iter().map(|p| p.class).collect();
        assert_eq!(classes.len(), VEHICLE_PROFILES.len(), "duplicate class key");
        assert!(classes.contains(DEFAULT_VEHICLE_CLASS));

        for p in VEHICLE_PROFILES {
            assert!(p.fuel_efficiency > 0.0, "{} has no mileage", p.class);
            assert!((2..=4).contains(&p.axle_count), "{} axle count", p.class);
        }
    }
}
