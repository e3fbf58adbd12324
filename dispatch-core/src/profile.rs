//! Vehicle profiles understood by the distance oracle.
//!
//! A solve call requests its matrix for exactly one profile. Workers may also
//! declare the vehicle they ride; the engine carries that value through but
//! does not filter on it.
//!
//! # Examples
//! ```
//! use dispatch_core::VehicleProfile;
//!
//! assert_eq!(VehicleProfile::Driving.as_str(), "driving");
//! assert_eq!("bike".parse::<VehicleProfile>(), Ok(VehicleProfile::Cycling));
//! ```

use thiserror::Error;

/// Travel mode used when querying the distance oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum VehicleProfile {
    /// Motor vehicles (cars, vans, scooters).
    #[default]
    #[cfg_attr(feature = "serde", serde(alias = "car"))]
    Driving,
    /// Bicycles and cargo bikes.
    #[cfg_attr(feature = "serde", serde(alias = "bike"))]
    Cycling,
    /// Couriers on foot.
    #[cfg_attr(feature = "serde", serde(alias = "foot"))]
    Walking,
}

impl VehicleProfile {
    /// Return the profile as the lowercase path segment used by OSRM.
    ///
    /// # Examples
    /// ```
    /// use dispatch_core::VehicleProfile;
    ///
    /// assert_eq!(VehicleProfile::Walking.as_str(), "walking");
    /// ```
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Driving => "driving",
            Self::Cycling => "cycling",
            Self::Walking => "walking",
        }
    }
}

impl std::fmt::Display for VehicleProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a vehicle profile name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown vehicle profile '{0}'")]
pub struct UnknownVehicleProfile(pub String);

impl std::str::FromStr for VehicleProfile {
    type Err = UnknownVehicleProfile;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "driving" | "car" => Ok(Self::Driving),
            "cycling" | "bike" => Ok(Self::Cycling),
            "walking" | "foot" => Ok(Self::Walking),
            _ => Err(UnknownVehicleProfile(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("driving", VehicleProfile::Driving)]
    #[case("car", VehicleProfile::Driving)]
    #[case("Cycling", VehicleProfile::Cycling)]
    #[case("bike", VehicleProfile::Cycling)]
    #[case(" foot ", VehicleProfile::Walking)]
    fn parses_names_and_aliases(#[case] input: &str, #[case] expected: VehicleProfile) {
        assert_eq!(input.parse::<VehicleProfile>(), Ok(expected));
    }

    #[rstest]
    fn rejects_unknown_profile() {
        let err = "hovercraft"
            .parse::<VehicleProfile>()
            .expect_err("unknown profile should fail");
        assert_eq!(err, UnknownVehicleProfile("hovercraft".to_owned()));
    }

    #[rstest]
    fn display_matches_osrm_segment() {
        assert_eq!(VehicleProfile::Cycling.to_string(), "cycling");
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn deserialises_aliases() {
        let profile: VehicleProfile = serde_json::from_str("\"foot\"").expect("alias decodes");
        assert_eq!(profile, VehicleProfile::Walking);
    }
}
