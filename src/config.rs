use crate::error::EstimateError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AircraftType {
    Regional,
    NarrowBody,
    WideBody,
}

impl AircraftType {
    /// Base emission factor in kg CO2 per passenger-km, before cabin and
    /// load adjustments.
    pub fn base_factor(self) -> f64 {
        match self {
            AircraftType::Regional => 0.14,
            AircraftType::NarrowBody => 0.12,
            AircraftType::WideBody => 0.11,
        }
    }
}

impl fmt::Display for AircraftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AircraftType::Regional => "regional",
            AircraftType::NarrowBody => "narrow-body",
            AircraftType::WideBody => "wide-body",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for AircraftType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "regional" => Ok(AircraftType::Regional),
            "narrow" | "narrowbody" | "narrow-body" => Ok(AircraftType::NarrowBody),
            "wide" | "widebody" | "wide-body" => Ok(AircraftType::WideBody),
            other => Err(format!(
                "unknown aircraft type: {} (regional, narrow-body, wide-body)",
                other
            )),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CabinClass {
    Economy,
    Premium,
    Business,
    First,
}

impl CabinClass {
    /// Seat-class multiplier on the base emission factor.
    pub fn multiplier(self) -> f64 {
        match self {
            CabinClass::Economy => 0.96,
            CabinClass::Premium => 1.6,
            CabinClass::Business => 2.9,
            CabinClass::First => 4.2,
        }
    }
}

impl fmt::Display for CabinClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CabinClass::Economy => "economy",
            CabinClass::Premium => "premium",
            CabinClass::Business => "business",
            CabinClass::First => "first",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for CabinClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "economy" => Ok(CabinClass::Economy),
            "premium" => Ok(CabinClass::Premium),
            "business" => Ok(CabinClass::Business),
            "first" => Ok(CabinClass::First),
            other => Err(format!(
                "unknown cabin class: {} (economy, premium, business, first)",
                other
            )),
        }
    }
}

/// Everything about the flight apart from the route itself. Constructed
/// once per calculation and passed by value into the estimator.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlightConfig {
    pub passengers: u32,
    pub round_trip: bool,
    pub cabin_class: CabinClass,
    pub aircraft_type: AircraftType,
    pub load_factor_pct: f64,
}

impl Default for FlightConfig {
    fn default() -> FlightConfig {
        FlightConfig {
            passengers: 1,
            round_trip: true,
            cabin_class: CabinClass::Economy,
            aircraft_type: AircraftType::NarrowBody,
            load_factor_pct: 80.0,
        }
    }
}

impl FlightConfig {
    pub fn validate(&self) -> Result<(), EstimateError> {
        if self.passengers < 1 {
            return Err(EstimateError::InvalidConfiguration(
                "passenger count must be at least 1".to_string(),
            ));
        }
        // written so a NaN load factor also fails
        if !(self.load_factor_pct > 0.0 && self.load_factor_pct <= 100.0) {
            return Err(EstimateError::InvalidConfiguration(format!(
                "load factor must be within (0, 100], got {}",
                self.load_factor_pct
            )));
        }
        Ok(())
    }

    pub fn trip_label(&self) -> &'static str {
        if self.round_trip { "Round Trip" } else { "One Way" }
    }
}

impl fmt::Display for FlightConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} passenger(s), {}, {} class, {} aircraft, {:.0}% load factor",
            self.passengers, self.trip_label(), self.cabin_class, self.aircraft_type, self.load_factor_pct
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_form_state() {
        let config = FlightConfig::default();
        assert_eq!(config.passengers, 1);
        assert!(config.round_trip);
        assert_eq!(config.cabin_class, CabinClass::Economy);
        assert_eq!(config.aircraft_type, AircraftType::NarrowBody);
        assert_eq!(config.load_factor_pct, 80.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_passengers_rejected() {
        let config = FlightConfig { passengers: 0, ..FlightConfig::default() };
        assert!(matches!(
            config.validate(),
            Err(EstimateError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_load_factor_bounds() {
        for bad in [0.0, -5.0, 100.5, f64::NAN] {
            let config = FlightConfig { load_factor_pct: bad, ..FlightConfig::default() };
            assert!(
                matches!(config.validate(), Err(EstimateError::InvalidConfiguration(_))),
                "load factor {} should be rejected",
                bad
            );
        }
        let full = FlightConfig { load_factor_pct: 100.0, ..FlightConfig::default() };
        assert!(full.validate().is_ok());
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!("wide-body".parse::<AircraftType>(), Ok(AircraftType::WideBody));
        assert_eq!("narrowBody".parse::<AircraftType>(), Ok(AircraftType::NarrowBody));
        assert_eq!("Business".parse::<CabinClass>(), Ok(CabinClass::Business));
        assert!("suborbital".parse::<AircraftType>().is_err());
        assert!("steerage".parse::<CabinClass>().is_err());
    }

    #[test]
    fn test_serde_names_match_dataset_era_values() {
        assert_eq!(
            serde_json::to_string(&AircraftType::NarrowBody).unwrap(),
            "\"narrowBody\""
        );
        assert_eq!(serde_json::to_string(&CabinClass::Economy).unwrap(), "\"economy\"");
    }
}
