use crate::airport::Airport;
use crate::config::FlightConfig;
use crate::error::EstimateError;
use crate::route;
use crate::route::RouteLeg;
use serde::{Deserialize, Serialize};

pub const BASELINE_LOAD_FACTOR_PCT: f64 = 70.0;
const LOAD_FACTOR_WEIGHT: f64 = 0.8;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmissionsBreakdown {
    pub per_person_kg: f64,
    pub total_kg: f64,
    pub round_trip_kg: f64,
    pub base_emissions_kg: f64,
    pub cabin_class_impact_kg: f64,
    pub load_factor_pct: f64,
}

/// Immutable snapshot of one calculation, as handed to the history store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub departure: Airport,
    pub arrival: Airport,
    pub legs: Vec<RouteLeg>,
    pub total_distance_km: f64,
    pub emissions: EmissionsBreakdown,
    pub config: FlightConfig,
}

impl CalculationResult {
    pub fn stopovers(&self) -> impl Iterator<Item = &Airport> {
        let inner = self.legs.split_last().map(|(_, rest)| rest).unwrap_or(&[]);
        inner.iter().map(|leg| &leg.to)
    }
}

pub fn breakdown(
    total_distance_km: f64,
    config: &FlightConfig,
) -> Result<EmissionsBreakdown, EstimateError> {
    config.validate()?;

    let base = config.aircraft_type.base_factor();
    let multiplier = config.cabin_class.multiplier();

    // incremental factor attributable to the cabin class; reported at factor
    // scale in the breakdown, not scaled by distance
    let cabin_class_impact_kg = base * (multiplier - 1.0);
    let mut factor = base * multiplier;

    // occupancy below the 70% baseline spreads the airframe over fewer seats
    factor += factor
        * ((BASELINE_LOAD_FACTOR_PCT - config.load_factor_pct) / 100.0)
        * LOAD_FACTOR_WEIGHT;

    let base_emissions_kg = total_distance_km * factor;
    let per_person_kg =
        base_emissions_kg / ((config.load_factor_pct / 100.0) * f64::from(config.passengers));
    let total_kg = per_person_kg * f64::from(config.passengers);
    // round trips double the finished total, never the input distance
    let round_trip_kg = if config.round_trip { total_kg * 2.0 } else { total_kg };

    Ok(EmissionsBreakdown {
        per_person_kg,
        total_kg,
        round_trip_kg,
        base_emissions_kg,
        cabin_class_impact_kg,
        load_factor_pct: config.load_factor_pct,
    })
}

/// Plans the route `[departure, stopovers..., arrival]` and prices its
/// emissions. Fails before any arithmetic if an endpoint is missing or the
/// configuration would divide by zero.
pub fn estimate(
    departure: Option<&Airport>,
    arrival: Option<&Airport>,
    stopovers: &[Airport],
    config: &FlightConfig,
) -> Result<CalculationResult, EstimateError> {
    let (departure, arrival) = match (departure, arrival) {
        (Some(dep), Some(arr)) => (dep, arr),
        _ => return Err(EstimateError::MissingEndpoint),
    };

    let legs = route::plan(departure, stopovers, arrival);
    let total_distance_km = route::total_distance_km(&legs);
    let emissions = breakdown(total_distance_km, config)?;

    Ok(CalculationResult {
        departure: departure.clone(),
        arrival: arrival.clone(),
        legs,
        total_distance_km,
        emissions,
        config: *config,
    })
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::config::{AircraftType, CabinClass};
    use proptest::prelude::*;

    fn arb_cabin() -> impl Strategy<Value = CabinClass> {
        prop_oneof![
            Just(CabinClass::Economy),
            Just(CabinClass::Premium),
            Just(CabinClass::Business),
            Just(CabinClass::First),
        ]
    }

    fn arb_aircraft() -> impl Strategy<Value = AircraftType> {
        prop_oneof![
            Just(AircraftType::Regional),
            Just(AircraftType::NarrowBody),
            Just(AircraftType::WideBody),
        ]
    }

    fn arb_config() -> impl Strategy<Value = FlightConfig> {
        (1..500u32, any::<bool>(), arb_cabin(), arb_aircraft(), 1.0f64..=100.0).prop_map(
            |(passengers, round_trip, cabin_class, aircraft_type, load_factor_pct)| FlightConfig {
                passengers,
                round_trip,
                cabin_class,
                aircraft_type,
                load_factor_pct,
            },
        )
    }

    proptest! {
        #[test]
        fn test_breakdown_consistency(distance in 1.0f64..20000.0, config in arb_config()) {
            let result = breakdown(distance, &config).unwrap();

            prop_assert!(result.per_person_kg > 0.0);
            prop_assert!(
                (result.total_kg - result.per_person_kg * f64::from(config.passengers)).abs()
                    / result.total_kg < 1e-9
            );

            let expected = if config.round_trip { result.total_kg * 2.0 } else { result.total_kg };
            prop_assert_eq!(result.round_trip_kg, expected);
            prop_assert_eq!(result.load_factor_pct, config.load_factor_pct);
        }

        #[test]
        fn test_fuller_planes_emit_less_per_person(
            distance in 1.0f64..20000.0,
            config in arb_config(),
            lower in 1.0f64..99.0,
            bump in 0.5f64..50.0
        ) {
            let higher = (lower + bump).min(100.0);
            let sparse = breakdown(distance, &FlightConfig { load_factor_pct: lower, ..config }).unwrap();
            let full = breakdown(distance, &FlightConfig { load_factor_pct: higher, ..config }).unwrap();

            prop_assert!(
                full.per_person_kg < sparse.per_person_kg,
                "load {} -> {} kg, load {} -> {} kg",
                lower, sparse.per_person_kg, higher, full.per_person_kg
            );
        }
    }
}
