use crate::airport::Airport;
use crate::geo;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteLeg {
    pub from: Airport,
    pub to: Airport,
    pub distance_km: f64,
}

impl RouteLeg {
    pub fn between(from: &Airport, to: &Airport) -> RouteLeg {
        RouteLeg {
            distance_km: geo::distance_km(from.location, to.location),
            from: from.clone(),
            to: to.clone(),
        }
    }
}

/// One leg per consecutive waypoint pair of
/// `[departure, stopovers..., arrival]`, in itinerary order. The route is
/// exactly as the caller ordered it; stopovers only ever add distance.
pub fn plan(departure: &Airport, stopovers: &[Airport], arrival: &Airport) -> Vec<RouteLeg> {
    let mut legs = Vec::with_capacity(stopovers.len() + 1);
    let mut current = departure;
    for stop in stopovers {
        legs.push(RouteLeg::between(current, stop));
        current = stop;
    }
    legs.push(RouteLeg::between(current, arrival));
    legs
}

pub fn total_distance_km(legs: &[RouteLeg]) -> f64 {
    legs.iter().map(|leg| leg.distance_km).sum()
}
