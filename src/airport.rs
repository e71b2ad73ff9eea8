use crate::geo::Coordinate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::Formatter;
use std::sync::Arc;
use tabled::Tabled;

pub type AirportCode = Arc<str>;

/// One record of the airports dataset. Unknown dataset fields (objectID)
/// are ignored on load.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Tabled)]
pub struct Airport {
    #[tabled(rename = "IATA")]
    pub iata_code: AirportCode,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "City")]
    pub city: String,
    #[tabled(rename = "Country")]
    pub country: String,
    #[serde(rename = "_geoloc")]
    #[tabled(rename = "Location")]
    pub location: Coordinate,
    // route count in the dataset, used to rank search results
    #[serde(default)]
    #[tabled(rename = "Routes")]
    pub links_count: u32,
}

impl fmt::Display for Airport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.iata_code)
    }
}
