use crate::airport::{Airport, AirportCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io;
use std::path::Path;

pub const MIN_QUERY_LEN: usize = 2;
pub const MAX_RESULTS: usize = 5;
pub const MAX_RECENT: usize = 5;

pub struct AirportDirectory {
    airports: Vec<Airport>,
    by_code: HashMap<AirportCode, usize>,
}

impl AirportDirectory {
    pub fn new(airports: Vec<Airport>) -> AirportDirectory {
        let by_code = airports
            .iter()
            .enumerate()
            .map(|(i, airport)| (airport.iata_code.clone(), i))
            .collect::<HashMap<AirportCode, usize>>();
        AirportDirectory { airports, by_code }
    }

    pub fn load_from_file(path: &Path) -> io::Result<AirportDirectory> {
        let data = std::fs::read_to_string(path)?;
        let airports: Vec<Airport> = serde_json::from_str(&data)?;
        Ok(AirportDirectory::new(airports))
    }

    pub fn len(&self) -> usize {
        self.airports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }

    pub fn lookup(&self, code: &str) -> Option<&Airport> {
        let code = code.to_uppercase();
        self.by_code.get(code.as_str()).map(|i| &self.airports[*i])
    }

    /// Ranked match over name, city, country and IATA code. Queries shorter
    /// than two characters return nothing; at most `MAX_RESULTS` hits, ties
    /// broken by dataset route count.
    pub fn search(&self, query: &str) -> Vec<&Airport> {
        let query = query.trim().to_lowercase();
        if query.chars().count() < MIN_QUERY_LEN {
            return vec![];
        }

        let mut hits = self
            .airports
            .iter()
            .filter_map(|airport| Self::rank(airport, &query).map(|rank| (rank, airport)))
            .collect::<Vec<(u8, &Airport)>>();
        hits.sort_by(|(rank_a, a), (rank_b, b)| {
            rank_a.cmp(rank_b).then(b.links_count.cmp(&a.links_count))
        });
        hits.into_iter()
            .take(MAX_RESULTS)
            .map(|(_, airport)| airport)
            .collect()
    }

    fn rank(airport: &Airport, query: &str) -> Option<u8> {
        let iata = airport.iata_code.to_lowercase();
        let name = airport.name.to_lowercase();
        let city = airport.city.to_lowercase();
        let country = airport.country.to_lowercase();

        if iata == query {
            Some(0)
        } else if name.starts_with(query) || city.starts_with(query) {
            Some(1)
        } else if name.contains(query)
            || city.contains(query)
            || country.contains(query)
            || iata.contains(query)
        {
            Some(2)
        } else {
            None
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecentSelection {
    pub airport: Airport,
    pub timestamp: DateTime<Utc>,
}

/// Last selected airports, most recent first, deduplicated by IATA code.
#[derive(Default)]
pub struct RecentSearches {
    entries: Vec<RecentSelection>,
}

impl RecentSearches {
    pub fn load_from_file(path: &Path) -> io::Result<RecentSearches> {
        if !path.exists() {
            return Ok(RecentSearches::default());
        }
        let data = std::fs::read_to_string(path)?;
        let entries = serde_json::from_str(&data)?;
        Ok(RecentSearches { entries })
    }

    pub fn save_to_file(&self, path: &Path) -> io::Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(&self.entries)?)
    }

    pub fn record(&mut self, airport: &Airport) {
        self.entries
            .retain(|recent| recent.airport.iata_code != airport.iata_code);
        self.entries.insert(
            0,
            RecentSelection { airport: airport.clone(), timestamp: Utc::now() },
        );
        self.entries.truncate(MAX_RECENT);
    }

    pub fn entries(&self) -> &[RecentSelection] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coordinate;

    fn airport(code: &str, name: &str, city: &str, country: &str, links: u32) -> Airport {
        Airport {
            iata_code: code.into(),
            name: name.to_string(),
            city: city.to_string(),
            country: country.to_string(),
            location: Coordinate { lat: 0.0, lon: 0.0 },
            links_count: links,
        }
    }

    fn directory() -> AirportDirectory {
        AirportDirectory::new(vec![
            airport("LHR", "London Heathrow", "London", "United Kingdom", 527),
            airport("LGW", "London Gatwick", "London", "United Kingdom", 232),
            airport("STN", "London Stansted", "London", "United Kingdom", 190),
            airport("LTN", "London Luton", "London", "United Kingdom", 100),
            airport("LCY", "London City", "London", "United Kingdom", 60),
            airport("SEN", "London Southend", "Southend", "United Kingdom", 20),
            airport("JFK", "John F Kennedy Intl", "New York", "United States", 403),
            airport("LON", "Fiction Field", "Nowhere", "Atlantis", 1),
        ])
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let dir = directory();
        assert_eq!(dir.lookup("jfk").unwrap().city, "New York");
        assert_eq!(dir.lookup("JFK").unwrap().city, "New York");
        assert!(dir.lookup("XXX").is_none());
    }

    #[test]
    fn test_short_queries_return_nothing() {
        let dir = directory();
        assert!(dir.search("").is_empty());
        assert!(dir.search("l").is_empty());
        assert!(dir.search(" j ").is_empty());
    }

    #[test]
    fn test_exact_iata_ranks_first() {
        let dir = directory();
        // "lon" matches every London airport by prefix, but LON exactly
        let hits = dir.search("lon");
        assert_eq!(&*hits[0].iata_code, "LON");
    }

    #[test]
    fn test_result_cap_and_popularity_order() {
        let dir = directory();
        let hits = dir.search("london");
        assert_eq!(hits.len(), MAX_RESULTS);
        // same rank, so route count decides
        assert_eq!(&*hits[0].iata_code, "LHR");
        assert_eq!(&*hits[1].iata_code, "LGW");
        // SEN has the fewest routes and falls past the cap
        assert!(hits.iter().all(|a| a.iata_code.as_ref() != "SEN"));
    }

    #[test]
    fn test_country_substring_matches() {
        let dir = directory();
        let hits = dir.search("united states");
        assert_eq!(hits.len(), 1);
        assert_eq!(&*hits[0].iata_code, "JFK");
    }

    #[test]
    fn test_recent_dedup_and_cap() {
        let dir = directory();
        let mut recent = RecentSearches::default();

        for code in ["LHR", "LGW", "STN", "LTN", "LCY", "SEN"] {
            recent.record(dir.lookup(code).unwrap());
        }
        assert_eq!(recent.entries().len(), MAX_RECENT);
        assert_eq!(&*recent.entries()[0].airport.iata_code, "SEN");
        // LHR was the oldest and fell off
        assert!(
            recent
                .entries()
                .iter()
                .all(|r| r.airport.iata_code.as_ref() != "LHR")
        );

        // re-selecting moves to the front without duplicating
        recent.record(dir.lookup("STN").unwrap());
        assert_eq!(recent.entries().len(), MAX_RECENT);
        assert_eq!(&*recent.entries()[0].airport.iata_code, "STN");
    }

    #[test]
    fn test_recent_file_round_trip() {
        let dir = directory();
        let mut recent = RecentSearches::default();
        recent.record(dir.lookup("LHR").unwrap());
        recent.record(dir.lookup("JFK").unwrap());

        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("recent.json");
        recent.save_to_file(&path).unwrap();

        let loaded = RecentSearches::load_from_file(&path).unwrap();
        assert_eq!(loaded.entries().len(), 2);
        assert_eq!(&*loaded.entries()[0].airport.iata_code, "JFK");
    }

    #[test]
    fn test_missing_recent_file_is_empty() {
        let temp = tempfile::tempdir().unwrap();
        let loaded = RecentSearches::load_from_file(&temp.path().join("nope.json")).unwrap();
        assert!(loaded.entries().is_empty());
    }

    #[test]
    fn test_dataset_parsing() {
        let data = r#"[
            {"name":"London Heathrow","city":"London","country":"United Kingdom",
             "iata_code":"LHR","_geoloc":{"lat":51.4775,"lng":-0.4614},
             "links_count":527,"objectID":"507"}
        ]"#;
        let airports: Vec<Airport> = serde_json::from_str(data).unwrap();
        let dir = AirportDirectory::new(airports);
        assert_eq!(dir.len(), 1);
        let lhr = dir.lookup("LHR").unwrap();
        assert_eq!(lhr.location.lat, 51.4775);
        assert_eq!(lhr.location.lon, -0.4614);
        assert_eq!(lhr.links_count, 527);
    }
}
