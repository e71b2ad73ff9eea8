use crate::airport::Airport;
use crate::emissions::CalculationResult;
use crate::history::SavedCalculation;
use std::path::Path;
use tabled::Tabled;
use tabled::settings::{Alignment, Style};

/// Dashboard aggregates over the saved history.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Summary {
    pub flights: usize,
    pub total_emissions_kg: f64,
    pub total_distance_km: f64,
    pub total_passengers: u64,
}

pub fn summarize(records: &[SavedCalculation]) -> Summary {
    records.iter().fold(Summary::default(), |mut acc, record| {
        acc.flights += 1;
        acc.total_emissions_kg += record.result.emissions.round_trip_kg;
        acc.total_distance_km += record.result.total_distance_km;
        acc.total_passengers += u64::from(record.result.config.passengers);
        acc
    })
}

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Route")]
    route: String,
    #[tabled(rename = "Distance")]
    distance: String,
    #[tabled(rename = "Pax")]
    passengers: String,
    #[tabled(rename = "Trip")]
    trip: String,
    #[tabled(rename = "Cabin")]
    cabin: String,
    #[tabled(rename = "CO2 total")]
    emissions: String,
}

#[derive(Tabled)]
struct LegRow {
    #[tabled(rename = "Leg")]
    leg: String,
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "To")]
    to: String,
    #[tabled(rename = "Distance")]
    distance: String,
}

fn route_label(result: &CalculationResult) -> String {
    let mut codes = vec![result.departure.iata_code.to_string()];
    codes.extend(result.stopovers().map(|airport| airport.iata_code.to_string()));
    codes.push(result.arrival.iata_code.to_string());
    codes.join(" -> ")
}

fn render(mut table: tabled::Table) -> String {
    table.with(Style::rounded());
    table.with(Alignment::left());
    table.to_string()
}

pub fn history_table(records: &[SavedCalculation]) -> String {
    let rows = records
        .iter()
        .map(|record| HistoryRow {
            date: record.timestamp.format("%Y-%m-%d %H:%M").to_string(),
            route: route_label(&record.result),
            distance: format!("{:.0} km", record.result.total_distance_km),
            passengers: record.result.config.passengers.to_string(),
            trip: record.result.config.trip_label().to_string(),
            cabin: record.result.config.cabin_class.to_string(),
            emissions: format!("{:.1} kg", record.result.emissions.round_trip_kg),
        })
        .collect::<Vec<HistoryRow>>();
    render(tabled::Table::new(&rows))
}

pub fn legs_table(result: &CalculationResult) -> String {
    let rows = result
        .legs
        .iter()
        .enumerate()
        .map(|(i, leg)| LegRow {
            leg: (i + 1).to_string(),
            from: leg.from.to_string(),
            to: leg.to.to_string(),
            distance: format!("{:.0} km", leg.distance_km),
        })
        .collect::<Vec<LegRow>>();
    render(tabled::Table::new(&rows))
}

pub fn airports_table(airports: &[&Airport]) -> String {
    let rows = airports
        .iter()
        .map(|airport| (*airport).clone())
        .collect::<Vec<Airport>>();
    render(tabled::Table::new(&rows))
}

/// One CSV row per saved calculation, column-compatible with the
/// spreadsheet report.
pub fn export_csv(records: &[SavedCalculation], path: &Path) -> csv::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "Date",
        "Departure",
        "Stopovers",
        "Arrival",
        "Distance (km)",
        "Passengers",
        "Trip Type",
        "Cabin Class",
        "Total Emissions (kg)",
    ])?;

    for record in records {
        let result = &record.result;
        let stopovers = result
            .stopovers()
            .map(|airport| airport.iata_code.to_string())
            .collect::<Vec<String>>()
            .join(", ");
        writer.write_record([
            record.timestamp.format("%Y-%m-%d").to_string(),
            result.departure.iata_code.to_string(),
            stopovers,
            result.arrival.iata_code.to_string(),
            format!("{:.1}", result.total_distance_km),
            result.config.passengers.to_string(),
            result.config.trip_label().to_string(),
            result.config.cabin_class.to_string(),
            format!("{:.1}", result.emissions.round_trip_kg),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
