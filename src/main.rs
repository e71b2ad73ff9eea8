use crate::airport::Airport;
use crate::config::{AircraftType, CabinClass, FlightConfig};
use crate::directory::{AirportDirectory, RecentSearches};
use crate::emissions::estimate;
use crate::history::{FileHistory, HistoryStore};
use clap::Parser;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::{Context, Editor, Helper, Highlighter, Hinter, Validator};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

mod airport;
mod config;
mod directory;
mod emissions;
mod error;
mod geo;
mod history;
mod report;
mod route;

// the selection form allows two stopovers and up to 1000 passengers
const MAX_STOPOVERS: usize = 2;
const MAX_PASSENGERS: u32 = 1000;

#[derive(Parser)]
struct Args {
    /// Path to the airports dataset (JSON)
    #[arg(short, long, value_name = "FILE", default_value = "data/airports.json")]
    airports: PathBuf,

    /// Path to the saved calculations file
    #[arg(long, value_name = "FILE", default_value = "data/history.json")]
    history: PathBuf,

    /// Path to the recent searches file
    #[arg(long, value_name = "FILE", default_value = "data/recent.json")]
    recent: PathBuf,
}

#[derive(Helper, Hinter, Highlighter, Validator)]
pub struct CompleteHelper {
    pub commands: Vec<String>,
}

impl Completer for CompleteHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, _pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        let mut candidates = Vec::new();

        for cmd in &self.commands {
            if cmd.starts_with(line) {
                candidates.push(Pair {
                    display: cmd.clone(),
                    replacement: format!("{} ", cmd),
                });
            }
        }

        Ok((0, candidates))
    }
}

fn paginate(content: String) {
    let mut pager = Command::new("less")
        .arg("-R")
        .stdin(Stdio::piped())
        .spawn()
        // Fallback to 'more' if 'less' isn't available
        .or_else(|_| Command::new("more").stdin(Stdio::piped()).spawn())
        .expect("Failed to spawn pager");

    let mut stdin = pager.stdin.take().expect("Failed to open stdin for pager");

    if let Err(e) = stdin.write_all(content.as_bytes()) {
        // Broken pipe is common if the user quits the pager early
        if e.kind() != std::io::ErrorKind::BrokenPipe {
            eprintln!("Error writing to pager: {}", e);
        }
    }

    // Wait for the user to close the pager before returning to the ">> " prompt
    let _ = pager.wait();
}

struct Session {
    directory: AirportDirectory,
    history: FileHistory,
    recent: RecentSearches,
    recent_path: PathBuf,
    departure: Option<Airport>,
    arrival: Option<Airport>,
    stopovers: Vec<Airport>,
    config: FlightConfig,
}

impl Session {
    fn search(&self, query: &str) {
        let hits = self.directory.search(query);
        if hits.is_empty() {
            println!("No airports found matching '{}'", query);
        } else {
            println!("{}", report::airports_table(&hits));
        }
    }

    // Exact IATA hit or an unambiguous search hit selects; anything else
    // prints the candidates instead.
    fn select(&mut self, query: &str) -> Option<Airport> {
        let found = if let Some(airport) = self.directory.lookup(query) {
            Some(airport.clone())
        } else {
            let hits = self.directory.search(query);
            match hits.len() {
                0 => {
                    println!("No airports found matching '{}'", query);
                    None
                }
                1 => Some(hits[0].clone()),
                _ => {
                    println!("Multiple matches for '{}', pick one by IATA code:", query);
                    println!("{}", report::airports_table(&hits));
                    None
                }
            }
        };

        if let Some(airport) = &found {
            self.recent.record(airport);
            if let Err(e) = self.recent.save_to_file(&self.recent_path) {
                eprintln!("Could not update recent searches: {}", e);
            }
        }
        found
    }

    fn pick_departure(&mut self, query: &str) {
        if let Some(airport) = self.select(query) {
            println!("Departure set to {}", airport.to_string().green());
            self.departure = Some(airport);
        }
    }

    fn pick_arrival(&mut self, query: &str) {
        if let Some(airport) = self.select(query) {
            println!("Arrival set to {}", airport.to_string().green());
            self.arrival = Some(airport);
        }
    }

    fn add_stopover(&mut self, query: &str) {
        if self.stopovers.len() >= MAX_STOPOVERS {
            println!("At most {} stopovers are supported", MAX_STOPOVERS);
            return;
        }
        if let Some(airport) = self.select(query) {
            println!("Stopover added: {}", airport.to_string().green());
            self.stopovers.push(airport);
        }
    }

    fn set(&mut self, field: &str, value: &str) {
        match field {
            "passengers" | "pax" => match value.parse::<u32>() {
                Ok(n) if (1..=MAX_PASSENGERS).contains(&n) => self.config.passengers = n,
                _ => println!("Passengers must be a number between 1 and {}", MAX_PASSENGERS),
            },
            "trip" => match value {
                "round" | "return" => self.config.round_trip = true,
                "oneway" | "one-way" => self.config.round_trip = false,
                _ => println!("Usage: set trip <round|oneway>"),
            },
            "cabin" => match value.parse::<CabinClass>() {
                Ok(cabin) => self.config.cabin_class = cabin,
                Err(e) => println!("{}", e),
            },
            "aircraft" => match value.parse::<AircraftType>() {
                Ok(aircraft) => self.config.aircraft_type = aircraft,
                Err(e) => println!("{}", e),
            },
            "load" => match value.parse::<f64>() {
                Ok(pct) if pct > 0.0 && pct <= 100.0 => self.config.load_factor_pct = pct,
                _ => println!("Load factor must be a percentage within (0, 100]"),
            },
            _ => println!("Unknown setting '{}' (passengers, trip, cabin, aircraft, load)", field),
        }
    }

    fn show(&self) {
        let label = |selected: &Option<Airport>| {
            selected
                .as_ref()
                .map(|airport| airport.to_string())
                .unwrap_or_else(|| "(not selected)".to_string())
        };
        println!("Departure: {}", label(&self.departure));
        for stop in &self.stopovers {
            println!("      via: {}", stop);
        }
        println!("Arrival:   {}", label(&self.arrival));
        println!("Flight:    {}", self.config);
    }

    fn calc(&mut self) {
        let result = match estimate(
            self.departure.as_ref(),
            self.arrival.as_ref(),
            &self.stopovers,
            &self.config,
        ) {
            Ok(result) => result,
            Err(e) => {
                println!("{}", e.to_string().red());
                return;
            }
        };

        println!("{}", report::legs_table(&result));
        let emissions = &result.emissions;
        println!("Total distance:  {:.0} km", result.total_distance_km);
        println!(
            "Per passenger:   {} kg CO2",
            format!("{:.1}", emissions.per_person_kg).bold()
        );
        println!("All passengers:  {:.1} kg CO2", emissions.total_kg);
        if result.config.round_trip {
            println!(
                "Round trip:      {} kg CO2",
                format!("{:.1}", emissions.round_trip_kg).bold()
            );
        }
        println!(
            "Breakdown:       base {:.1} kg, cabin class impact {:.3} kg, load factor {:.0}%",
            emissions.base_emissions_kg, emissions.cabin_class_impact_kg, emissions.load_factor_pct
        );

        match self.history.save(result) {
            Ok(record) => println!("{}", format!("Saved as {}", record.id).green()),
            Err(e) => println!("{}", format!("Could not save calculation: {}", e).red()),
        }
    }

    fn list_history(&self) {
        let records = self.history.list_all();
        if records.is_empty() {
            println!("No saved calculations yet.");
            return;
        }
        let table = report::history_table(records);
        if records.len() > 20 {
            paginate(table);
        } else {
            println!("{}", table);
        }
    }

    fn print_report(&self) {
        let summary = report::summarize(self.history.list_all());
        println!("{}", "Emissions overview".bold());
        println!("  Flights:     {}", summary.flights);
        println!("  Emissions:   {:.2} tonnes CO2", summary.total_emissions_kg / 1000.0);
        println!("  Distance:    {:.0} km", summary.total_distance_km);
        println!("  Passengers:  {}", summary.total_passengers);
    }

    fn export(&self, path: &str) {
        match report::export_csv(self.history.list_all(), Path::new(path)) {
            Ok(()) => println!(
                "Exported {} calculation(s) to {}",
                self.history.list_all().len(),
                path
            ),
            Err(e) => println!("{}", format!("Export failed: {}", e).red()),
        }
    }

    fn list_recent(&self) {
        if self.recent.entries().is_empty() {
            println!("No recent searches.");
            return;
        }
        let airports = self
            .recent
            .entries()
            .iter()
            .map(|recent| &recent.airport)
            .collect::<Vec<&Airport>>();
        println!("{}", report::airports_table(&airports));
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let directory = AirportDirectory::load_from_file(&args.airports)?;
    let history = FileHistory::open(&args.history)?;
    let recent = RecentSearches::load_from_file(&args.recent)?;
    println!(
        "Loaded {} airports from {}",
        directory.len(),
        args.airports.display()
    );

    let config = rustyline::Config::builder()
        .history_ignore_space(true)
        .completion_type(rustyline::CompletionType::List)
        .build();

    let helper = CompleteHelper {
        commands: vec![
            "search".to_string(),
            "from".to_string(),
            "to".to_string(),
            "via".to_string(),
            "set".to_string(),
            "show".to_string(),
            "clear".to_string(),
            "calc".to_string(),
            "history".to_string(),
            "report".to_string(),
            "export".to_string(),
            "recent".to_string(),
            "help".to_string(),
            "exit".to_string(),
        ],
    };

    let mut rl = Editor::with_config(config)?;
    rl.set_helper(Some(helper));

    let mut session = Session {
        directory,
        history,
        recent,
        recent_path: args.recent.clone(),
        departure: None,
        arrival: None,
        stopovers: Vec::new(),
        config: FlightConfig::default(),
    };

    loop {
        let readline = rl.readline(">> ");
        match readline {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() { continue; }

                rl.add_history_entry(trimmed)?;

                let parts: Vec<&str> = trimmed.split_whitespace().collect();
                match parts[0] {
                    "search" => {
                        if parts.len() > 1 {
                            session.search(&parts[1..].join(" "));
                        } else {
                            println!("Usage: search <name, city or IATA code>");
                        }
                    },
                    "from" => {
                        if parts.len() > 1 {
                            session.pick_departure(&parts[1..].join(" "));
                        } else {
                            println!("Usage: from <name, city or IATA code>");
                        }
                    },
                    "to" => {
                        if parts.len() > 1 {
                            session.pick_arrival(&parts[1..].join(" "));
                        } else {
                            println!("Usage: to <name, city or IATA code>");
                        }
                    },
                    "via" => {
                        if parts.len() > 1 {
                            session.add_stopover(&parts[1..].join(" "));
                        } else {
                            println!("Usage: via <name, city or IATA code>");
                        }
                    },
                    "set" => {
                        if let (Some(field), Some(value)) = (parts.get(1), parts.get(2)) {
                            session.set(field, value);
                        } else {
                            println!("Usage: set <passengers|trip|cabin|aircraft|load> <value>");
                        }
                    },
                    "show" => session.show(),
                    "clear" => {
                        session.departure = None;
                        session.arrival = None;
                        session.stopovers.clear();
                        println!("Route selection cleared.");
                    },
                    "calc" => session.calc(),
                    "history" | "ls" => session.list_history(),
                    "report" => session.print_report(),
                    "export" => {
                        if let Some(path) = parts.get(1) {
                            session.export(path);
                        } else {
                            println!("Usage: export <file.csv>");
                        }
                    },
                    "recent" => session.list_recent(),
                    "help" | "?" => {
                        println!("\nAvailable Commands:");
                        println!("  search <query>        - Look up airports by name, city, country or IATA code");
                        println!("  from <query>          - Select the departure airport");
                        println!("  to <query>            - Select the arrival airport");
                        println!("  via <query>           - Add a stopover (up to {})", MAX_STOPOVERS);
                        println!("  set <field> <value>   - Adjust passengers, trip, cabin, aircraft or load");
                        println!("  show                  - Show the current route and flight settings");
                        println!("  clear                 - Reset the route selection");
                        println!("  calc                  - Estimate emissions and save the calculation");
                        println!("  history               - List saved calculations");
                        println!("  report                - Totals across all saved calculations");
                        println!("  export <file>         - Write the history as CSV");
                        println!("  recent                - Recently selected airports");
                        println!("  help / ?              - Show this help menu");
                        println!("  exit / quit           - Leave\n");
                    },
                    "exit" | "quit" => break,
                    _ => println!("Unknown command: {}", parts[0]),
                }
            },
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            },
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            },
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}
