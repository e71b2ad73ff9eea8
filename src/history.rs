use crate::emissions::CalculationResult;
use chrono::{DateTime, Utc};
use rand::Rng;
use rand::distr::Alphanumeric;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::PathBuf;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SavedCalculation {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub result: CalculationResult,
}

/// The calculation history, injected into whichever layer needs it. The
/// estimator itself never touches the store.
pub trait HistoryStore {
    fn save(&mut self, result: CalculationResult) -> io::Result<SavedCalculation>;
    fn list_all(&self) -> &[SavedCalculation];
}

pub struct FileHistory {
    path: PathBuf,
    records: Vec<SavedCalculation>,
}

impl FileHistory {
    pub fn open(path: impl Into<PathBuf>) -> io::Result<FileHistory> {
        let path = path.into();
        let records = if path.exists() {
            serde_json::from_str(&std::fs::read_to_string(&path)?)?
        } else {
            Vec::new()
        };
        Ok(FileHistory { path, records })
    }

    fn persist(&self) -> io::Result<()> {
        std::fs::write(&self.path, serde_json::to_string_pretty(&self.records)?)
    }

    fn new_id() -> String {
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(9)
            .map(char::from)
            .collect::<String>()
            .to_lowercase()
    }
}

impl HistoryStore for FileHistory {
    fn save(&mut self, result: CalculationResult) -> io::Result<SavedCalculation> {
        let record = SavedCalculation {
            id: Self::new_id(),
            timestamp: Utc::now(),
            result,
        };
        self.records.push(record.clone());
        self.persist()?;
        Ok(record)
    }

    fn list_all(&self) -> &[SavedCalculation] {
        &self.records
    }
}
