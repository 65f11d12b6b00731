use std::fs::{self, File};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Whether a keystroke matched the prompted character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
pub enum Status {
    #[serde(rename = "OK")]
    #[strum(serialize = "OK")]
    Ok,
    #[serde(rename = "NG")]
    #[strum(serialize = "NG")]
    Ng,
}

/// One logged keystroke attempt. Append-only; never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub expect: char,
    pub actual: char,
    pub status: Status,
    /// Seconds between the prompt being shown and the keystroke.
    pub time: f64,
}

/// Write-once storage for a finished session's record log.
pub trait RecordSink {
    /// Persists `records` under an identifier derived from `completed_at`
    /// and returns where they ended up.
    fn save(&self, records: &[Record], completed_at: DateTime<Local>) -> io::Result<PathBuf>;
}

/// Saves each session as a pretty-printed JSON array under a directory
/// relative to the working directory, creating it on demand.
pub struct JsonFileSink {
    dir: PathBuf,
}

impl JsonFileSink {
    pub const DEFAULT_DIR: &'static str = "records";

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl Default for JsonFileSink {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DIR)
    }
}

impl RecordSink for JsonFileSink {
    fn save(&self, records: &[Record], completed_at: DateTime<Local>) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;

        let file_name = format!("record_{}.json", completed_at.format("%Y%m%d%H%M%S"));
        let path = self.dir.join(file_name);
        let file = File::create(&path)?;
        serde_json::to_writer_pretty(file, records)?;
        Ok(path)
    }
}

/// In-memory sink for tests and embedding callers that want the records
/// without touching the filesystem.
#[derive(Debug, Default)]
pub struct MemorySink {
    saved: Mutex<Vec<Vec<Record>>>,
}

impl MemorySink {
    pub fn sessions(&self) -> Vec<Vec<Record>> {
        self.saved.lock().unwrap().clone()
    }
}

impl RecordSink for MemorySink {
    fn save(&self, records: &[Record], _completed_at: DateTime<Local>) -> io::Result<PathBuf> {
        self.saved.lock().unwrap().push(records.to_vec());
        Ok(PathBuf::new())
    }
}
