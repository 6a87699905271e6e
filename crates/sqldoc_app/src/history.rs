use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use engine_logging::{engine_error, engine_info, engine_warn};
use serde::{Deserialize, Serialize};
use sqldoc_core::DownloadLink;
use sqldoc_engine::AtomicFileWriter;

pub const HISTORY_FILENAME: &str = ".sqldoc_history.ron";

/// One finished job, as remembered in the download directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub url: String,
    pub filename: String,
    pub saved_to: Option<PathBuf>,
    pub completed_utc: String,
}

impl HistoryEntry {
    pub fn new(link: &DownloadLink, saved_to: Option<PathBuf>, completed: DateTime<Utc>) -> Self {
        Self {
            url: link.url.clone(),
            filename: link.filename.clone(),
            saved_to,
            completed_utc: completed.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct History {
    completed: Vec<HistoryEntry>,
}

pub fn load_history(dir: &Path) -> Vec<HistoryEntry> {
    let path = dir.join(HISTORY_FILENAME);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Vec::new();
        }
        Err(err) => {
            engine_warn!("Failed to read job history from {:?}: {}", path, err);
            return Vec::new();
        }
    };

    match ron::from_str::<History>(&content) {
        Ok(history) => history.completed,
        Err(err) => {
            engine_warn!("Failed to parse job history from {:?}: {}", path, err);
            Vec::new()
        }
    }
}

/// Appends `entry` to the history file. Failures are logged, never fatal.
pub fn record_completed(dir: &Path, entry: HistoryEntry) {
    let mut completed = load_history(dir);
    completed.push(entry);
    let history = History { completed };

    let pretty = ron::ser::PrettyConfig::new();
    let content = match ron::ser::to_string_pretty(&history, pretty) {
        Ok(text) => text,
        Err(err) => {
            engine_error!("Failed to serialize job history: {}", err);
            return;
        }
    };

    let writer = AtomicFileWriter::new(dir.to_path_buf());
    match writer.write(HISTORY_FILENAME, content) {
        Ok(path) => engine_info!("Recorded completed job in {:?}", path),
        Err(err) => engine_error!("Failed to write job history to {:?}: {}", dir, err),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use sqldoc_core::DownloadLink;
    use tempfile::TempDir;

    use super::{load_history, record_completed, HistoryEntry, HISTORY_FILENAME};

    #[test]
    fn missing_history_is_empty() {
        let temp = TempDir::new().unwrap();
        assert!(load_history(temp.path()).is_empty());
    }

    #[test]
    fn entries_accumulate_across_runs() {
        let temp = TempDir::new().unwrap();
        let when = Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap();

        record_completed(
            temp.path(),
            HistoryEntry::new(&DownloadLink::from_url("/media/tmp/a.zip"), None, when),
        );
        record_completed(
            temp.path(),
            HistoryEntry::new(
                &DownloadLink::from_url("/media/tmp/b.zip"),
                Some(temp.path().join("b.zip")),
                when,
            ),
        );

        let history = load_history(temp.path());
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].filename, "a.zip");
        assert_eq!(history[1].saved_to, Some(temp.path().join("b.zip")));
        assert_eq!(history[1].completed_utc, "2026-10-19T08:30:00+00:00");
    }

    #[test]
    fn corrupt_history_is_ignored() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(HISTORY_FILENAME), "not ron (").unwrap();
        assert!(load_history(temp.path()).is_empty());
    }
}
