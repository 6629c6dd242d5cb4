use std::fs;
use std::path::{Path, PathBuf};

use engine_logging::{engine_error, engine_info, engine_warn};
use serde::{Deserialize, Serialize};
use visualizer_core::CompletedTaskSnapshot;
use visualizer_engine::AtomicFileWriter;

const HISTORY_FILENAME: &str = ".visualizer_history.ron";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub query: String,
    pub result_path: String,
    pub kind: String,
    pub completed_utc: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PersistedHistory {
    completed: Vec<HistoryEntry>,
}

pub fn load_history(output_dir: &Path) -> Vec<HistoryEntry> {
    let path = output_dir.join(HISTORY_FILENAME);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Vec::new();
        }
        Err(err) => {
            engine_warn!("Failed to read history from {:?}: {}", path, err);
            return Vec::new();
        }
    };

    match ron::from_str::<PersistedHistory>(&content) {
        Ok(history) => history.completed,
        Err(err) => {
            engine_warn!("Failed to parse history from {:?}: {}", path, err);
            Vec::new()
        }
    }
}

/// Appends one completed result. Failures are logged, never fatal.
pub fn record_completion(
    output_dir: &Path,
    snapshot: &CompletedTaskSnapshot,
    completed_utc: String,
) {
    let mut completed = load_history(output_dir);
    completed.push(HistoryEntry {
        query: snapshot.query.clone(),
        result_path: snapshot.result_path.clone(),
        kind: snapshot.kind.as_str().to_string(),
        completed_utc,
    });

    let pretty = ron::ser::PrettyConfig::new();
    let content = match ron::ser::to_string_pretty(&PersistedHistory { completed }, pretty) {
        Ok(text) => text,
        Err(err) => {
            engine_error!("Failed to serialize history: {}", err);
            return;
        }
    };

    let writer = AtomicFileWriter::new(PathBuf::from(output_dir));
    match writer.write(HISTORY_FILENAME, content.as_bytes()) {
        Ok(path) => engine_info!("Recorded completed result in {:?}", path),
        Err(err) => engine_error!("Failed to write history to {:?}: {}", output_dir, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use visualizer_core::ResultKind;

    #[test]
    fn completions_accumulate_across_runs() {
        let temp = tempfile::tempdir().unwrap();
        assert!(load_history(temp.path()).is_empty());

        let video = CompletedTaskSnapshot {
            query: "area of x".to_string(),
            result_path: "media/videos/area.mp4".to_string(),
            kind: ResultKind::Video,
        };
        record_completion(temp.path(), &video, "2026-01-02T03:04:05Z".to_string());

        let explanation = CompletedTaskSnapshot {
            query: "what is a derivative".to_string(),
            result_path: "explanations/derivative.json".to_string(),
            kind: ResultKind::Explanation,
        };
        record_completion(temp.path(), &explanation, "2026-01-02T03:05:00Z".to_string());

        let history = load_history(temp.path());
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].kind, "video");
        assert_eq!(history[1].query, "what is a derivative");
        assert_eq!(history[1].completed_utc, "2026-01-02T03:05:00Z");
    }

    #[test]
    fn corrupt_history_reads_as_empty() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join(HISTORY_FILENAME), "not ron at all (").unwrap();
        assert!(load_history(temp.path()).is_empty());
    }
}
