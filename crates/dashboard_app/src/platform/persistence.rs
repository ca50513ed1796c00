use std::path::PathBuf;
use std::sync::Arc;

use dashboard_core::{ActivityDraft, ActivityEntry, ActivityLog};
use dashboard_engine::{read_optional, AtomicFileWriter};
use dashboard_logging::{dash_error, dash_info, dash_warn};
use serde::{Deserialize, Serialize};

const ACTIVITY_FILENAME: &str = "activities.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedActivity {
    icon: String,
    title: String,
    message: String,
    time: String,
}

impl From<&ActivityEntry> for PersistedActivity {
    fn from(entry: &ActivityEntry) -> Self {
        Self {
            icon: entry.icon.clone(),
            title: entry.title.clone(),
            message: entry.message.clone(),
            time: entry.time.clone(),
        }
    }
}

impl From<PersistedActivity> for ActivityEntry {
    fn from(stored: PersistedActivity) -> Self {
        ActivityEntry {
            icon: stored.icon,
            title: stored.title,
            message: stored.message,
            time: stored.time,
        }
    }
}

/// Reads and writes `activities.json`, newest entry first.
pub(crate) struct ActivityStore {
    writer: AtomicFileWriter,
}

impl ActivityStore {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            writer: AtomicFileWriter::new(data_dir),
        }
    }

    /// Missing or unreadable storage yields an empty list.
    pub fn load_all(&self) -> Vec<ActivityEntry> {
        let path = self.writer.path_of(ACTIVITY_FILENAME);
        let content = match read_optional(&path) {
            Ok(Some(text)) => text,
            Ok(None) => return Vec::new(),
            Err(err) => {
                dash_warn!("Failed to read activities from {:?}: {}", path, err);
                return Vec::new();
            }
        };

        let stored: Vec<PersistedActivity> = match serde_json::from_str(&content) {
            Ok(stored) => stored,
            Err(err) => {
                dash_warn!("Discarding corrupt activities in {:?}: {}", path, err);
                return Vec::new();
            }
        };

        dash_info!("Loaded {} activities from {:?}", stored.len(), path);
        stored.into_iter().map(ActivityEntry::from).collect()
    }

    pub fn save(&self, entries: &[ActivityEntry]) {
        let stored: Vec<PersistedActivity> = entries.iter().map(PersistedActivity::from).collect();
        let content = match serde_json::to_string_pretty(&stored) {
            Ok(text) => text,
            Err(err) => {
                dash_error!("Failed to serialize activities: {}", err);
                return;
            }
        };

        if let Err(err) = self.writer.write(ACTIVITY_FILENAME, &content) {
            dash_error!("Failed to write activities: {}", err);
        }
    }
}

/// Source of the `HH:MM` stamp put on new entries.
pub(crate) type Clock = Arc<dyn Fn() -> String + Send + Sync>;

/// The activity log plus its write-through storage.
pub(crate) struct ActivityJournal {
    log: ActivityLog,
    store: ActivityStore,
    clock: Clock,
}

impl ActivityJournal {
    pub fn open(data_dir: PathBuf) -> Self {
        Self::with_clock(
            data_dir,
            Arc::new(|| chrono::Local::now().format("%H:%M").to_string()),
        )
    }

    pub fn with_clock(data_dir: PathBuf, clock: Clock) -> Self {
        let store = ActivityStore::new(data_dir);
        let log = ActivityLog::from_entries(store.load_all());
        Self { log, store, clock }
    }

    pub fn record(&mut self, draft: ActivityDraft) {
        let entry = draft.stamp((self.clock)());
        dash_info!("Activity: {} {}: {}", entry.icon, entry.title, entry.message);
        self.log.record(entry);
        self.store.save(self.log.entries());
    }

    pub fn entries(&self) -> &[ActivityEntry] {
        self.log.entries()
    }
}
