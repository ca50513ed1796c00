/// Maximum number of entries kept in the activity log.
pub const ACTIVITY_LOG_CAP: usize = 10;

/// An activity line before it is stamped with the time of insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityDraft {
    pub icon: String,
    pub title: String,
    pub message: String,
}

impl ActivityDraft {
    pub fn new(icon: &str, title: &str, message: impl Into<String>) -> Self {
        Self {
            icon: icon.to_string(),
            title: title.to_string(),
            message: message.into(),
        }
    }

    pub fn stamp(self, time: impl Into<String>) -> ActivityEntry {
        ActivityEntry {
            icon: self.icon,
            title: self.title,
            message: self.message,
            time: time.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEntry {
    pub icon: String,
    pub title: String,
    pub message: String,
    pub time: String,
}

/// Newest-first list of activity entries, capped at [`ACTIVITY_LOG_CAP`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActivityLog {
    entries: Vec<ActivityEntry>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a log from stored entries, keeping only the newest ones.
    pub fn from_entries(mut entries: Vec<ActivityEntry>) -> Self {
        entries.truncate(ACTIVITY_LOG_CAP);
        Self { entries }
    }

    /// Prepends `entry`, evicting the oldest entry once the cap is exceeded.
    pub fn record(&mut self, entry: ActivityEntry) {
        self.entries.insert(0, entry);
        self.entries.truncate(ACTIVITY_LOG_CAP);
    }

    pub fn entries(&self) -> &[ActivityEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
