use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

/// Identifies one polling loop; echoed back on every event the loop emits.
pub type Generation = u64;
/// Identifies one start request; echoed back on its answer.
pub type RequestSeq = u64;

/// Task status as spelled by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    /// Created, worker not running yet.
    Pending,
    Running,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

impl AnalysisStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, AnalysisStatus::Completed | AnalysisStatus::Failed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct AnalysisResult {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub by_category: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatusReport {
    pub status: AnalysisStatus,
    #[serde(default)]
    pub progress: u32,
    #[serde(default)]
    pub news_collected: Option<u32>,
    #[serde(default)]
    pub news_analyzed: Option<u32>,
    #[serde(default)]
    pub result: Option<AnalysisResult>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartedTask {
    pub task_id: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RecipientList {
    #[serde(default)]
    pub recipients: Vec<String>,
    /// Number of leading entries that are fixed defaults.
    #[serde(default)]
    pub default_count: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    StartFinished {
        request: RequestSeq,
        result: Result<StartedTask, ApiError>,
    },
    StatusPolled {
        generation: Generation,
        report: StatusReport,
    },
    PollFailed {
        generation: Generation,
        error: ApiError,
    },
    RecipientsFetched(Result<RecipientList, ApiError>),
    RecipientAdded {
        email: String,
        result: Result<String, ApiError>,
    },
    RecipientRemoved {
        email: String,
        result: Result<String, ApiError>,
    },
    EmailSent(Result<String, ApiError>),
    LatestReport(Result<String, ApiError>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// The service answered `success: false`.
    pub fn is_rejection(&self) -> bool {
        self.kind == FailureKind::Rejected
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.kind, self.message)
        }
    }
}

impl std::error::Error for ApiError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    /// Non-2xx status without a JSON envelope.
    HttpStatus(u16),
    Timeout,
    Network,
    /// 2xx status whose body is not the expected JSON.
    Decode,
    /// The service answered `success: false`.
    Rejected,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "malformed response"),
            FailureKind::Rejected => write!(f, "rejected by service"),
        }
    }
}
