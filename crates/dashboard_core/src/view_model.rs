use crate::{AnalysisPhase, EmailStatus, SystemStatus, TaskId};

/// Coarse label for how far the run has come.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStage {
    Collecting,
    Analyzing,
    Saving,
    Done,
}

impl ProgressStage {
    pub fn from_percent(percent: u8) -> Self {
        match percent {
            0..=29 => ProgressStage::Collecting,
            30..=59 => ProgressStage::Analyzing,
            60..=89 => ProgressStage::Saving,
            _ => ProgressStage::Done,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressDetails {
    pub news_collected: u32,
    pub news_analyzed: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressView {
    pub percent: u8,
    pub stage: ProgressStage,
    /// Present once either counter has been reported non-zero.
    pub details: Option<ProgressDetails>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientRowView {
    pub email: String,
    pub is_default: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub phase: AnalysisPhase,
    pub busy: bool,
    pub task_id: Option<TaskId>,
    pub system_status: SystemStatus,
    /// `None` while the progress indicator is hidden.
    pub progress: Option<ProgressView>,
    pub results_available: bool,
    pub recipients_loaded: bool,
    pub recipients: Vec<RecipientRowView>,
    pub email_status: Option<EmailStatus>,
    pub report_url: Option<String>,
    pub pending_requests: usize,
    pub dirty: bool,
}

impl AppViewModel {
    /// No request is in flight and no analysis is being polled.
    pub fn is_settled(&self) -> bool {
        self.pending_requests == 0 && !self.busy
    }
}
