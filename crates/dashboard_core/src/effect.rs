use crate::{ActivityDraft, Generation, RequestSeq, TaskId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Ask the service to begin a new analysis run.
    RequestStart { request: RequestSeq },
    /// Install the polling loop for `task_id`, replacing any live loop.
    StartPolling {
        generation: Generation,
        task_id: TaskId,
    },
    StopPolling { generation: Generation },
    /// Fire `Msg::ProgressHideElapsed` after the progress hide delay.
    HideProgressLater { generation: Generation },
    RecordActivity(ActivityDraft),
    Notify(Notice),
    FetchRecipients,
    AddRecipient { email: String },
    RemoveRecipient { email: String },
    SendEmail,
    /// Fire `Msg::EmailStatusExpired` after the email status delay.
    ClearEmailStatusLater { seq: u64 },
    FetchLatestReport,
    OpenReport { url: String },
}

impl Effect {
    /// True for effects that issue exactly one request whose outcome comes
    /// back as a response message.
    pub fn is_request(&self) -> bool {
        matches!(
            self,
            Effect::RequestStart { .. }
                | Effect::FetchRecipients
                | Effect::AddRecipient { .. }
                | Effect::RemoveRecipient { .. }
                | Effect::SendEmail
                | Effect::FetchLatestReport
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A transient user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, title: &str, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.to_string(),
            message: message.into(),
        }
    }
}
