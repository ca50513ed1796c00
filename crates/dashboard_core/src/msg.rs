use crate::{Generation, RequestSeq, StatusSnapshot, TaskId};

/// Why a request produced no usable answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestFailure {
    /// The service answered `success: false` with this message.
    Rejected(String),
    /// The request never produced a usable response (network, timeout, decode).
    Transport(String),
}

impl RequestFailure {
    /// Service message for rejections, `fallback` for transport failures.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            RequestFailure::Rejected(message) if !message.is_empty() => message.clone(),
            RequestFailure::Rejected(_) | RequestFailure::Transport(_) => fallback.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User asked for a new analysis run.
    StartClicked,
    /// Service accepted the start request.
    StartSucceeded {
        request: RequestSeq,
        task_id: TaskId,
        message: String,
    },
    StartFailed {
        request: RequestSeq,
        failure: RequestFailure,
    },
    /// One polling tick produced a status snapshot.
    StatusPolled {
        generation: Generation,
        snapshot: StatusSnapshot,
    },
    /// One polling tick failed; the loop keeps running.
    PollFailed {
        generation: Generation,
        failure: RequestFailure,
    },
    ProgressHideElapsed { generation: Generation },
    RecipientsRequested,
    RecipientsLoaded {
        recipients: Vec<String>,
        default_count: Option<usize>,
    },
    RecipientsLoadFailed(RequestFailure),
    /// User submitted the new-recipient input (raw, untrimmed).
    AddRecipientSubmitted(String),
    RecipientAdded { email: String, message: String },
    RecipientAddFailed(RequestFailure),
    RemoveRecipientClicked(String),
    RecipientRemoved { email: String, message: String },
    RecipientRemoveFailed(RequestFailure),
    SendEmailClicked,
    EmailSent { message: String },
    EmailSendFailed(RequestFailure),
    EmailStatusExpired { seq: u64 },
    /// User asked to open the latest report.
    ViewResultsClicked,
    LatestReportFound { url: String },
    LatestReportUnavailable(RequestFailure),
}

impl Msg {
    /// True for messages that answer a request counted by [`crate::Effect::is_request`].
    pub fn is_response(&self) -> bool {
        matches!(
            self,
            Msg::StartSucceeded { .. }
                | Msg::StartFailed { .. }
                | Msg::RecipientsLoaded { .. }
                | Msg::RecipientsLoadFailed(_)
                | Msg::RecipientAdded { .. }
                | Msg::RecipientAddFailed(_)
                | Msg::RecipientRemoved { .. }
                | Msg::RecipientRemoveFailed(_)
                | Msg::EmailSent { .. }
                | Msg::EmailSendFailed(_)
                | Msg::LatestReportFound { .. }
                | Msg::LatestReportUnavailable(_)
        )
    }
}
