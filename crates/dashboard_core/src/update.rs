use crate::{
    is_valid_email, ActivityDraft, AppState, Effect, EmailStatus, EmailStatusKind, Msg, Notice,
    NoticeLevel, RequestFailure,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    if msg.is_response() {
        state.pending_requests = state.pending_requests.saturating_sub(1);
        state.mark_dirty();
    }

    let effects = match msg {
        Msg::StartClicked => {
            state.mark_dirty();
            state.analysis.start()
        }
        Msg::StartSucceeded {
            request,
            task_id,
            message,
        } => state.analysis.on_start_succeeded(request, task_id, message),
        Msg::StartFailed { request, failure } => state.analysis.on_start_failed(request, failure),
        Msg::StatusPolled {
            generation,
            snapshot,
        } => {
            if generation == state.analysis.generation() && state.analysis.is_polling() {
                state.mark_dirty();
            }
            state.analysis.on_status(generation, snapshot)
        }
        // Polling retries on the next tick; the failure is only logged upstream.
        Msg::PollFailed { .. } => Vec::new(),
        Msg::ProgressHideElapsed { generation } => {
            if state.analysis.on_progress_hide_elapsed(generation) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::RecipientsRequested => vec![Effect::FetchRecipients],
        Msg::RecipientsLoaded {
            recipients,
            default_count,
        } => {
            state.recipients.replace(recipients, default_count);
            Vec::new()
        }
        Msg::RecipientsLoadFailed(_) => Vec::new(),
        Msg::AddRecipientSubmitted(raw) => {
            let email = raw.trim();
            if email.is_empty() {
                vec![notify(
                    NoticeLevel::Warning,
                    "Input error",
                    "Please enter an email address",
                )]
            } else if !is_valid_email(email) {
                vec![notify(
                    NoticeLevel::Warning,
                    "Format error",
                    "Not a valid email address",
                )]
            } else {
                vec![Effect::AddRecipient {
                    email: email.to_string(),
                }]
            }
        }
        Msg::RecipientAdded { email, message } => vec![
            notify(NoticeLevel::Success, "Success", message),
            Effect::RecordActivity(ActivityDraft::new(
                "➕",
                "Recipient added",
                format!("{email} was added"),
            )),
            Effect::FetchRecipients,
        ],
        Msg::RecipientAddFailed(failure) => {
            vec![failure_notice(&failure, "Failed to add the recipient")]
        }
        Msg::RemoveRecipientClicked(email) => {
            if state.recipients.is_default(&email) {
                vec![notify(
                    NoticeLevel::Warning,
                    "Not allowed",
                    "Default recipients cannot be removed",
                )]
            } else {
                vec![Effect::RemoveRecipient { email }]
            }
        }
        Msg::RecipientRemoved { email, message } => vec![
            notify(NoticeLevel::Success, "Success", message),
            Effect::RecordActivity(ActivityDraft::new(
                "🗑️",
                "Recipient removed",
                format!("{email} was removed"),
            )),
            Effect::FetchRecipients,
        ],
        Msg::RecipientRemoveFailed(failure) => {
            vec![failure_notice(&failure, "Failed to remove the recipient")]
        }
        Msg::SendEmailClicked => {
            state.email_status = Some(EmailStatus {
                kind: EmailStatusKind::Sending,
                text: "Sending email...".to_string(),
            });
            state.mark_dirty();
            vec![Effect::SendEmail]
        }
        Msg::EmailSent { message } => {
            state.email_status = Some(EmailStatus {
                kind: EmailStatusKind::Sent,
                text: message.clone(),
            });
            state.email_status_seq += 1;
            vec![
                notify(NoticeLevel::Success, "Success", message.clone()),
                Effect::RecordActivity(ActivityDraft::new("✉️", "Email sent", message)),
                Effect::ClearEmailStatusLater {
                    seq: state.email_status_seq,
                },
            ]
        }
        Msg::EmailSendFailed(failure) => {
            state.email_status = Some(EmailStatus {
                kind: EmailStatusKind::Failed,
                text: failure.user_message("Failed to send the email"),
            });
            state.email_status_seq += 1;
            let mut effects = vec![failure_notice(&failure, "Failed to send the email")];
            // A transport failure leaves the status line up until the next send.
            if matches!(failure, RequestFailure::Rejected(_)) {
                effects.push(Effect::ClearEmailStatusLater {
                    seq: state.email_status_seq,
                });
            }
            effects
        }
        Msg::EmailStatusExpired { seq } => {
            if seq == state.email_status_seq && state.email_status.is_some() {
                state.email_status = None;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::ViewResultsClicked => vec![Effect::FetchLatestReport],
        Msg::LatestReportFound { url } => {
            state.report_url = Some(url.clone());
            vec![Effect::OpenReport { url }]
        }
        Msg::LatestReportUnavailable(failure) => match failure {
            RequestFailure::Rejected(message) => {
                let message = if message.is_empty() {
                    "No report has been generated yet".to_string()
                } else {
                    message
                };
                vec![notify(NoticeLevel::Warning, "No report", message)]
            }
            RequestFailure::Transport(_) => vec![notify(
                NoticeLevel::Error,
                "Error",
                "Could not load the report",
            )],
        },
    };

    state.pending_requests += effects.iter().filter(|effect| effect.is_request()).count();

    (state, effects)
}

fn notify(level: NoticeLevel, title: &str, message: impl Into<String>) -> Effect {
    Effect::Notify(Notice::new(level, title, message))
}

fn failure_notice(failure: &RequestFailure, fallback: &str) -> Effect {
    let title = match failure {
        RequestFailure::Rejected(_) => "Failed",
        RequestFailure::Transport(_) => "Error",
    };
    notify(NoticeLevel::Error, title, failure.user_message(fallback))
}
