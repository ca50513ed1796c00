use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use dashboard_core::{Effect, Msg, NoticeLevel, RequestFailure, StatusSnapshot, TaskStatus};
use dashboard_engine::{AnalysisStatus, ApiError, EngineEvent, EngineHandle, StatusReport};
use dashboard_logging::{dash_debug, dash_error, dash_info, dash_warn};

use super::persistence::ActivityJournal;
use super::render;

/// Delays for effects that fire a message later.
#[derive(Debug, Clone, Copy)]
pub struct Delays {
    pub progress_hide: Duration,
    pub email_status_clear: Duration,
}

/// Executes core effects against the engine and the activity journal.
pub struct EffectRunner {
    engine: EngineHandle,
    journal: ActivityJournal,
    msg_tx: mpsc::Sender<Msg>,
    delays: Delays,
    base_url: String,
}

impl EffectRunner {
    pub fn new(
        engine: EngineHandle,
        journal: ActivityJournal,
        msg_tx: mpsc::Sender<Msg>,
        delays: Delays,
        base_url: String,
    ) -> Self {
        Self {
            engine,
            journal,
            msg_tx,
            delays,
            base_url,
        }
    }

    pub fn enqueue(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::RequestStart { request } => {
                    dash_info!("RequestStart request={}", request);
                    self.engine.start_analysis(request);
                }
                Effect::StartPolling {
                    generation,
                    task_id,
                } => self.engine.start_polling(generation, task_id),
                Effect::StopPolling { generation } => self.engine.stop_polling(generation),
                Effect::HideProgressLater { generation } => self.fire_later(
                    self.delays.progress_hide,
                    Msg::ProgressHideElapsed { generation },
                ),
                Effect::RecordActivity(draft) => self.journal.record(draft),
                Effect::Notify(notice) => {
                    match notice.level {
                        NoticeLevel::Error => dash_error!("{}: {}", notice.title, notice.message),
                        NoticeLevel::Warning => dash_warn!("{}: {}", notice.title, notice.message),
                        NoticeLevel::Info | NoticeLevel::Success => {
                            dash_info!("{}: {}", notice.title, notice.message)
                        }
                    }
                    println!("{}", render::notice_line(&notice));
                }
                Effect::FetchRecipients => self.engine.fetch_recipients(),
                Effect::AddRecipient { email } => self.engine.add_recipient(email),
                Effect::RemoveRecipient { email } => self.engine.remove_recipient(email),
                Effect::SendEmail => self.engine.send_email(),
                Effect::ClearEmailStatusLater { seq } => self.fire_later(
                    self.delays.email_status_clear,
                    Msg::EmailStatusExpired { seq },
                ),
                Effect::FetchLatestReport => self.engine.fetch_latest_report(),
                Effect::OpenReport { url } => {
                    let url = resolve_report_url(&self.base_url, &url);
                    dash_info!("Opening report {}", url);
                    println!("Open report: {url}");
                }
            }
        }
    }

    /// Waits up to `timeout` for the next engine event and maps it to a message.
    pub fn next_engine_msg(&self, timeout: Duration) -> Option<Msg> {
        self.engine.recv_timeout(timeout).map(map_event)
    }

    pub fn journal(&self) -> &ActivityJournal {
        &self.journal
    }

    fn fire_later(&self, delay: Duration, msg: Msg) {
        let msg_tx = self.msg_tx.clone();
        thread::spawn(move || {
            thread::sleep(delay);
            let _ = msg_tx.send(msg);
        });
    }
}

pub(crate) fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::StartFinished { request, result } => match result {
            Ok(task) => Msg::StartSucceeded {
                request,
                task_id: task.task_id,
                message: task.message,
            },
            Err(error) => {
                dash_warn!("Start request {} failed: {}", request, error);
                Msg::StartFailed {
                    request,
                    failure: to_failure(error),
                }
            }
        },
        EngineEvent::StatusPolled { generation, report } => Msg::StatusPolled {
            generation,
            snapshot: to_snapshot(report),
        },
        EngineEvent::PollFailed { generation, error } => {
            dash_debug!("Poll failure for generation {} forwarded", generation);
            Msg::PollFailed {
                generation,
                failure: to_failure(error),
            }
        }
        EngineEvent::RecipientsFetched(Ok(list)) => Msg::RecipientsLoaded {
            recipients: list.recipients,
            default_count: list.default_count,
        },
        EngineEvent::RecipientsFetched(Err(error)) => {
            dash_error!("Error loading recipients: {}", error);
            Msg::RecipientsLoadFailed(to_failure(error))
        }
        EngineEvent::RecipientAdded { email, result } => match result {
            Ok(message) => Msg::RecipientAdded { email, message },
            Err(error) => Msg::RecipientAddFailed(to_failure(error)),
        },
        EngineEvent::RecipientRemoved { email, result } => match result {
            Ok(message) => Msg::RecipientRemoved { email, message },
            Err(error) => Msg::RecipientRemoveFailed(to_failure(error)),
        },
        EngineEvent::EmailSent(Ok(message)) => Msg::EmailSent { message },
        EngineEvent::EmailSent(Err(error)) => Msg::EmailSendFailed(to_failure(error)),
        EngineEvent::LatestReport(Ok(url)) => Msg::LatestReportFound { url },
        EngineEvent::LatestReport(Err(error)) => Msg::LatestReportUnavailable(to_failure(error)),
    }
}

fn to_failure(error: ApiError) -> RequestFailure {
    if error.is_rejection() {
        RequestFailure::Rejected(error.message)
    } else {
        RequestFailure::Transport(error.to_string())
    }
}

fn to_snapshot(report: StatusReport) -> StatusSnapshot {
    let status = match report.status {
        AnalysisStatus::Completed => TaskStatus::Completed,
        AnalysisStatus::Failed => TaskStatus::Failed,
        AnalysisStatus::Pending | AnalysisStatus::Running | AnalysisStatus::Unknown => {
            TaskStatus::Running
        }
    };
    StatusSnapshot {
        status,
        progress: u8::try_from(report.progress.min(100)).unwrap_or(100),
        news_collected: report.news_collected,
        news_analyzed: report.news_analyzed,
        result_total: report.result.map(|result| result.total),
        error: report.error,
    }
}

/// Report URLs come back relative to the service root.
fn resolve_report_url(base_url: &str, url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        return url.to_string();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        url.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard_engine::{AnalysisResult, FailureKind, StartedTask};
    use pretty_assertions::assert_eq;

    fn report(status: AnalysisStatus, progress: u32) -> StatusReport {
        StatusReport {
            status,
            progress,
            news_collected: Some(60),
            news_analyzed: Some(57),
            result: None,
            error: None,
        }
    }

    #[test]
    fn pending_and_unknown_map_to_running() {
        for status in [
            AnalysisStatus::Pending,
            AnalysisStatus::Running,
            AnalysisStatus::Unknown,
        ] {
            let msg = map_event(EngineEvent::StatusPolled {
                generation: 3,
                report: report(status, 10),
            });
            assert!(matches!(
                msg,
                Msg::StatusPolled { generation: 3, ref snapshot } if snapshot.status == TaskStatus::Running
            ));
        }
    }

    #[test]
    fn completed_report_carries_total_and_clamped_progress() {
        let msg = map_event(EngineEvent::StatusPolled {
            generation: 1,
            report: StatusReport {
                result: Some(AnalysisResult {
                    total: 57,
                    ..AnalysisResult::default()
                }),
                ..report(AnalysisStatus::Completed, 250)
            },
        });
        assert_eq!(
            msg,
            Msg::StatusPolled {
                generation: 1,
                snapshot: StatusSnapshot {
                    status: TaskStatus::Completed,
                    progress: 100,
                    news_collected: Some(60),
                    news_analyzed: Some(57),
                    result_total: Some(57),
                    error: None,
                },
            }
        );
    }

    #[test]
    fn rejections_keep_service_message() {
        let msg = map_event(EngineEvent::EmailSent(Err(ApiError {
            kind: FailureKind::Rejected,
            message: "No news to send".to_string(),
        })));
        assert_eq!(
            msg,
            Msg::EmailSendFailed(RequestFailure::Rejected("No news to send".to_string()))
        );

        let msg = map_event(EngineEvent::StartFinished {
            request: 2,
            result: Err(ApiError {
                kind: FailureKind::Timeout,
                message: String::new(),
            }),
        });
        assert_eq!(
            msg,
            Msg::StartFailed {
                request: 2,
                failure: RequestFailure::Transport("timeout".to_string()),
            }
        );
    }

    #[test]
    fn start_success_maps_task_id() {
        let msg = map_event(EngineEvent::StartFinished {
            request: 1,
            result: Ok(StartedTask {
                task_id: "abc123".to_string(),
                message: "News analysis has started".to_string(),
            }),
        });
        assert_eq!(
            msg,
            Msg::StartSucceeded {
                request: 1,
                task_id: "abc123".to_string(),
                message: "News analysis has started".to_string(),
            }
        );
    }

    #[test]
    fn relative_report_url_is_joined_to_base() {
        assert_eq!(
            resolve_report_url("http://127.0.0.1:5000/", "/output/r.html"),
            "http://127.0.0.1:5000/output/r.html"
        );
        assert_eq!(
            resolve_report_url("http://127.0.0.1:5000", "https://cdn.example.com/r.html"),
            "https://cdn.example.com/r.html"
        );
    }
}
