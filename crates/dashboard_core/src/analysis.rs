//! Lifecycle of the analysis task: start, poll, terminal handling.
//!
//! The controller never talks to the network. It turns user intent and
//! service answers into [`Effect`]s, and tags every polling loop with a
//! [`Generation`] so answers from a superseded loop can be told apart from
//! answers for the live one.
use crate::{ActivityDraft, Effect, Notice, NoticeLevel, RequestFailure};

/// Opaque identifier assigned by the service when a run starts.
pub type TaskId = String;
/// Identifies one polling loop. Bumped every time a new loop is installed.
pub type Generation = u64;
/// Identifies one start request.
pub type RequestSeq = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisPhase {
    #[default]
    Idle,
    Running,
    Completed,
    Failed,
}

/// Task status as reported by a polling tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Running,
    Completed,
    Failed,
}

impl TaskStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub status: TaskStatus,
    pub progress: u8,
    pub news_collected: Option<u32>,
    pub news_analyzed: Option<u32>,
    pub result_total: Option<u32>,
    pub error: Option<String>,
}

impl StatusSnapshot {
    pub fn running(progress: u8) -> Self {
        Self {
            status: TaskStatus::Running,
            progress,
            news_collected: None,
            news_analyzed: None,
            result_total: None,
            error: None,
        }
    }
}

/// Overall badge shown next to the dashboard title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SystemStatus {
    #[default]
    Normal,
    Running,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct ProgressFigures {
    pub percent: u8,
    pub news_collected: u32,
    pub news_analyzed: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnalysisController {
    phase: AnalysisPhase,
    task_id: Option<TaskId>,
    generation: Generation,
    polling: bool,
    start_seq: RequestSeq,
    start_pending: bool,
    progress: ProgressFigures,
    progress_visible: bool,
    results_available: bool,
    system_status: SystemStatus,
}

impl AnalysisController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> AnalysisPhase {
        self.phase
    }

    pub fn task_id(&self) -> Option<&str> {
        self.task_id.as_deref()
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// True while a polling loop is live.
    pub fn is_polling(&self) -> bool {
        self.polling
    }

    /// The start control is disabled while a start request is in flight or a
    /// task is being polled.
    pub fn is_busy(&self) -> bool {
        self.start_pending || self.polling
    }

    pub fn system_status(&self) -> SystemStatus {
        self.system_status
    }

    pub fn results_available(&self) -> bool {
        self.results_available
    }

    pub(crate) fn progress(&self) -> Option<ProgressFigures> {
        self.progress_visible.then_some(self.progress)
    }

    /// Issues a start request. A live loop keeps running until the service
    /// accepts the new run.
    pub fn start(&mut self) -> Vec<Effect> {
        self.start_seq += 1;
        self.start_pending = true;
        vec![Effect::RequestStart {
            request: self.start_seq,
        }]
    }

    pub fn on_start_succeeded(
        &mut self,
        request: RequestSeq,
        task_id: TaskId,
        message: String,
    ) -> Vec<Effect> {
        if request != self.start_seq {
            return Vec::new();
        }
        self.start_pending = false;

        let mut effects = Vec::with_capacity(4);
        if self.polling {
            effects.push(Effect::StopPolling {
                generation: self.generation,
            });
        }

        self.generation += 1;
        self.phase = AnalysisPhase::Running;
        self.task_id = Some(task_id.clone());
        self.polling = true;
        self.progress = ProgressFigures::default();
        self.progress_visible = true;
        self.system_status = SystemStatus::Running;

        effects.push(Effect::Notify(Notice::new(
            NoticeLevel::Info,
            "Analysis started",
            message.clone(),
        )));
        effects.push(Effect::RecordActivity(ActivityDraft::new(
            "🚀",
            "News analysis started",
            message,
        )));
        effects.push(Effect::StartPolling {
            generation: self.generation,
            task_id,
        });
        effects
    }

    pub fn on_start_failed(&mut self, request: RequestSeq, failure: RequestFailure) -> Vec<Effect> {
        if request != self.start_seq {
            return Vec::new();
        }
        self.start_pending = false;
        vec![Effect::Notify(Notice::new(
            NoticeLevel::Error,
            "Error",
            failure.user_message("Failed to start the analysis"),
        ))]
    }

    /// Applies one polling tick. Ticks from any loop but the live one are
    /// dropped.
    pub fn on_status(&mut self, generation: Generation, snapshot: StatusSnapshot) -> Vec<Effect> {
        if !self.polling || generation != self.generation {
            return Vec::new();
        }

        self.progress.percent = snapshot.progress.min(100);
        if let Some(collected) = snapshot.news_collected {
            self.progress.news_collected = collected;
        }
        if let Some(analyzed) = snapshot.news_analyzed {
            self.progress.news_analyzed = analyzed;
        }

        match snapshot.status {
            TaskStatus::Running => Vec::new(),
            TaskStatus::Completed => {
                self.finish(AnalysisPhase::Completed);
                self.results_available = true;
                self.system_status = SystemStatus::Normal;
                let total = snapshot
                    .result_total
                    .or(snapshot.news_analyzed)
                    .unwrap_or(0);
                let message =
                    format!("Analysis complete! Collected and analyzed {total} news items.");
                vec![
                    Effect::StopPolling { generation },
                    Effect::Notify(Notice::new(
                        NoticeLevel::Success,
                        "Analysis complete",
                        message.clone(),
                    )),
                    Effect::RecordActivity(ActivityDraft::new("✅", "Analysis complete", message)),
                    Effect::HideProgressLater { generation },
                ]
            }
            TaskStatus::Failed => {
                self.finish(AnalysisPhase::Failed);
                self.system_status = SystemStatus::Error;
                let reason = snapshot
                    .error
                    .filter(|error| !error.is_empty())
                    .unwrap_or_else(|| "unknown error".to_string());
                let message = format!("Analysis failed: {reason}");
                vec![
                    Effect::StopPolling { generation },
                    Effect::Notify(Notice::new(NoticeLevel::Error, "Error", message.clone())),
                    Effect::RecordActivity(ActivityDraft::new("❌", "Analysis failed", message)),
                ]
            }
        }
    }

    pub fn on_progress_hide_elapsed(&mut self, generation: Generation) -> bool {
        if generation != self.generation || self.polling || !self.progress_visible {
            return false;
        }
        self.progress_visible = false;
        true
    }

    fn finish(&mut self, phase: AnalysisPhase) {
        self.phase = phase;
        self.polling = false;
        self.task_id = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(controller: &mut AnalysisController, task_id: &str) -> Vec<Effect> {
        let request = match controller.start().as_slice() {
            [Effect::RequestStart { request }] => *request,
            other => panic!("unexpected effects {other:?}"),
        };
        controller.on_start_succeeded(request, task_id.to_string(), "started".to_string())
    }

    #[test]
    fn stale_start_answer_is_ignored() {
        let mut controller = AnalysisController::new();
        let _ = controller.start();
        let _ = controller.start();

        let effects = controller.on_start_succeeded(1, "old".to_string(), String::new());
        assert!(effects.is_empty());
        assert!(controller.is_busy());
        assert_eq!(controller.phase(), AnalysisPhase::Idle);
    }

    #[test]
    fn failed_status_without_reason_reports_unknown_error() {
        let mut controller = AnalysisController::new();
        let _ = started(&mut controller, "t1");
        let snapshot = StatusSnapshot {
            status: TaskStatus::Failed,
            error: Some(String::new()),
            ..StatusSnapshot::running(40)
        };

        let effects = controller.on_status(1, snapshot);
        assert!(effects.contains(&Effect::RecordActivity(ActivityDraft::new(
            "❌",
            "Analysis failed",
            "Analysis failed: unknown error"
        ))));
        assert_eq!(controller.system_status(), SystemStatus::Error);
        assert!(!controller.is_busy());
    }

    #[test]
    fn progress_stays_visible_while_a_newer_loop_runs() {
        let mut controller = AnalysisController::new();
        let _ = started(&mut controller, "t1");
        let mut done = StatusSnapshot::running(100);
        done.status = TaskStatus::Completed;
        let _ = controller.on_status(1, done);
        let _ = started(&mut controller, "t2");

        assert!(!controller.on_progress_hide_elapsed(1));
        assert!(controller.progress().is_some());
    }
}
