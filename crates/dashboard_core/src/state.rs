use crate::view_model::{
    AppViewModel, ProgressDetails, ProgressStage, ProgressView, RecipientRowView,
};
use crate::{AnalysisController, RecipientsState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailStatusKind {
    Sending,
    Sent,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailStatus {
    pub kind: EmailStatusKind,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    pub(crate) analysis: AnalysisController,
    pub(crate) recipients: RecipientsState,
    pub(crate) email_status: Option<EmailStatus>,
    pub(crate) email_status_seq: u64,
    pub(crate) report_url: Option<String>,
    pub(crate) pending_requests: usize,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn analysis(&self) -> &AnalysisController {
        &self.analysis
    }

    pub fn recipients(&self) -> &RecipientsState {
        &self.recipients
    }

    pub fn view(&self) -> AppViewModel {
        let progress = self.analysis.progress().map(|figures| ProgressView {
            percent: figures.percent,
            stage: ProgressStage::from_percent(figures.percent),
            details: (figures.news_collected > 0 || figures.news_analyzed > 0).then_some(
                ProgressDetails {
                    news_collected: figures.news_collected,
                    news_analyzed: figures.news_analyzed,
                },
            ),
        });

        let recipients = self
            .recipients
            .emails()
            .iter()
            .map(|email| RecipientRowView {
                email: email.clone(),
                is_default: self.recipients.is_default(email),
            })
            .collect();

        AppViewModel {
            phase: self.analysis.phase(),
            busy: self.analysis.is_busy(),
            task_id: self.analysis.task_id().map(ToOwned::to_owned),
            system_status: self.analysis.system_status(),
            progress,
            results_available: self.analysis.results_available(),
            recipients_loaded: self.recipients.is_loaded(),
            recipients,
            email_status: self.email_status.clone(),
            report_url: self.report_url.clone(),
            pending_requests: self.pending_requests,
            dirty: self.dirty,
        }
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns whether the state changed since the last call and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}
