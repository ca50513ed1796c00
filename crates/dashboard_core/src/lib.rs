//! Dashboard core: pure state machine and view-model helpers.
mod activity;
mod analysis;
mod effect;
mod msg;
mod recipients;
mod state;
mod update;
mod view_model;

pub use activity::{ActivityDraft, ActivityEntry, ActivityLog, ACTIVITY_LOG_CAP};
pub use analysis::{
    AnalysisController, AnalysisPhase, Generation, RequestSeq, StatusSnapshot, SystemStatus,
    TaskId, TaskStatus,
};
pub use effect::{Effect, Notice, NoticeLevel};
pub use msg::{Msg, RequestFailure};
pub use recipients::{is_valid_email, RecipientsState};
pub use state::{AppState, EmailStatus, EmailStatusKind};
pub use update::update;
pub use view_model::{AppViewModel, ProgressDetails, ProgressStage, ProgressView, RecipientRowView};
