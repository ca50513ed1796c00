//! Dashboard engine: HTTP client, polling loops and effect execution.
mod api;
mod engine;
mod persist;
mod poll;
mod types;

pub use api::{ApiSettings, DashboardApi, ReqwestDashboardApi};
pub use engine::EngineHandle;
pub use persist::{ensure_data_dir, read_optional, AtomicFileWriter, PersistError};
pub use poll::{spawn_polling, ChannelEventSink, EventSink, PollHandle, PollSettings};
pub use types::{
    AnalysisResult, AnalysisStatus, ApiError, EngineEvent, FailureKind, Generation, RecipientList,
    RequestSeq, StartedTask, StatusReport,
};
