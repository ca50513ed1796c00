use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use dashboard_logging::{dash_debug, dash_warn};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{DashboardApi, EngineEvent, Generation};

/// `tokio::time::interval` rejects a zero period.
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone)]
pub struct PollSettings {
    pub interval: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(2000),
        }
    }
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Handle to one running polling loop.
///
/// Cancelling is idempotent. Once [`PollHandle::cancel`] returns, the loop
/// emits nothing more, even if a status request was already in flight.
#[derive(Debug)]
pub struct PollHandle {
    generation: Generation,
    token: CancellationToken,
    gate: Arc<Mutex<()>>,
}

impl PollHandle {
    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn cancel(&self) {
        // Taking the gate waits out an emit that already passed its check.
        let _gate = self.gate.lock().unwrap_or_else(PoisonError::into_inner);
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Spawns a fixed-interval status loop for `task_id` on `runtime`.
///
/// The first request goes out one interval after the call. The loop ends on
/// its own after emitting a terminal status.
pub fn spawn_polling(
    runtime: &tokio::runtime::Handle,
    api: Arc<dyn DashboardApi>,
    sink: Arc<dyn EventSink>,
    generation: Generation,
    task_id: String,
    settings: &PollSettings,
) -> PollHandle {
    if settings.interval < MIN_POLL_INTERVAL {
        dash_warn!(
            "Poll interval {:?} too short, using {:?}",
            settings.interval,
            MIN_POLL_INTERVAL
        );
    }
    let token = CancellationToken::new();
    let gate = Arc::new(Mutex::new(()));
    runtime.spawn(run_polling(
        api,
        sink,
        generation,
        task_id,
        settings.interval.max(MIN_POLL_INTERVAL),
        token.clone(),
        gate.clone(),
    ));
    PollHandle {
        generation,
        token,
        gate,
    }
}

async fn run_polling(
    api: Arc<dyn DashboardApi>,
    sink: Arc<dyn EventSink>,
    generation: Generation,
    task_id: String,
    interval: Duration,
    token: CancellationToken,
    gate: Arc<Mutex<()>>,
) {
    let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let result = tokio::select! {
            biased;
            _ = token.cancelled() => break,
            result = api.analysis_status(&task_id) => result,
        };

        let (event, terminal) = match result {
            Ok(report) => {
                let terminal = report.status.is_terminal();
                (EngineEvent::StatusPolled { generation, report }, terminal)
            }
            Err(error) => {
                dash_warn!(
                    "Status poll for task {} (generation {}) failed: {}",
                    task_id,
                    generation,
                    error
                );
                (EngineEvent::PollFailed { generation, error }, false)
            }
        };

        {
            let _gate = gate.lock().unwrap_or_else(PoisonError::into_inner);
            if token.is_cancelled() {
                break;
            }
            sink.emit(event);
        }
        if terminal {
            break;
        }
    }

    dash_debug!("Polling loop generation={} task={} stopped", generation, task_id);
}
