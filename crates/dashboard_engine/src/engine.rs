use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use dashboard_logging::{dash_debug, dash_info};

use crate::poll::{spawn_polling, ChannelEventSink, EventSink, PollHandle, PollSettings};
use crate::{DashboardApi, EngineEvent, Generation, RequestSeq};

enum EngineCommand {
    StartAnalysis { request: RequestSeq },
    StartPolling {
        generation: Generation,
        task_id: String,
    },
    StopPolling { generation: Generation },
    FetchRecipients,
    AddRecipient { email: String },
    RemoveRecipient { email: String },
    SendEmail,
    FetchLatestReport,
}

/// Runs API calls and polling loops on a dedicated thread and hands results
/// back as [`EngineEvent`]s.
///
/// At most one polling loop is live: installing a new one cancels the
/// previous loop before the new one is spawned.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(api: Arc<dyn DashboardApi>, settings: PollSettings) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let sink: Arc<dyn EventSink> = Arc::new(ChannelEventSink::new(event_tx));

        thread::Builder::new()
            .name("dashboard-engine".to_string())
            .spawn(move || {
                let mut live: Option<PollHandle> = None;
                while let Ok(command) = cmd_rx.recv() {
                    match command {
                        EngineCommand::StartPolling {
                            generation,
                            task_id,
                        } => {
                            if let Some(previous) = live.take() {
                                previous.cancel();
                                dash_debug!(
                                    "Cancelled polling generation={} before installing {}",
                                    previous.generation(),
                                    generation
                                );
                            }
                            dash_info!("Polling task {} (generation {})", task_id, generation);
                            live = Some(spawn_polling(
                                runtime.handle(),
                                api.clone(),
                                sink.clone(),
                                generation,
                                task_id,
                                &settings,
                            ));
                        }
                        EngineCommand::StopPolling { generation } => {
                            if live
                                .as_ref()
                                .is_some_and(|handle| handle.generation() == generation)
                            {
                                if let Some(handle) = live.take() {
                                    handle.cancel();
                                }
                            }
                        }
                        other => {
                            let api = api.clone();
                            let sink = sink.clone();
                            runtime.spawn(async move {
                                handle_request(api.as_ref(), other, sink.as_ref()).await;
                            });
                        }
                    }
                }
                if let Some(handle) = live.take() {
                    handle.cancel();
                }
            })?;

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn start_analysis(&self, request: RequestSeq) {
        self.send(EngineCommand::StartAnalysis { request });
    }

    pub fn start_polling(&self, generation: Generation, task_id: impl Into<String>) {
        self.send(EngineCommand::StartPolling {
            generation,
            task_id: task_id.into(),
        });
    }

    pub fn stop_polling(&self, generation: Generation) {
        self.send(EngineCommand::StopPolling { generation });
    }

    pub fn fetch_recipients(&self) {
        self.send(EngineCommand::FetchRecipients);
    }

    pub fn add_recipient(&self, email: impl Into<String>) {
        self.send(EngineCommand::AddRecipient {
            email: email.into(),
        });
    }

    pub fn remove_recipient(&self, email: impl Into<String>) {
        self.send(EngineCommand::RemoveRecipient {
            email: email.into(),
        });
    }

    pub fn send_email(&self) {
        self.send(EngineCommand::SendEmail);
    }

    pub fn fetch_latest_report(&self) {
        self.send(EngineCommand::FetchLatestReport);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    fn send(&self, command: EngineCommand) {
        let _ = self.cmd_tx.send(command);
    }
}

async fn handle_request(api: &dyn DashboardApi, command: EngineCommand, sink: &dyn EventSink) {
    let event = match command {
        EngineCommand::StartAnalysis { request } => EngineEvent::StartFinished {
            request,
            result: api.start_analysis().await,
        },
        EngineCommand::FetchRecipients => EngineEvent::RecipientsFetched(api.recipients().await),
        EngineCommand::AddRecipient { email } => {
            let result = api.add_recipient(&email).await;
            EngineEvent::RecipientAdded { email, result }
        }
        EngineCommand::RemoveRecipient { email } => {
            let result = api.remove_recipient(&email).await;
            EngineEvent::RecipientRemoved { email, result }
        }
        EngineCommand::SendEmail => EngineEvent::EmailSent(api.send_email().await),
        EngineCommand::FetchLatestReport => EngineEvent::LatestReport(api.latest_report().await),
        EngineCommand::StartPolling { .. } | EngineCommand::StopPolling { .. } => return,
    };
    sink.emit(event);
}
