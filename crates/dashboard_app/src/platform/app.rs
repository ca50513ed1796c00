use std::io;
use std::sync::{mpsc, Arc};
use std::time::Duration;

use dashboard_core::{update, AppState, Msg};
use dashboard_engine::{ApiError, EngineHandle, ReqwestDashboardApi};
use dashboard_logging::dash_info;
use thiserror::Error;

use super::command::{Command, USAGE};
use super::config::{ConfigError, DashboardConfig};
use super::effects::{Delays, EffectRunner};
use super::logging::{self, LogDestination};
use super::persistence::ActivityJournal;
use super::render::{self, Renderer};

/// How long one loop turn waits for an engine event.
const ENGINE_WAIT: Duration = Duration::from_millis(50);

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("cannot use service url: {0}")]
    Api(#[from] ApiError),
    #[error("cannot start engine: {0}")]
    Engine(#[from] io::Error),
}

pub fn run_app(command: Command) -> Result<(), AppError> {
    if command == Command::Help {
        println!("{USAGE}");
        return Ok(());
    }

    let config = DashboardConfig::from_env()?;
    let destination = if config.log_to_file {
        LogDestination::Both
    } else {
        LogDestination::Terminal
    };
    logging::initialize(destination, &config.data_dir);
    dash_info!("news_dashboard {:?} against {}", command, config.base_url);

    let journal = ActivityJournal::open(config.data_dir.clone());
    if command == Command::Activity {
        for line in render::activity_lines(journal.entries()) {
            println!("{line}");
        }
        return Ok(());
    }

    let api = ReqwestDashboardApi::new(&config.api_settings())?;
    let engine = EngineHandle::new(Arc::new(api), config.poll_settings())?;
    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let delays = Delays {
        progress_hide: config.progress_hide_delay(),
        email_status_clear: config.email_status_clear_delay(),
    };
    let mut runner = EffectRunner::new(engine, journal, msg_tx, delays, config.base_url.clone());
    let mut renderer = Renderer::default();

    let mut state = AppState::new();
    for msg in command.initial_msgs() {
        state = dispatch(state, msg, &mut runner, &mut renderer);
    }

    let mut deferred = command.after_recipients_load();
    while !state.view().is_settled() {
        if let Some(msg) = runner.next_engine_msg(ENGINE_WAIT) {
            let list_answered = matches!(
                msg,
                Msg::RecipientsLoaded { .. } | Msg::RecipientsLoadFailed(_)
            );
            state = dispatch(state, msg, &mut runner, &mut renderer);
            if list_answered {
                if let Some(next) = deferred.take() {
                    state = dispatch(state, next, &mut runner, &mut renderer);
                }
            }
        }
        while let Ok(msg) = msg_rx.try_recv() {
            state = dispatch(state, msg, &mut runner, &mut renderer);
        }
    }

    if command == Command::Analyze {
        println!("Recent activity:");
        for line in render::activity_lines(runner.journal().entries()) {
            println!("  {line}");
        }
    }
    dash_info!("news_dashboard {:?} finished", command);
    Ok(())
}

fn dispatch(
    state: AppState,
    msg: Msg,
    runner: &mut EffectRunner,
    renderer: &mut Renderer,
) -> AppState {
    let (mut state, effects) = update(state, msg);
    runner.enqueue(effects);
    if state.consume_dirty() {
        renderer.show(&state.view());
    }
    state
}
