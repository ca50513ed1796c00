use dashboard_core::{
    ActivityEntry, AnalysisPhase, AppViewModel, EmailStatusKind, Notice, NoticeLevel,
    ProgressStage, ProgressView, SystemStatus,
};

const BAR_WIDTH: usize = 30;

/// Dashboard lines for `view`, in display order.
pub fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    let badge = match view.system_status {
        SystemStatus::Normal => "normal",
        SystemStatus::Running => "running",
        SystemStatus::Error => "error",
    };
    let phase = match view.phase {
        AnalysisPhase::Idle => "idle",
        AnalysisPhase::Running => "running",
        AnalysisPhase::Completed => "completed",
        AnalysisPhase::Failed => "failed",
    };
    match &view.task_id {
        Some(task_id) => lines.push(format!(
            "System: {badge} | Analysis: {phase} | Task: {task_id}"
        )),
        None => lines.push(format!("System: {badge} | Analysis: {phase}")),
    }

    if let Some(progress) = &view.progress {
        lines.push(progress_line(progress));
    }

    if view.recipients_loaded {
        lines.push(format!("Recipients ({}):", view.recipients.len()));
        for row in &view.recipients {
            let marker = if row.is_default { " (default)" } else { "" };
            lines.push(format!("  {}{}", row.email, marker));
        }
    }

    if let Some(status) = &view.email_status {
        let label = match status.kind {
            EmailStatusKind::Sending => "…",
            EmailStatusKind::Sent => "ok",
            EmailStatusKind::Failed => "error",
        };
        lines.push(format!("Email [{label}]: {}", status.text));
    }

    if let Some(url) = &view.report_url {
        lines.push(format!("Report: {url}"));
    }

    lines
}

fn progress_line(progress: &ProgressView) -> String {
    let filled = usize::from(progress.percent.min(100)) * BAR_WIDTH / 100;
    let bar = format!("{}{}", "#".repeat(filled), " ".repeat(BAR_WIDTH - filled));
    let mut line = format!(
        "[{bar}] {:>3}% {}",
        progress.percent,
        stage_label(progress.stage)
    );
    if let Some(details) = progress.details {
        line.push_str(&format!(
            " (collected {}, analyzed {})",
            details.news_collected, details.news_analyzed
        ));
    }
    line
}

pub fn stage_label(stage: ProgressStage) -> &'static str {
    match stage {
        ProgressStage::Collecting => "Collecting news...",
        ProgressStage::Analyzing => "Analyzing news...",
        ProgressStage::Saving => "Saving results...",
        ProgressStage::Done => "Done!",
    }
}

pub fn notice_line(notice: &Notice) -> String {
    let tag = match notice.level {
        NoticeLevel::Info => "INFO",
        NoticeLevel::Success => "OK",
        NoticeLevel::Warning => "WARN",
        NoticeLevel::Error => "ERROR",
    };
    format!("[{tag}] {}: {}", notice.title, notice.message)
}

pub fn activity_lines(entries: &[ActivityEntry]) -> Vec<String> {
    if entries.is_empty() {
        return vec!["No recent activity".to_string()];
    }
    entries
        .iter()
        .map(|entry| {
            format!(
                "{} {} {}: {}",
                entry.time, entry.icon, entry.title, entry.message
            )
        })
        .collect()
}

/// Prints only the lines that differ from the same position in the
/// previous frame.
#[derive(Default)]
pub struct Renderer {
    last: Vec<String>,
}

impl Renderer {
    pub fn show(&mut self, view: &AppViewModel) {
        for line in self.next_frame(view) {
            println!("{line}");
        }
    }

    fn next_frame(&mut self, view: &AppViewModel) -> Vec<String> {
        let lines = render(view);
        let changed = lines
            .iter()
            .enumerate()
            .filter(|(row, line)| self.last.get(*row) != Some(*line))
            .map(|(_, line)| line.clone())
            .collect();
        self.last = lines;
        changed
    }
}
