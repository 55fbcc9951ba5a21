use indicatif::{ProgressBar, ProgressStyle};
use mayacmd_core::api::{ChannelSink, ReportEvent, TaskVerdict};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Terminal progress bar driven by report events.
pub struct ProgressMonitor {
    bar: ProgressBar,
    echo: bool,
}

impl ProgressMonitor {
    pub fn new(enabled: bool, echo: bool) -> Self {
        if !enabled {
            return Self {
                bar: ProgressBar::hidden(),
                echo,
            };
        }

        let bar = ProgressBar::new(100);
        let style = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>3}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░  ");
        bar.set_style(style);
        bar.set_message("Starting...");
        Self { bar, echo }
    }

    pub fn apply(&self, ev: &ReportEvent) {
        match ev {
            ReportEvent::Line { text, .. } if self.echo => self.bar.println(text),
            ReportEvent::Line { .. } => {}
            ReportEvent::Progress { percent } => {
                self.bar.set_position(percent.clamp(0.0, 100.0).round() as u64)
            }
            ReportEvent::Status { message } => self.bar.set_message(message.clone()),
            ReportEvent::Info { .. } | ReportEvent::Warning { .. } => {}
            ReportEvent::Failed { reason } => self.bar.println(format!("error: {reason}")),
            ReportEvent::Completed { verdict } => self.finish(verdict),
        }
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn message(&self) -> String {
        self.bar.message()
    }

    fn finish(&self, verdict: &TaskVerdict) {
        match verdict {
            TaskVerdict::Succeeded { .. } => self.bar.finish_with_message("Render complete"),
            TaskVerdict::Failed { .. } => self.bar.abandon_with_message("Render failed"),
        }
    }
}

/// Spawn a monitor that consumes events from the returned sink until it is
/// dropped.
pub fn spawn_monitor(echo: bool) -> (ChannelSink, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::unbounded_channel::<ReportEvent>();
    let handle = tokio::spawn(async move {
        let monitor = ProgressMonitor::new(true, echo);
        while let Some(ev) = rx.recv().await {
            monitor.apply(&ev);
        }
    });
    (ChannelSink::new(tx), handle)
}
