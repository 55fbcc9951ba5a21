//! Task loop: pumps renderer output through the line dispatcher, stops the
//! renderer on a fatal line and classifies the exit code otherwise.
use std::time::Instant;

use tokio::sync::mpsc;

use crate::config::ControlConfig;
use crate::dispatch::{Effect, LineDispatcher};
use crate::error::RunnerError;
use crate::exit::{self, ExitOutcome};
use crate::util::RingBytes;

use super::abort;
use super::io_pump::{self, LineStream, LineTap};
use super::output::{ReportEvent, ReportSink};
use super::traits::RunnerSession;
use super::types::{FailureKind, RunOutcome, TaskReport, TaskVerdict};

pub struct RunTaskRuntimeInput<'a> {
    pub session: Box<dyn RunnerSession>,
    pub dispatcher: LineDispatcher,
    pub control_cfg: &'a ControlConfig,
    pub ignore_error_211: bool,
    pub sink: &'a mut dyn ReportSink,
}

enum LoopEnd {
    Exited(anyhow::Result<RunOutcome>),
    Fatal(String),
}

pub async fn run_task_runtime(input: RunTaskRuntimeInput<'_>) -> Result<TaskReport, RunnerError> {
    let RunTaskRuntimeInput {
        mut session,
        mut dispatcher,
        control_cfg,
        ignore_error_211,
        sink,
    } = input;

    let stdout = session
        .stdout()
        .ok_or_else(|| RunnerError::Spawn("no stdout".into()))?;
    let stderr = session
        .stderr()
        .ok_or_else(|| RunnerError::Spawn("no stderr".into()))?;

    let ring_out = RingBytes::new(control_cfg.capture_bytes);
    let ring_err = RingBytes::new(control_cfg.capture_bytes);
    let started_at = Instant::now();

    let (line_tx, mut line_rx) =
        mpsc::channel::<LineTap>(control_cfg.line_channel_capacity.max(1));
    let out_task = io_pump::pump_stdout(stdout, ring_out.clone(), line_tx.clone());
    let err_task = io_pump::pump_stderr(stderr, ring_err.clone(), line_tx);

    let dispatch_stderr = control_cfg.dispatch_stderr;
    let mut lines = 0u64;
    let end = {
        let wait_fut = session.wait();
        tokio::pin!(wait_fut);
        let mut lines_open = true;

        loop {
            tokio::select! {
                res = &mut wait_fut => break LoopEnd::Exited(res),

                tap = line_rx.recv(), if lines_open => match tap {
                    Some(tap) => {
                        lines += 1;
                        if let Some(reason) = handle_line(&mut dispatcher, sink, tap, dispatch_stderr).await {
                            break LoopEnd::Fatal(reason);
                        }
                    }
                    None => lines_open = false,
                },
            }
        }
    };

    let outcome = match end {
        LoopEnd::Fatal(reason) => {
            abort::abort_sequence(&mut session, control_cfg.kill_grace_ms, &reason).await;
            drop(line_rx);
            out_task.abort();
            err_task.abort();

            let verdict = TaskVerdict::Failed {
                reason,
                kind: FailureKind::Render,
            };
            sink.emit(ReportEvent::Completed {
                verdict: verdict.clone(),
            })
            .await;
            return Ok(report(
                verdict,
                None,
                started_at,
                &dispatcher,
                lines,
                &ring_out,
                &ring_err,
            ));
        }
        LoopEnd::Exited(res) => res.map_err(|e| RunnerError::Spawn(e.to_string()))?,
    };

    // The process is gone; whatever it wrote before exiting still counts.
    let mut late_failure = None;
    while let Some(tap) = line_rx.recv().await {
        lines += 1;
        if let Some(reason) = handle_line(&mut dispatcher, sink, tap, dispatch_stderr).await {
            late_failure = Some(reason);
            break;
        }
    }
    drop(line_rx);
    for task in [out_task, err_task] {
        match task.await {
            Ok(Err(e)) => tracing::warn!(error = %e, "output pump failed"),
            Err(e) if !e.is_cancelled() => tracing::warn!(error = %e, "output pump panicked"),
            _ => {}
        }
    }

    let verdict = match late_failure {
        Some(reason) => TaskVerdict::Failed {
            reason,
            kind: FailureKind::Render,
        },
        None => match exit::classify(outcome.exit_code, ignore_error_211) {
            ExitOutcome::Success { note } => {
                if let Some(message) = &note {
                    sink.emit(ReportEvent::Info {
                        message: message.clone(),
                    })
                    .await;
                }
                TaskVerdict::Succeeded { note }
            }
            ExitOutcome::Failure { reason } => {
                sink.emit(ReportEvent::Failed {
                    reason: reason.clone(),
                })
                .await;
                TaskVerdict::Failed {
                    reason,
                    kind: FailureKind::ExitCode,
                }
            }
        },
    };

    tracing::debug!(
        exit_code = outcome.exit_code,
        lines,
        success = verdict.is_success(),
        "render task finished"
    );
    sink.emit(ReportEvent::Completed {
        verdict: verdict.clone(),
    })
    .await;

    Ok(report(
        verdict,
        Some(outcome.exit_code),
        started_at,
        &dispatcher,
        lines,
        &ring_out,
        &ring_err,
    ))
}

/// Dispatch one line and forward its effects. Returns the failure reason
/// when the line is fatal. Stderr lines are only forwarded unless
/// `dispatch_stderr` is set.
async fn handle_line(
    dispatcher: &mut LineDispatcher,
    sink: &mut dyn ReportSink,
    tap: LineTap,
    dispatch_stderr: bool,
) -> Option<String> {
    if tap.stream == LineStream::Stderr && !dispatch_stderr {
        sink.emit(ReportEvent::Line {
            stream: tap.stream,
            text: tap.line,
        })
        .await;
        return None;
    }

    let effects = dispatcher.dispatch(&tap.line);
    if !effects.is_suppressed() {
        sink.emit(ReportEvent::Line {
            stream: tap.stream,
            text: tap.line,
        })
        .await;
    }

    let mut failure = None;
    for effect in effects {
        let ev = match effect {
            Effect::UpdateProgress(percent) => ReportEvent::Progress { percent },
            Effect::UpdateStatus(message) => ReportEvent::Status { message },
            Effect::SuppressLine => continue,
            Effect::Fail(reason) => {
                failure.get_or_insert_with(|| reason.clone());
                ReportEvent::Failed { reason }
            }
            Effect::LogWarning(message) => ReportEvent::Warning { message },
            Effect::LogInfo(message) => ReportEvent::Info { message },
        };
        sink.emit(ev).await;
    }
    failure
}

fn report(
    verdict: TaskVerdict,
    exit_code: Option<i32>,
    started_at: Instant,
    dispatcher: &LineDispatcher,
    lines: u64,
    ring_out: &RingBytes,
    ring_err: &RingBytes,
) -> TaskReport {
    let state = dispatcher.state();
    TaskReport {
        verdict,
        exit_code,
        duration_ms: started_at.elapsed().as_millis() as u64,
        progress_percent: state.progress_percent,
        finished_frames: state.finished_frame_count,
        status_message: state.status_message.clone(),
        lines,
        stdout_tail: String::from_utf8_lossy(&ring_out.to_bytes()).into_owned(),
        stderr_tail: String::from_utf8_lossy(&ring_err.to_bytes()).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::Arc;

    use async_trait::async_trait;
    use tokio::io::AsyncRead;
    use tokio::sync::Notify;

    use super::*;
    use crate::dispatch::DispatchOptions;
    use crate::job::FrameRange;
    use crate::matcher::RuleSet;
    use crate::renderer::RendererKind;
    use crate::runner::output::ChannelSink;
    use crate::runner::types::Signal;

    struct ScriptedSession {
        stdout: Option<String>,
        stderr: Option<String>,
        exit_code: i32,
        hold_until_killed: bool,
        killed: Arc<Notify>,
    }

    #[async_trait]
    impl RunnerSession for ScriptedSession {
        fn stdout(&mut self) -> Option<Box<dyn AsyncRead + Unpin + Send>> {
            self.stdout
                .take()
                .map(|s| Box::new(Cursor::new(s.into_bytes())) as Box<dyn AsyncRead + Unpin + Send>)
        }

        fn stderr(&mut self) -> Option<Box<dyn AsyncRead + Unpin + Send>> {
            let text = self.stderr.take().unwrap_or_default();
            Some(Box::new(Cursor::new(text.into_bytes())))
        }

        async fn signal(&mut self, _signal: Signal) -> anyhow::Result<()> {
            self.killed.notify_one();
            Ok(())
        }

        async fn wait(&mut self) -> anyhow::Result<RunOutcome> {
            if self.hold_until_killed {
                self.killed.notified().await;
                anyhow::bail!("killed");
            }
            Ok(RunOutcome {
                exit_code: self.exit_code,
                duration_ms: None,
            })
        }
    }

    fn session(output: &str, exit_code: i32, hold_until_killed: bool) -> Box<dyn RunnerSession> {
        Box::new(ScriptedSession {
            stdout: Some(output.to_string()),
            stderr: None,
            exit_code,
            hold_until_killed,
            killed: Arc::new(Notify::new()),
        })
    }

    fn dispatcher(frames: FrameRange) -> LineDispatcher {
        LineDispatcher::new(
            RuleSet::build(&RendererKind::MayaSoftware, None),
            frames,
            DispatchOptions::default(),
        )
    }

    async fn run(
        session: Box<dyn RunnerSession>,
        frames: FrameRange,
        ignore_211: bool,
    ) -> (TaskReport, Vec<ReportEvent>) {
        run_with(session, frames, ignore_211, ControlConfig::default()).await
    }

    async fn run_with(
        session: Box<dyn RunnerSession>,
        frames: FrameRange,
        ignore_211: bool,
        control: ControlConfig,
    ) -> (TaskReport, Vec<ReportEvent>) {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut sink = ChannelSink::new(tx);
        let report = run_task_runtime(RunTaskRuntimeInput {
            session,
            dispatcher: dispatcher(frames),
            control_cfg: &control,
            ignore_error_211: ignore_211,
            sink: &mut sink,
        })
        .await
        .unwrap();
        drop(sink);
        let mut events = Vec::new();
        while let Some(ev) = rx.recv().await {
            events.push(ev);
        }
        (report, events)
    }

    #[tokio::test]
    async fn lines_written_before_exit_are_drained() {
        let (report, events) = run(
            session("Result: frame 1\n| render done\n| render done\n", 0, false),
            FrameRange::new(1, 2),
            false,
        )
        .await;

        assert!(report.verdict.is_success());
        assert_eq!(report.exit_code, Some(0));
        assert_eq!(report.finished_frames, 2);
        assert_eq!(report.progress_percent, 100.0);
        assert_eq!(report.lines, 3);
        assert!(report.stdout_tail.contains("render done"));
        assert!(matches!(events.last(), Some(ReportEvent::Completed { .. })));
    }

    #[tokio::test]
    async fn fatal_line_kills_the_renderer() {
        let (report, events) = run(
            session("Error: Cannot load scene /jobs/missing.mb\nnever seen\n", 0, true),
            FrameRange::new(1, 10),
            false,
        )
        .await;

        assert_eq!(report.exit_code, None);
        match report.verdict {
            TaskVerdict::Failed { reason, kind } => {
                assert_eq!(kind, FailureKind::Render);
                assert!(reason.contains("Cannot load scene"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(events
            .iter()
            .any(|e| matches!(e, ReportEvent::Failed { .. })));
        assert!(!events.iter().any(
            |e| matches!(e, ReportEvent::Line { text, .. } if text == "never seen")
        ));
    }

    fn stderr_session(stderr: &str) -> Box<dyn RunnerSession> {
        Box::new(ScriptedSession {
            stdout: Some(String::new()),
            stderr: Some(stderr.to_string()),
            exit_code: 0,
            hold_until_killed: false,
            killed: Arc::new(Notify::new()),
        })
    }

    #[tokio::test]
    async fn stderr_rules_follow_the_control_switch() {
        let line = "// Error: Cannot load scene /jobs/missing.mb\n";

        let (report, _) = run(stderr_session(line), FrameRange::single(1), false).await;
        assert_eq!(
            report.verdict,
            TaskVerdict::Failed {
                reason: "// Error: Cannot load scene /jobs/missing.mb".into(),
                kind: FailureKind::Render,
            }
        );

        let control = ControlConfig {
            dispatch_stderr: false,
            ..ControlConfig::default()
        };
        let (report, events) =
            run_with(stderr_session(line), FrameRange::single(1), false, control).await;
        assert!(report.verdict.is_success());
        assert!(events.contains(&ReportEvent::Line {
            stream: LineStream::Stderr,
            text: "// Error: Cannot load scene /jobs/missing.mb".into(),
        }));
        assert!(!events.iter().any(|e| matches!(e, ReportEvent::Failed { .. })));
    }

    #[tokio::test]
    async fn exit_code_decides_when_output_is_clean() {
        let (report, _) = run(session("", 211, false), FrameRange::single(1), true).await;
        assert!(matches!(
            report.verdict,
            TaskVerdict::Succeeded { note: Some(_) }
        ));

        let (report, events) = run(session("", 3, false), FrameRange::single(1), false).await;
        assert!(matches!(
            report.verdict,
            TaskVerdict::Failed {
                kind: FailureKind::ExitCode,
                ..
            }
        ));
        assert!(events.contains(&ReportEvent::Failed {
            reason: "Renderer returned non-zero error code 3. Check the renderer's output."
                .to_string()
        }));
    }
}
