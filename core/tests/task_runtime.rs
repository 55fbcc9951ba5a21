mod common;

use common::{fixture, init_tracing, settings, CollectSink, ScriptedSession};
use mayacmd_core::api::{
    build_command_line, run_task, ControlConfig, FailureKind, FrameRange, LineDispatcher,
    PluginConfig, ReportEvent, RunTaskArgs, TaskContext, TaskVerdict,
};

async fn run_fixture(
    pairs: &[(&str, &str)],
    frames: FrameRange,
    log: &str,
    exit_code: i32,
) -> (mayacmd_core::api::TaskReport, CollectSink) {
    init_tracing();
    let job = settings(pairs);
    let task = TaskContext::new(frames);
    let plugin = PluginConfig::default();
    let cmd = build_command_line(&job, &task, &plugin).unwrap();

    let mut sink = CollectSink::default();
    let control = ControlConfig::default();
    let report = run_task(RunTaskArgs {
        session: ScriptedSession::boxed(log, exit_code),
        dispatcher: LineDispatcher::for_task(&job, &task, &plugin, cmd.to_string()),
        control: &control,
        ignore_error_211: job.ignore_error_211,
        sink: &mut sink,
    })
    .await
    .unwrap();
    (report, sink)
}

#[tokio::test]
async fn clean_arnold_task_reaches_full_progress() {
    let log = fixture("arnold_two_frames.log");
    let (report, sink) = run_fixture(&[("Renderer", "arnold")], FrameRange::new(1, 2), &log, 0).await;

    assert_eq!(report.verdict, TaskVerdict::Succeeded { note: None });
    assert_eq!(report.exit_code, Some(0));
    assert_eq!(report.finished_frames, 2);
    assert_eq!(report.progress_percent, 100.0);
    assert_eq!(report.lines, log.lines().count() as u64);

    let progress = sink.progress();
    assert!(progress.windows(2).all(|w| w[0] <= w[1]), "{progress:?}");
    assert_eq!(sink.lines().len(), log.lines().count());
    assert!(matches!(
        sink.events.last(),
        Some(ReportEvent::Completed {
            verdict: TaskVerdict::Succeeded { .. }
        })
    ));
}

#[tokio::test]
async fn fatal_line_fails_even_with_a_clean_exit() {
    let log = fixture("software_license_failure.log");
    let (report, sink) = run_fixture(&[], FrameRange::single(1), &log, 0).await;

    match &report.verdict {
        TaskVerdict::Failed { reason, kind } => {
            assert_eq!(*kind, FailureKind::Render);
            assert!(reason.contains("could not get a license"));
        }
        other => panic!("expected a render failure, got {other:?}"),
    }
    assert!(sink
        .events
        .iter()
        .any(|e| matches!(e, ReportEvent::Failed { .. })));
}

#[tokio::test]
async fn error_211_is_ignored_when_the_job_allows_it() {
    let log = fixture("vray_two_frames.log");
    let (report, sink) = run_fixture(
        &[("Renderer", "vray"), ("IgnoreError211", "true")],
        FrameRange::new(1, 2),
        &log,
        211,
    )
    .await;

    assert!(report.verdict.is_success());
    assert_eq!(report.exit_code, Some(211));
    assert!(sink.events.iter().any(
        |e| matches!(e, ReportEvent::Info { message } if message.contains("error code 211"))
    ));

    let (report, _) = run_fixture(&[("Renderer", "vray")], FrameRange::new(1, 2), &log, 211).await;
    assert!(matches!(
        report.verdict,
        TaskVerdict::Failed {
            kind: FailureKind::ExitCode,
            ..
        }
    ));
}
