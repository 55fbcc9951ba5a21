//! Task assembly: job settings, command line, session environment and the
//! sinks a run reports to.
use std::path::Path;

use mayacmd_core::api as core_api;

use crate::commands::cli::TaskArgs;
use crate::progress;

/// Everything decided before the renderer starts.
#[derive(Debug)]
pub struct PreparedTask {
    pub settings: core_api::JobSettings,
    pub task: core_api::TaskContext,
    pub command_line: core_api::CommandLine,
}

pub struct RunOptions {
    pub executable: String,
    pub events_path: Option<String>,
    pub progress: bool,
    pub echo: bool,
}

pub fn load_config(path: Option<&Path>) -> Result<core_api::AppConfig, core_api::CliError> {
    let loaded = match path {
        Some(p) => core_api::load_from_path(p).map_err(|e| core_api::ConfigError::Read {
            path: p.display().to_string(),
            message: format!("{e:#}"),
        }),
        None => core_api::load_default().map_err(|e| core_api::ConfigError::Read {
            path: "config.toml".to_string(),
            message: format!("{e:#}"),
        }),
    };
    Ok(loaded?)
}

pub fn prepare_task(
    args: &TaskArgs,
    cfg: &core_api::AppConfig,
) -> Result<PreparedTask, core_api::CliError> {
    let settings = core_api::JobSettings::from_path(&args.job)?;

    let gpu_affinity = match args.gpu_affinity.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => Some(core_api::parse_devices(raw)?),
        _ => None,
    };
    let task = core_api::TaskContext {
        frames: core_api::FrameRange::new(args.start, args.end),
        task_id: args.task_id.clone(),
        thread_number: args.thread,
        worker_name: args.worker.clone(),
        tile_job: args.tile_job,
        gpu_affinity,
    };

    let command_line = core_api::build_command_line(&settings, &task, &cfg.plugin)?;
    tracing::debug!(renderer = %settings.renderer, args = %command_line, "command line built");

    Ok(PreparedTask {
        settings,
        task,
        command_line,
    })
}

#[tracing::instrument(name = "cli.run_task", skip_all, fields(task_id = %prepared.task.task_id))]
pub async fn run_prepared(
    prepared: &PreparedTask,
    cfg: &core_api::AppConfig,
    runner: &dyn core_api::RunnerPlugin,
    opts: RunOptions,
) -> Result<core_api::TaskReport, core_api::CliError> {
    let start = core_api::RunnerStartArgs {
        cmd: opts.executable,
        args: prepared.command_line.as_slice().to_vec(),
        envs: core_api::session_environment(&prepared.settings),
        cwd: None,
    };

    let mut events_cfg = cfg.events_out.clone();
    if let Some(path) = opts.events_path.filter(|p| !p.trim().is_empty()) {
        events_cfg.enabled = true;
        events_cfg.path = path;
    }
    let events_out = core_api::start_events_out(&events_cfg)
        .await
        .map_err(core_api::CliError::Command)?;

    let mut sink = core_api::FanoutSink::new().with(core_api::LogSink::new(opts.echo && !opts.progress));
    if let Some(out) = events_out {
        sink.push(Box::new(core_api::EventsSink::new(out, prepared.task.task_id.clone())));
    }
    let monitor = if opts.progress {
        let (channel, handle) = progress::spawn_monitor(opts.echo);
        sink.push(Box::new(channel));
        Some(handle)
    } else {
        None
    };

    tracing::info!(
        runner = runner.name(),
        cmd = %start.cmd,
        frames = %format!("{}-{}", prepared.task.frames.start, prepared.task.frames.end),
        "starting render task"
    );
    let session = runner
        .start_session(&start)
        .await
        .map_err(|e| core_api::RunnerError::Spawn(format!("{e:#}")))?;

    let dispatcher = core_api::LineDispatcher::for_task(
        &prepared.settings,
        &prepared.task,
        &cfg.plugin,
        prepared.command_line.to_string(),
    );
    let report = core_api::run_task(core_api::RunTaskArgs {
        session,
        dispatcher,
        control: &cfg.control,
        ignore_error_211: prepared.settings.ignore_error_211,
        sink: &mut sink,
    })
    .await?;

    drop(sink);
    if let Some(handle) = monitor {
        if let Err(e) = handle.await {
            tracing::debug!(error = %e, "progress monitor stopped");
        }
    }

    tracing::info!(
        success = report.verdict.is_success(),
        exit_code = ?report.exit_code,
        duration_ms = report.duration_ms,
        frames = report.finished_frames,
        "render task finished"
    );
    Ok(report)
}

pub fn exit_code_for_report(report: &core_api::TaskReport) -> i32 {
    if report.verdict.is_success() {
        0
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn task_args(job: &Path) -> TaskArgs {
        TaskArgs {
            job: job.to_path_buf(),
            start: 1,
            end: 4,
            task_id: "3".into(),
            thread: 0,
            worker: "render-01".into(),
            tile_job: false,
            gpu_affinity: Some("0, 2".into()),
        }
    }

    #[test]
    fn prepares_command_line_from_plugin_info() {
        let mut job = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            job,
            "Renderer=mayaSoftware\nVersion=2023\nSceneFile=/jobs/shot010.mb\nOutputFilePath=/renders/shot010"
        )
        .unwrap();

        let prepared = prepare_task(&task_args(job.path()), &core_api::AppConfig::default()).unwrap();
        let args = prepared.command_line.as_slice();
        assert_eq!(args.first().map(String::as_str), Some("-r"));
        assert_eq!(args.last().map(String::as_str), Some("/jobs/shot010.mb"));
        assert_eq!(prepared.command_line.value_of("-s"), Some("1"));
        assert_eq!(prepared.command_line.value_of("-rd"), Some("/renders/shot010"));
        assert_eq!(prepared.task.gpu_affinity, Some(vec![0, 2]));
    }

    #[test]
    fn missing_scene_file_is_a_config_error() {
        let mut job = tempfile::NamedTempFile::new().unwrap();
        writeln!(job, "Renderer=arnold\nVersion=2023").unwrap();

        let err = prepare_task(&task_args(job.path()), &core_api::AppConfig::default()).unwrap_err();
        assert!(matches!(err, core_api::CliError::Config(_)));
    }

    #[test]
    fn missing_config_file_is_reported_as_read_error() {
        let err = load_config(Some(Path::new("/nonexistent/mayacmd.toml"))).unwrap_err();
        assert!(matches!(
            err,
            core_api::CliError::Config(core_api::ConfigError::Read { .. })
        ));
    }
}
