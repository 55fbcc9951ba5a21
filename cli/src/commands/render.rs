use mayacmd_core::api as core_api;
use mayacmd_plugins::backend::resolve_render_executable;
use mayacmd_plugins::factory::{build_runner, RunnerSpec};

use crate::app::{self, RunOptions};
use crate::commands::cli::RenderArgs;

pub async fn handle_render(
    args: RenderArgs,
    cfg: &core_api::AppConfig,
) -> Result<i32, core_api::CliError> {
    let prepared = app::prepare_task(&args.task, cfg)?;
    let executable = resolve_render_executable(
        &prepared.settings.version,
        &cfg.plugin,
        args.executable.as_deref(),
    )?;

    let runner = build_runner(&RunnerSpec::Process);
    let report = app::run_prepared(
        &prepared,
        cfg,
        runner.as_ref(),
        RunOptions {
            executable: executable.display().to_string(),
            events_path: args.events,
            progress: !args.no_progress && atty::is(atty::Stream::Stderr),
            echo: true,
        },
    )
    .await?;
    Ok(app::exit_code_for_report(&report))
}
