use mayacmd_core::api as core_api;
use mayacmd_plugins::factory::{build_runner, RunnerSpec};

use crate::app::{self, RunOptions};
use crate::commands::cli::ReplayArgs;

pub async fn handle_replay(
    args: ReplayArgs,
    cfg: &core_api::AppConfig,
) -> Result<i32, core_api::CliError> {
    let prepared = app::prepare_task(&args.task, cfg)?;
    let runner = build_runner(&RunnerSpec::Replay {
        log_file: args.log.clone(),
        exit_code: args.exit_code,
    });

    let report = app::run_prepared(
        &prepared,
        cfg,
        runner.as_ref(),
        RunOptions {
            executable: "Render".to_string(),
            events_path: args.events,
            progress: false,
            echo: args.echo,
        },
    )
    .await?;

    match &report.verdict {
        core_api::TaskVerdict::Succeeded { note } => {
            println!("verdict: succeeded");
            if let Some(note) = note {
                println!("note: {note}");
            }
        }
        core_api::TaskVerdict::Failed { reason, kind } => {
            println!("verdict: failed ({kind:?})");
            println!("reason: {reason}");
        }
    }
    println!("progress: {}%", report.progress_percent);
    println!("finished frames: {}", report.finished_frames);
    if !report.status_message.is_empty() {
        println!("status: {}", report.status_message);
    }
    println!("lines: {}", report.lines);

    Ok(app::exit_code_for_report(&report))
}
