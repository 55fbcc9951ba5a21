use mayacmd_core::api as core_api;

use crate::app;
use crate::commands::cli::ArgsArgs;

pub fn handle_args(args: ArgsArgs, cfg: &core_api::AppConfig) -> Result<i32, core_api::CliError> {
    let prepared = app::prepare_task(&args.task, cfg)?;
    println!("{}", prepared.command_line);
    if args.show_env {
        for (key, value) in core_api::session_environment(&prepared.settings) {
            println!("{key}={value}");
        }
    }
    Ok(0)
}
