use crate::config::ControlConfig;
use crate::dispatch::LineDispatcher;
use crate::error::RunnerError;

use super::output::ReportSink;
use super::runtime;
use super::traits::RunnerSession;
use super::types::TaskReport;

pub struct RunTaskArgs<'a> {
    pub session: Box<dyn RunnerSession>,
    pub dispatcher: LineDispatcher,
    pub control: &'a ControlConfig,
    pub ignore_error_211: bool,
    pub sink: &'a mut dyn ReportSink,
}

pub async fn run_task(args: RunTaskArgs<'_>) -> Result<TaskReport, RunnerError> {
    runtime::run_task_runtime(runtime::RunTaskRuntimeInput {
        session: args.session,
        dispatcher: args.dispatcher,
        control_cfg: args.control,
        ignore_error_211: args.ignore_error_211,
        sink: args.sink,
    })
    .await
}
