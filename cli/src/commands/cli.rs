use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "mayacmd", version, about = "Drive Maya batch renders one task at a time")]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Worker configuration file. Defaults to ~/.mayacmd/config.toml, then ./config.toml.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Host metadata describing the task to render.
#[derive(ClapArgs, Debug, Clone)]
pub struct TaskArgs {
    /// Plugin info file (`Key=Value` lines).
    #[arg(long)]
    pub job: PathBuf,

    #[arg(long, allow_negative_numbers = true)]
    pub start: i64,

    #[arg(long, allow_negative_numbers = true)]
    pub end: i64,

    #[arg(long, default_value = "0")]
    pub task_id: String,

    /// Render thread index on this worker.
    #[arg(long, default_value_t = 0)]
    pub thread: u32,

    #[arg(long, default_value = "")]
    pub worker: String,

    /// Each task renders one region of a single frame.
    #[arg(long)]
    pub tile_job: bool,

    /// GPUs this worker is restricted to, e.g. `0,1`.
    #[arg(long)]
    pub gpu_affinity: Option<String>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ArgsArgs {
    #[command(flatten)]
    pub task: TaskArgs,

    /// Also print the session environment as KEY=VALUE lines.
    #[arg(long)]
    pub show_env: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct RenderArgs {
    #[command(flatten)]
    pub task: TaskArgs,

    /// Render executable, bypassing the configured candidates.
    #[arg(long)]
    pub executable: Option<String>,

    /// Write report events as JSONL to this path (`stdout:` for standard output).
    #[arg(long)]
    pub events: Option<String>,

    /// Echo renderer output instead of drawing a progress bar.
    #[arg(long)]
    pub no_progress: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ReplayArgs {
    #[command(flatten)]
    pub task: TaskArgs,

    /// Captured renderer output to feed through the task loop.
    #[arg(long)]
    pub log: PathBuf,

    /// Exit code the replayed renderer reports.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub exit_code: i32,

    #[arg(long)]
    pub events: Option<String>,

    /// Echo every replayed line.
    #[arg(long)]
    pub echo: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the Render command line for a task.
    Args(ArgsArgs),
    /// Run the renderer for a task.
    Render(RenderArgs),
    /// Classify a captured renderer log as if it came from a live task.
    Replay(ReplayArgs),
}
