use crate::config::PluginConfig;
use crate::error::ConfigError;
use crate::job::{JobSettings, MayaVersion, TaskContext};

use super::command::{split_options, CommandLine};
use super::table::{output_prefix, renderer_arguments};

/// Full argument list for one task: renderer arguments, common arguments,
/// user options and finally the scene file.
pub fn build_command_line(
    settings: &JobSettings,
    task: &TaskContext,
    plugin: &PluginConfig,
) -> Result<CommandLine, ConfigError> {
    let user_options = split_options(&settings.command_line_options);

    let mut cmd = CommandLine::new();
    if settings.use_only_command_line_options {
        tracing::info!("Using only the user supplied command line options");
        cmd.args(user_options).arg(settings.scene_file.as_str());
        return Ok(cmd);
    }

    let renderer = renderer_arguments(settings, task, plugin)?;
    cmd.args(renderer.args.into_vec());

    if settings.version == MayaVersion::new(2022, false) && plugin.use_python2 && !cfg!(target_os = "macos") {
        cmd.args(["-pythonver", "2"]);
    }

    if settings.animation {
        frame_arguments(&mut cmd, settings, task, renderer.by_frame_flag)?;
    }

    if settings.renderer.accepts_output_arguments() {
        if settings.local_rendering {
            tracing::debug!("local rendering requested, rendering to the network directory");
        }
        cmd.opt("-rd", &settings.output_file_path)
            .opt("-im", &output_prefix(settings, task));
    }

    cmd.opt("-cam", &settings.camera)
        .opt("-proj", &settings.project_path)
        .args(user_options)
        .arg(settings.scene_file.as_str());

    tracing::debug!(args = %cmd, "render command line built");
    Ok(cmd)
}

fn frame_arguments(
    cmd: &mut CommandLine,
    settings: &JobSettings,
    task: &TaskContext,
    by_frame_flag: &str,
) -> Result<(), ConfigError> {
    let frames = task.frames;
    let offset = settings.frame_number_offset;
    let renumber = settings.renderer.allows_frame_renumbering();

    if settings.render_half_frames {
        tracing::info!("Rendering half frames");
        if !renumber {
            return Err(ConfigError::HalfFramesUnsupported);
        }
        cmd.arg("-s")
            .arg(frames.start.to_string())
            .arg("-e")
            .arg(format!("{}.5", frames.end))
            .arg(by_frame_flag)
            .arg("0.5")
            .arg("-rfs")
            .arg((frames.start * 2 + offset * 2).to_string());
        return Ok(());
    }

    let end = if settings.region_rendering && task.tile_job {
        frames.start
    } else {
        frames.end
    };
    cmd.arg("-s")
        .arg(frames.start.to_string())
        .arg("-e")
        .arg(end.to_string())
        .arg(by_frame_flag)
        .arg("1");

    if offset != 0 {
        if renumber {
            cmd.arg("-rfs").arg((frames.start + offset).to_string());
        } else {
            tracing::warn!("Renumbering Frames is not supported by this renderer.");
        }
    }
    Ok(())
}
