//! Per-renderer argument table.

use crate::config::PluginConfig;
use crate::error::ConfigError;
use crate::job::{normalize_path, JobSettings, TaskContext};
use crate::renderer::RendererKind;

use super::command::CommandLine;
use super::gpu::{self, GpuRequest};
use super::region::tile_arguments;

/// Renderer-specific part of the command line plus the flag spellings the
/// common arguments must use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererArgs {
    pub args: CommandLine,
    pub by_frame_flag: &'static str,
    pub layer_flag: &'static str,
}

/// Verbosity bounds per MtoA major version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArnoldVerbosity {
    pub default: i64,
    pub max: i64,
}

pub fn arnold_verbosity(mtoa_version: i64) -> ArnoldVerbosity {
    match mtoa_version {
        1 | 2 => ArnoldVerbosity { default: 1, max: 2 },
        _ => ArnoldVerbosity { default: 2, max: 3 },
    }
}

pub fn mental_ray_verbosity(label: &str) -> u8 {
    match label {
        "No Messages" => 0,
        "Fatal Messages Only" => 1,
        "Error Messages" => 2,
        "Warning Messages" => 3,
        "Info Messages" => 4,
        "Detailed Messages (Debug)" => 6,
        _ => 5,
    }
}

fn anti_aliasing(label: &str) -> &str {
    match label {
        "low" => "3",
        "medium" => "2",
        "high" => "1",
        "highest" => "0",
        other => other,
    }
}

pub fn renderer_arguments(
    settings: &JobSettings,
    task: &TaskContext,
    plugin: &PluginConfig,
) -> Result<RendererArgs, ConfigError> {
    let mut out = RendererArgs {
        args: CommandLine::new(),
        by_frame_flag: "-b",
        layer_flag: "-rl",
    };

    if settings.renders_all_layers() {
        tracing::info!("Rendering all layers - using the renderer(s) set in the Maya render settings.");
        out.args.args(["-r", "file"]);
        return Ok(out);
    }

    let e = |key: &str| settings.entry(key);
    let cmd = &mut out.args;

    match &settings.renderer {
        RendererKind::Vray => {
            tracing::info!("Rendering with VRay.");
            cmd.args(["-r", "vray"])
                .args(tile_arguments(settings, task)?)
                .arg("-threads")
                .arg(e("MaxProcessors"));
            size(cmd, settings);
        }
        RendererKind::VrayExport => {
            tracing::info!("Exporting with VRay");
            let file = settings.plugin_info().require("VRayExportFile")?.trim().to_string();
            cmd.args(["-r", "vray", "-exportFileName"])
                .arg(file)
                .arg("-noRender");
            size(cmd, settings);
        }
        RendererKind::MayaKrakatoa => {
            tracing::info!("Exporting with Krakatoa");
            size(cmd, settings);
        }
        RendererKind::Maxwell => {
            tracing::info!("Rendering with Maxwell.");
            out.layer_flag = "-l";
            cmd.args(["-r", "maxwell", "-nt"])
                .arg(e("MaxProcessors"))
                .opt("-rt", &e("MaxwellRenderTime"))
                .opt("-sl", &e("MaxwellSamplingLevel"));
            size(cmd, settings);

            let mut maxwell_cmd = Vec::new();
            let worker = task.worker_name.trim().to_lowercase();
            let interactive = plugin
                .maxwell_interactive_workers
                .iter()
                .any(|w| w.trim().to_lowercase() == worker);
            if interactive {
                tracing::info!("This Worker is in the Maxwell interactive license list - an interactive license for Maxwell will be used instead of a render license");
            } else {
                maxwell_cmd.push("-node");
            }
            if settings.bool_entry("MaxwellResumeRender")? {
                maxwell_cmd.push("-trytoresume");
            }
            if !maxwell_cmd.is_empty() {
                cmd.arg("-cmd").arg(maxwell_cmd.join(" "));
            }
        }
        RendererKind::MaxwellExport => {
            tracing::info!("Exporting to Maxwell MXS file.");
            out.layer_flag = "-l";
            cmd.args(["-r", "maxwell", "-mxs"])
                .arg(e("MaxwellMXSFile").replace('\\', "/"))
                .args(["-eo", "true"]);
        }
        RendererKind::Arnold | RendererKind::ArnoldExport => {
            tracing::info!("Rendering with Arnold.");
            let bounds = arnold_verbosity(settings.mtoa_version);
            let verbosity = settings
                .plugin_info()
                .get_int_or("ArnoldVerbose", bounds.default)?
                .min(bounds.max);
            let export = settings.renderer == RendererKind::ArnoldExport;
            cmd.args(["-r", "arnold"])
                .args(tile_arguments(settings, task)?)
                .arg("-ai:lve")
                .arg(verbosity.to_string())
                .args(["-rt", if export { "1" } else { "0" }]);
            size(cmd, settings);
            cmd.opt("-percentRes", &e("ImageScale"));
        }
        RendererKind::Redshift => {
            tracing::info!("Rendering with Redshift.");
            cmd.args(["-r", "redshift"]).args(tile_arguments(settings, task)?);
            size(cmd, settings);
            cmd.args(gpu::redshift_arguments(&GpuRequest::from_settings(settings, task)?));
        }
        RendererKind::Gelato => {
            tracing::info!("Rendering with Gelato.");
            cmd.args(["-r", "gelato", "-n"])
                .arg(e("MaxProcessors"))
                .opt("-mb", &e("MotionBlur"));
            size(cmd, settings);
        }
        RendererKind::ThreeDelight => {
            tracing::info!("Rendering with 3delight.");
            out.by_frame_flag = "-inc";
            out.layer_flag = "-lr";
            cmd.args(["-r", "3delight"])
                .args(tile_arguments(settings, task)?)
                .arg("-cpus")
                .arg(e("MaxProcessors"));
            size(cmd, settings);
        }
        RendererKind::FinalRender => {
            tracing::info!("Rendering with Final Render");
            cmd.args(["-r", "fr", "-v", "2"])
                .args(tile_arguments(settings, task)?)
                .arg("-n")
                .arg(e("MaxProcessors"))
                .opt("-mb", &e("MotionBlur"));
            size(cmd, settings);
        }
        RendererKind::Renderman22 => {
            tracing::info!("Rendering with Renderman for Maya");
            cmd.args(["-r", "renderman"])
                .args(tile_arguments(settings, task)?)
                .arg("-t")
                .arg(settings.int_entry("MaxProcessors")?.to_string());
            resolution(cmd, settings)?;
            let dir = &settings.output_file_path;
            let prefix = output_prefix(settings, task);
            if !dir.is_empty() {
                if prefix.is_empty() {
                    cmd.arg("-rd").arg(dir.as_str());
                } else {
                    cmd.arg("-imageFile").arg(format!("{dir}/{prefix}"));
                }
            }
        }
        RendererKind::Renderman22Export => {
            tracing::info!("Exporting with Renderman for Maya");
            cmd.args(["-r", "renderman", "-t"])
                .arg(settings.int_entry("MaxProcessors")?.to_string())
                .arg("-rib");
            resolution(cmd, settings)?;
            let dir = normalize_path(&e("RIBDirectory"));
            let prefix = e("RIBPrefix");
            if !dir.is_empty() && !prefix.is_empty() {
                cmd.arg("-ribFile").arg(format!("{dir}/{prefix}"));
            }
        }
        RendererKind::Renderman | RendererKind::RendermanRis => {
            cmd.args(["-r", "rman"]);
            if settings.renderer == RendererKind::Renderman {
                tracing::info!("Rendering with Renderman for Maya");
            } else {
                tracing::info!("Rendering with Renderman RIS for Maya");
                cmd.arg("-ris");
            }
            cmd.args(tile_arguments(settings, task)?)
                .arg("-n")
                .arg(e("MaxProcessors"));
            let blur = e("MotionBlur");
            if !blur.is_empty() {
                cmd.args(["-setAttr", "motionBlur"]).arg(blur);
            }
            string_resolution(cmd, settings);
        }
        RendererKind::RendermanExport => {
            tracing::info!("Exporting with Renderman for Maya");
            cmd.args(["-r", "rib"]);
            if settings.bool_entry("RenderWithRis")? {
                cmd.arg("-ris");
            }
            cmd.arg("-n").arg(e("MaxProcessors"));
            string_resolution(cmd, settings);
        }
        RendererKind::Turtle => {
            tracing::info!("Rendering with Turtle");
            cmd.args(["-r", "turtle"]).args(tile_arguments(settings, task)?);
            size(cmd, settings);
            cmd.opt("-percentRes", &e("ImageScale"));
        }
        RendererKind::MentalRay => {
            tracing::info!("Rendering with Mental Ray");
            cmd.args(["-r", "mr", "-v"])
                .arg(mental_ray_verbosity(&e("MentalRayVerbose")).to_string())
                .args(tile_arguments(settings, task)?);

            let threads = settings.int_entry("MaxProcessors")?;
            if threads > 0 {
                cmd.arg("-rt").arg(threads.to_string());
            } else {
                cmd.arg("-art");
            }

            if settings.bool_entry("AutoMemoryLimit")? {
                cmd.arg("-aml");
            } else {
                let limit = settings.int_entry("MemoryLimit")?;
                if limit >= 0 {
                    cmd.arg("-mem").arg(limit.to_string());
                }
            }
            size(cmd, settings);
            cmd.opt("-percentRes", &e("ImageScale"));
            if settings.version.at_least(2014, false) {
                skip_existing(cmd, settings);
            }
        }
        RendererKind::MentalRayExport => {
            tracing::info!("Exporting with Mental Ray");
            mental_ray_export(cmd, settings)?;
        }
        RendererKind::MayaHardware | RendererKind::MayaHardware2 => {
            if settings.renderer == RendererKind::MayaHardware {
                tracing::info!("Rendering with Maya Hardware");
                cmd.args(["-r", "hw"]);
            } else {
                tracing::info!("Rendering with Maya Hardware 2");
                cmd.args(["-r", "hw2"]);
            }
            size(cmd, settings);
            cmd.opt("-percentRes", &e("ImageScale"))
                .opt("-mb", &e("MotionBlur"));
            skip_existing(cmd, settings);
        }
        RendererKind::MayaVector => {
            tracing::info!("Rendering with Maya Vector");
            cmd.args(["-r", "vr"]);
            size(cmd, settings);
            cmd.opt("-percentRes", &e("ImageScale"));
            skip_existing(cmd, settings);
        }
        RendererKind::MayaSoftware => {
            tracing::info!("Rendering with Maya Software");
            cmd.args(["-r", "sw"])
                .args(tile_arguments(settings, task)?)
                .arg("-n")
                .arg(e("MaxProcessors"))
                .opt("-eaa", anti_aliasing(&e("AntiAliasing")))
                .opt("-mb", &e("MotionBlur"));
            size(cmd, settings);
            cmd.opt("-percentRes", &e("ImageScale"));
            skip_existing(cmd, settings);
        }
        RendererKind::OctaneRender => {
            tracing::info!("Rendering with Octane");
            cmd.args(["-r", "octane", "-v", "true"])
                .opt("-smp", &e("OctaneMaxSamples"));
            size(cmd, settings);
            cmd.args(gpu::octane_arguments(&GpuRequest::from_settings(settings, task)?)?);
        }
        RendererKind::CausticVisualizer => {
            tracing::info!("Rendering with Caustic Visualizer");
            cmd.args(["-r", "CausticVisualizer", "-cmvl", "4"]);
            size(cmd, settings);
        }
        RendererKind::Iray => {
            tracing::info!("Rendering with IRay");
            cmd.args(["-r", "Iray"]).args(tile_arguments(settings, task)?);
            size(cmd, settings);
            cmd.opt("-percentRes", &e("ImageScale"))
                .opt("-maxSamples", &e("IRayMaxSamples"));

            if settings.bool_entry("IRayUseCPUs")? {
                let load = e("IRayCPULoad");
                tracing::info!(cpu_load = %load, "Using CPUs for rendering with IRay");
                cmd.args(["-rOn", "0"]).opt("-cl", &load);
            } else {
                cmd.args(["-rOff", "0"]);
            }
            cmd.args(gpu::iray_arguments(&GpuRequest::from_settings(settings, task)?)?);
            skip_existing(cmd, settings);
        }
        RendererKind::File | RendererKind::Other(_) => {
            tracing::warn!(
                renderer = %settings.renderer,
                "renderer is unsupported, falling back to generic render arguments"
            );
            cmd.args(["-r", "file"]);
        }
    }

    if !settings.render_layer.is_empty() {
        cmd.arg(out.layer_flag).arg(settings.render_layer.as_str());
    }
    Ok(out)
}

fn size(cmd: &mut CommandLine, settings: &JobSettings) {
    cmd.opt("-x", &settings.entry("ImageWidth"))
        .opt("-y", &settings.entry("ImageHeight"));
}

/// `-res W H` when both are positive integers.
fn resolution(cmd: &mut CommandLine, settings: &JobSettings) -> Result<(), ConfigError> {
    let w = settings.int_entry("ImageWidth")?;
    let h = settings.int_entry("ImageHeight")?;
    if w > 0 && h > 0 {
        cmd.arg("-res").arg(w.to_string()).arg(h.to_string());
    }
    Ok(())
}

/// `-res W H` when both entries are present.
fn string_resolution(cmd: &mut CommandLine, settings: &JobSettings) {
    let w = settings.entry("ImageWidth");
    let h = settings.entry("ImageHeight");
    if !w.is_empty() && !h.is_empty() {
        cmd.arg("-res").arg(w).arg(h);
    }
}

fn skip_existing(cmd: &mut CommandLine, settings: &JobSettings) {
    if settings.skip_existing_frames {
        cmd.args(["-skipExistingFrames", "true"]);
    }
}

/// Output prefix; tile jobs use the per-task region prefix.
pub fn output_prefix(settings: &JobSettings, task: &TaskContext) -> String {
    let raw = if settings.region_rendering && task.tile_job {
        settings.entry(&format!("RegionPrefix{}", task.task_id))
    } else {
        settings.output_file_prefix.clone()
    };
    raw.trim().replace('\\', "/")
}

fn mental_ray_export(cmd: &mut CommandLine, settings: &JobSettings) -> Result<(), ConfigError> {
    let e = |key: &str| settings.entry(key);
    let file = settings.plugin_info().require("MentalRayExportfile")?.trim().to_string();
    cmd.args(["-r", "mi", "-file"]).arg(file);

    let binary = settings.bool_entry("MentalRayExportBinary")?;
    cmd.arg("-binary").arg(binary.to_string());
    if !binary {
        cmd.arg("-tabstop").arg(e("MentalRayExportTabStop"));
    }

    let per_frame = settings.int_entry("MentalRayExportPerFrame")?;
    cmd.arg("-perframe").arg(per_frame.to_string());
    if per_frame != 0 {
        cmd.arg("-padframe").arg(e("MentalRayExportPadFrame"));
    }

    let per_layer = settings.bool_entry("MentalRayExportPerLayer")?;
    cmd.args(["-perlayer", if per_layer { "1" } else { "0" }]);

    let path_names = e("MentalRayExportPathNames");
    if !path_names.is_empty() {
        let mapped: String = path_names
            .chars()
            .map(|c| match c {
                '1' => 'a',
                '2' => 'r',
                '3' => 'n',
                c => c,
            })
            .collect();
        cmd.arg("-exportPathNames").arg(mapped);
    }

    if settings.bool_entry("MentalRayExportFragment")? {
        cmd.arg("-fragmentExport");
        if settings.bool_entry("MentalRayExportFragmentMaterials")? {
            cmd.arg("-fragmentMaterials");
        }
        if settings.bool_entry("MentalRayExportFragmentShaders")? {
            cmd.arg("-fragmentIncomingShdrs");
        }
        if settings.bool_entry("MentalRayExportFragmentChildDag")? {
            cmd.arg("-fragmentChildDag");
        }
    }

    cmd.opt("-exportFilterString", &e("MentalRayExportFilterString"))
        .opt("-x", &e("ImageWidth"))
        .opt("-y", &e("ImageHeight"))
        .opt("-percentRes", &e("ImageScale"));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::{FrameRange, PluginInfo};
    use pretty_assertions::assert_eq;

    fn settings(pairs: &[(&str, &str)]) -> JobSettings {
        let mut info = PluginInfo::from_pairs([("Version", "2023"), ("SceneFile", "/jobs/shot.mb")]);
        for (k, v) in pairs {
            info.insert(k, v);
        }
        JobSettings::from_plugin_info(info).unwrap()
    }

    fn build(pairs: &[(&str, &str)]) -> RendererArgs {
        renderer_arguments(
            &settings(pairs),
            &TaskContext::new(FrameRange::new(1, 10)),
            &PluginConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn arnold_verbosity_is_clamped_per_mtoa_version() {
        assert_eq!(arnold_verbosity(2), ArnoldVerbosity { default: 1, max: 2 });
        assert_eq!(arnold_verbosity(5), ArnoldVerbosity { default: 2, max: 3 });

        let out = build(&[("Renderer", "arnold"), ("ArnoldVerbose", "9"), ("MayaToArnoldVersion", "1")]);
        assert_eq!(out.args.value_of("-ai:lve"), Some("2"));
        assert_eq!(out.args.value_of("-rt"), Some("0"));

        let out = build(&[("Renderer", "arnoldexport"), ("MayaToArnoldVersion", "4")]);
        assert_eq!(out.args.value_of("-ai:lve"), Some("2"));
        assert_eq!(out.args.value_of("-rt"), Some("1"));
    }

    #[test]
    fn maya_software_maps_anti_aliasing_labels() {
        let out = build(&[
            ("Renderer", "mayaSoftware"),
            ("AntiAliasing", "highest"),
            ("ImageWidth", "1920"),
            ("MaxProcessors", "8"),
        ]);
        assert_eq!(
            out.args.as_slice(),
            ["-r", "sw", "-n", "8", "-eaa", "0", "-x", "1920"]
        );
    }

    #[test]
    fn three_delight_uses_its_own_flag_spellings() {
        let out = build(&[("Renderer", "3delight"), ("RenderLayer", "beauty")]);
        assert_eq!(out.by_frame_flag, "-inc");
        assert_eq!(out.args.value_of("-lr"), Some("beauty"));
    }

    #[test]
    fn all_layers_fall_back_to_file() {
        let out = build(&[("Renderer", "vray"), ("UsingRenderLayers", "true")]);
        assert_eq!(out.args.as_slice(), ["-r", "file"]);
        let out = build(&[("Renderer", "cycles")]);
        assert_eq!(out.args.as_slice(), ["-r", "file"]);
    }

    #[test]
    fn vray_export_requires_export_file() {
        let err = renderer_arguments(
            &settings(&[("Renderer", "vrayexport")]),
            &TaskContext::new(FrameRange::single(1)),
            &PluginConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err, ConfigError::missing("VRayExportFile"));
    }

    #[test]
    fn maxwell_uses_node_license_unless_interactive() {
        let s = settings(&[("Renderer", "maxwell"), ("MaxwellResumeRender", "true")]);
        let mut task = TaskContext::new(FrameRange::single(1));
        task.worker_name = "Render-07".into();

        let out = renderer_arguments(&s, &task, &PluginConfig::default()).unwrap();
        assert_eq!(out.args.value_of("-cmd"), Some("-node -trytoresume"));

        let plugin = PluginConfig {
            maxwell_interactive_workers: vec!["render-07".into()],
            ..PluginConfig::default()
        };
        let out = renderer_arguments(&s, &task, &plugin).unwrap();
        assert_eq!(out.args.value_of("-cmd"), Some("-trytoresume"));
    }

    #[test]
    fn mental_ray_export_maps_path_name_codes() {
        let out = build(&[
            ("Renderer", "mentalRayExport"),
            ("MentalRayExportfile", "/exports/shot.mi"),
            ("MentalRayExportPathNames", "1123"),
        ]);
        assert_eq!(out.args.value_of("-file"), Some("/exports/shot.mi"));
        assert_eq!(out.args.value_of("-tabstop"), Some("8"));
        assert_eq!(out.args.value_of("-padframe"), Some("4"));
        assert_eq!(out.args.value_of("-exportPathNames"), Some("aarn"));
    }

    #[test]
    fn renderman22_writes_image_file_from_directory_and_prefix() {
        let out = build(&[
            ("Renderer", "renderman22"),
            ("OutputFilePath", "/renders/shot/"),
            ("OutputFilePrefix", "beauty"),
            ("ImageWidth", "1280"),
            ("ImageHeight", "720"),
        ]);
        assert_eq!(out.args.value_of("-imageFile"), Some("/renders/shot/beauty"));
        assert_eq!(out.args.value_of("-res"), Some("1280"));
    }
}
