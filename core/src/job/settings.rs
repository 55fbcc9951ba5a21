use std::path::Path;

use crate::error::ConfigError;
use crate::renderer::RendererKind;

use super::plugin_info::PluginInfo;
use super::version::MayaVersion;

/// Every optional plugin info entry with a non-empty default. Entries not
/// listed here default to the empty string.
pub const DEFAULTS: &[(&str, &str)] = &[
    ("Renderer", "mayaSoftware"),
    ("StrictErrorChecking", "true"),
    ("IgnoreError211", "false"),
    ("Animation", "true"),
    ("RenderHalfFrames", "false"),
    ("FrameNumberOffset", "0"),
    ("RegionRendering", "false"),
    ("UsingRenderLayers", "false"),
    ("UseOnlyCommandLineOptions", "false"),
    ("LocalRendering", "false"),
    ("SkipExistingFrames", "false"),
    ("MaxProcessors", "0"),
    ("MayaToArnoldVersion", "2"),
    ("RenderSetupIncludeLights", "true"),
    ("UseLegacyRenderLayers", "false"),
    ("GPUsPerTask", "0"),
    ("MentalRayVerbose", "Progress Messages"),
    ("AutoMemoryLimit", "true"),
    ("MemoryLimit", "0"),
    ("MentalRayExportBinary", "false"),
    ("MentalRayExportTabStop", "8"),
    ("MentalRayExportPerFrame", "2"),
    ("MentalRayExportPadFrame", "4"),
    ("MentalRayExportPerLayer", "false"),
    ("MaxwellResumeRender", "false"),
    ("RenderWithRis", "false"),
    ("IRayUseCPUs", "false"),
];

pub fn default_for(key: &str) -> &'static str {
    DEFAULTS
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| *v)
        .unwrap_or("")
}

/// Validated job description. Built once per task before anything launches;
/// renderer-specific entries stay reachable through [`JobSettings::entry`].
#[derive(Debug, Clone)]
pub struct JobSettings {
    pub renderer: RendererKind,
    pub version: MayaVersion,
    pub scene_file: String,
    pub strict_error_checking: bool,
    pub ignore_error_211: bool,
    pub animation: bool,
    pub render_half_frames: bool,
    pub frame_number_offset: i64,
    pub region_rendering: bool,
    pub using_render_layers: bool,
    pub render_layer: String,
    pub use_only_command_line_options: bool,
    pub command_line_options: String,
    pub local_rendering: bool,
    pub output_file_path: String,
    pub output_file_prefix: String,
    pub camera: String,
    pub project_path: String,
    pub skip_existing_frames: bool,
    pub mtoa_version: i64,
    pub render_setup_include_lights: bool,
    pub use_legacy_render_layers: bool,
    pub ocio_config_file: String,
    pub ocio_policy_file: String,
    info: PluginInfo,
}

impl JobSettings {
    pub fn from_plugin_info(info: PluginInfo) -> Result<Self, ConfigError> {
        let renderer = RendererKind::parse(&info.get_or("Renderer", default_for("Renderer")));
        let version = MayaVersion::parse(info.require("Version")?)?;
        let scene_file = normalize_path(info.require("SceneFile")?);
        if scene_file.is_empty() {
            return Err(ConfigError::missing("SceneFile"));
        }

        let settings = Self {
            renderer,
            version,
            scene_file,
            strict_error_checking: bool_entry(&info, "StrictErrorChecking")?,
            ignore_error_211: bool_entry(&info, "IgnoreError211")?,
            animation: bool_entry(&info, "Animation")?,
            render_half_frames: bool_entry(&info, "RenderHalfFrames")?,
            frame_number_offset: int_entry(&info, "FrameNumberOffset")?,
            region_rendering: bool_entry(&info, "RegionRendering")?,
            using_render_layers: bool_entry(&info, "UsingRenderLayers")?,
            render_layer: info.get_or("RenderLayer", "").trim().to_string(),
            use_only_command_line_options: bool_entry(&info, "UseOnlyCommandLineOptions")?,
            command_line_options: info.get_or("CommandLineOptions", "").trim().to_string(),
            local_rendering: bool_entry(&info, "LocalRendering")?,
            output_file_path: normalize_path(&info.get_or("OutputFilePath", "")),
            output_file_prefix: info
                .get_or("OutputFilePrefix", "")
                .trim()
                .replace('\\', "/"),
            camera: info.get_or("Camera", "").trim().to_string(),
            project_path: normalize_path(&info.get_or("ProjectPath", "")),
            skip_existing_frames: bool_entry(&info, "SkipExistingFrames")?,
            mtoa_version: int_entry(&info, "MayaToArnoldVersion")?,
            render_setup_include_lights: bool_entry(&info, "RenderSetupIncludeLights")?,
            use_legacy_render_layers: bool_entry(&info, "UseLegacyRenderLayers")?,
            ocio_config_file: info.get_or("OCIOConfigFile", "").trim().to_string(),
            ocio_policy_file: info.get_or("OCIOPolicyFile", "").trim().to_string(),
            info,
        };

        tracing::debug!(
            renderer = %settings.renderer,
            version = %settings.version,
            strict = settings.strict_error_checking,
            "job settings loaded"
        );
        Ok(settings)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        Self::from_plugin_info(PluginInfo::from_path(path)?)
    }

    /// Raw entry, falling back to the defaults table.
    pub fn entry(&self, key: &str) -> String {
        self.info.get_or(key, default_for(key)).trim().to_string()
    }

    pub fn bool_entry(&self, key: &str) -> Result<bool, ConfigError> {
        bool_entry(&self.info, key)
    }

    pub fn int_entry(&self, key: &str) -> Result<i64, ConfigError> {
        int_entry(&self.info, key)
    }

    pub fn plugin_info(&self) -> &PluginInfo {
        &self.info
    }

    /// Renders the whole scene with each layer's own renderer.
    pub fn renders_all_layers(&self) -> bool {
        self.renderer == RendererKind::File
            || (self.using_render_layers && self.render_layer.is_empty())
    }
}

fn bool_entry(info: &PluginInfo, key: &str) -> Result<bool, ConfigError> {
    let default = default_for(key).eq_ignore_ascii_case("true");
    info.get_bool_or(key, default)
}

fn int_entry(info: &PluginInfo, key: &str) -> Result<i64, ConfigError> {
    let default = default_for(key).parse::<i64>().unwrap_or(0);
    info.get_int_or(key, default)
}

/// Forward slashes, no trailing separator.
pub fn normalize_path(raw: &str) -> String {
    let p = raw.trim().replace('\\', "/");
    if p.len() > 1 {
        p.trim_end_matches('/').to_string()
    } else {
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> PluginInfo {
        PluginInfo::from_pairs([("Version", "2023"), ("SceneFile", "/jobs/shot.mb")])
    }

    #[test]
    fn defaults_apply_when_entries_are_absent() {
        let s = JobSettings::from_plugin_info(minimal()).unwrap();
        assert_eq!(s.renderer, RendererKind::MayaSoftware);
        assert!(s.strict_error_checking);
        assert!(!s.ignore_error_211);
        assert!(s.animation);
        assert_eq!(s.frame_number_offset, 0);
        assert_eq!(s.mtoa_version, 2);
        assert!(s.render_setup_include_lights);
        assert_eq!(s.entry("MentalRayVerbose"), "Progress Messages");
        assert_eq!(s.entry("ImageWidth"), "");
    }

    #[test]
    fn required_entries_are_reported() {
        let err = JobSettings::from_plugin_info(PluginInfo::from_pairs([("Version", "2023")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::missing("SceneFile"));

        let err = JobSettings::from_plugin_info(PluginInfo::from_pairs([("SceneFile", "a.mb")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::missing("Version"));
    }

    #[test]
    fn paths_are_normalized() {
        let mut info = minimal();
        info.insert("OutputFilePath", "\\\\server\\renders\\shot\\");
        info.insert("ProjectPath", "C:\\projects\\show/");
        let s = JobSettings::from_plugin_info(info).unwrap();
        assert_eq!(s.output_file_path, "//server/renders/shot");
        assert_eq!(s.project_path, "C:/projects/show");
    }

    #[test]
    fn renders_all_layers_for_file_or_unnamed_layer() {
        let mut info = minimal();
        info.insert("UsingRenderLayers", "true");
        let s = JobSettings::from_plugin_info(info).unwrap();
        assert!(s.renders_all_layers());

        let mut info = minimal();
        info.insert("Renderer", "File");
        assert!(JobSettings::from_plugin_info(info).unwrap().renders_all_layers());
    }

    #[test]
    fn malformed_booleans_are_config_errors() {
        let mut info = minimal();
        info.insert("StrictErrorChecking", "maybe");
        assert!(matches!(
            JobSettings::from_plugin_info(info),
            Err(ConfigError::InvalidEntry { .. })
        ));
    }
}
