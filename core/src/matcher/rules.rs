use regex::{Captures, Regex};

use crate::renderer::RendererKind;

/// What the dispatcher does with a matched line. Rules carry the action as
/// data; the dispatcher owns the state the action touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Fail with the matched text.
    Fatal,
    /// Fail with the command line and the line printed before the usage text.
    UsageError,
    /// Fail because Redshift rejected the configured GPU id (group 1).
    RedshiftGpuAffinity,
    /// Route through the `Error:` / `Warning:` denylist.
    CatchAll,
    /// Drop the line from the log.
    Suppress,
    /// Matched text becomes the status message.
    Status,

    /// Group 1 is the number of the frame just written.
    FrameFinished,
    /// A frame finished; no frame number available.
    FrameCompleted,
    /// Group 1 is already an overall percentage.
    AbsolutePercent,
    /// Group 1 is the percentage of the frame in flight.
    FramePercent,

    FumeFxStart,
    FumeFxFrame,
    FumeFxMemory,
    FumeFxFrameTime,
    FumeFxEta,

    VrayLightCache,
    VrayPrepass,
    VrayRenderingImage,
    VrayPercent,
    VrayFrameTime,
    VrayExportFrame,
    VrayExportComplete,

    RendermanFrame,

    OctaneFrameStart,
    OctaneSamples,

    CausticFrame,
    CausticPasses,
    CausticPass,

    MentalRayPercent,
    MentalRayGathering,
    MentalRayWritingFrame,
    MentalRayComplete,
}

type RuleSpec = (&'static str, &'static str, Action);

const FUMEFX: &[RuleSpec] = &[
    (
        "fumefx.start",
        r".*FumeFX: Starting simulation \(([-]?[0-9]+) - ([-]?[0-9]+)\).*",
        Action::FumeFxStart,
    ),
    ("fumefx.frame", r".*FumeFX: Frame: ([-]?[0-9]+)", Action::FumeFxFrame),
    ("fumefx.memory", r".*FumeFX: Memory used: ([0-9]+[a-zA-Z]*)", Action::FumeFxMemory),
    (
        "fumefx.frame_time",
        r".*FumeFX: Frame Time: ([0-9]+:[0-9]+\.[0-9]+)",
        Action::FumeFxFrameTime,
    ),
    (
        "fumefx.eta",
        r".*FumeFX: Estimated Time: ([0-9]+:[0-9]+:[0-9]+)",
        Action::FumeFxEta,
    ),
];

const LICENSING: &[RuleSpec] = &[
    ("license.flexlm", r"FLEXlm error: .*", Action::Fatal),
    ("license.maya", r"Maya: License was not obtained", Action::Fatal),
];

const USAGE: &[RuleSpec] = &[("usage", r"Usage: Render .*", Action::UsageError)];

const CHUNKED: &[RuleSpec] = &[
    (
        "chunk.by_frame",
        r"Finished Rendering.*\.([0-9]+)\.[^\.]+",
        Action::FrameFinished,
    ),
    ("chunk.generic", r".*Finished Rendering.*", Action::FrameCompleted),
];

const CUDA: &[RuleSpec] = &[
    ("cuda.unknown", r".*CUDA_ERROR_UNKNOWN.*", Action::Fatal),
    ("cuda.driver_init", r".*Failed to init the CUDA driver API.*", Action::Fatal),
    (
        "cuda.compute_capability",
        r".*The system does not support the required CUDA compute capabilities.*",
        Action::Fatal,
    ),
];

const STATUS: &[RuleSpec] = &[(
    "status",
    r"Constructing shading groups|Rendering current frame",
    Action::Status,
)];

const REDSHIFT_FATAL: &[RuleSpec] = &[
    (
        "redshift.gpu_affinity",
        r"redshiftSelectCudaDevices\.mel line \d+: Invalid device id: (\d+)$",
        Action::RedshiftGpuAffinity,
    ),
    ("redshift.frame_aborted", r"Frame rendering aborted.", Action::Fatal),
    ("redshift.internal_abort", r"Rendering was internally aborted", Action::Fatal),
    (
        "redshift.missing_preference",
        r#"Cannot find procedure "rsPreference""#,
        Action::Fatal,
    ),
];

const VRAY_FATAL: &[RuleSpec] = &[("vray.error", r"V-Ray error: .*", Action::Fatal)];

const THREE_DELIGHT_FATAL: &[RuleSpec] = &[
    ("3delight.error", r".*3DL ERROR .*", Action::Fatal),
    (
        "3delight.point_cloud",
        r"\[\d+\.?\d* \d+\.?\d* \d+\.?\d*\]",
        Action::Suppress,
    ),
];

const ARNOLD_FATAL: &[RuleSpec] = &[
    (
        "arnold.plugin_missing",
        r#"Plug-in, "mtoa", was not found on MAYA_PLUG_IN_PATH"#,
        Action::Fatal,
    ),
    ("arnold.batch_failed", r"\[mtoa\] Failed batch render", Action::Fatal),
];

const CATCH_ALL: &[RuleSpec] = &[("catch_all", r".*Error: .*|.*Warning: .*", Action::CatchAll)];

const VRAY_PROGRESS: &[RuleSpec] = &[
    ("vray.light_cache", r"V-Ray: Building light cache*", Action::VrayLightCache),
    ("vray.prepass", r"V-Ray: Prepass ([0-9]+) of ([0-9]+)*", Action::VrayPrepass),
    ("vray.rendering_image", r"V-Ray: Rendering image*", Action::VrayRenderingImage),
    ("vray.percent", r"V-Ray: +([0-9]+)%", Action::VrayPercent),
    ("vray.percent_spaced", r"V-Ray: +([0-9]+) %", Action::VrayPercent),
    ("vray.completed", r"([0-9]+) % completed", Action::VrayPercent),
    ("vray.frame_time", r"V-Ray: Total frame time", Action::VrayFrameTime),
    (
        "vray.export_frame",
        r"V-Ray: Updating frame at time ([0-9]+)",
        Action::VrayExportFrame,
    ),
    ("vray.export_complete", r"V-Ray: Render complete", Action::VrayExportComplete),
];

const RENDERMAN_PROGRESS: &[RuleSpec] = &[(
    "renderman.frame",
    r"rfm Notice: Rendering .* at ([0-9]+)",
    Action::RendermanFrame,
)];

const OCTANE_PROGRESS: &[RuleSpec] = &[
    (
        "octane.frame_start",
        r"Octane: starting animation of frame",
        Action::OctaneFrameStart,
    ),
    (
        "octane.samples",
        r"Octane: Refreshed image, ([0-9]+) samples per pixel of ([0-9]+)",
        Action::OctaneSamples,
    ),
];

const CAUSTIC_PROGRESS: &[RuleSpec] = &[
    ("caustic.frame", r"Executing frame ([0-9]+)", Action::CausticFrame),
    ("caustic.passes", r"Rendering ([0-9]+) passes", Action::CausticPasses),
    ("caustic.pass", r"Rendered to pass ([0-9]+)", Action::CausticPass),
];

const MENTAL_RAY: &[RuleSpec] = &[
    (
        "mentalray.percent",
        r"progr: +([0-9]+\.[0-9]+)% +rendered",
        Action::MentalRayPercent,
    ),
    (
        "mentalray.gathering",
        r"progr: +([0-9]+\.[0-9]+)% +computing final gather points",
        Action::MentalRayGathering,
    ),
    (
        "mentalray.writing_frame",
        r"progr: writing image file .* \(frame ([0-9]+)\)",
        Action::MentalRayWritingFrame,
    ),
    ("mentalray.complete", r"progr: +rendering finished", Action::MentalRayComplete),
];

const FRAME_COMPLETION: &[RuleSpec] = &[
    ("complete.render_done", r"\| render done", Action::FrameCompleted),
    ("complete.progress", r"\[PROGRESS\] Completed frame*", Action::FrameCompleted),
    (
        "complete.turtle",
        r".*\[PROGRESS\] TURTLE rendering frame 100\.00.*",
        Action::FrameCompleted,
    ),
    ("complete.render_complete", r".*Render complete.*", Action::FrameCompleted),
];

const ABSOLUTE_PERCENT: &[RuleSpec] = &[
    (
        "percent.rendering_done",
        r"\[PROGRESS\] Percentage of rendering done: (.*)",
        Action::AbsolutePercent,
    ),
    (
        "percent.turtle",
        r".*\[PROGRESS\] TURTLE rendering frame ([0-9]+\.[0-9]+).*",
        Action::AbsolutePercent,
    ),
    ("percent.rimg", r".*RIMG : +([0-9]+)%", Action::AbsolutePercent),
];

const FRAME_PERCENT: &[RuleSpec] = &[
    ("percent.progress", r"\[PROGRESS\] ([0-9]+) percent", Action::FramePercent),
    ("percent.generic", r"([0-9]+)%", Action::FramePercent),
];

/// One compiled pattern bound to an action.
#[derive(Debug, Clone)]
pub struct MatchRule {
    name: &'static str,
    pattern: Regex,
    action: Action,
}

impl MatchRule {
    fn from_spec(spec: &RuleSpec) -> Self {
        let (name, pattern, action) = *spec;
        Self {
            name,
            pattern: Regex::new(pattern).expect("built-in rule pattern is valid"),
            action,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn captures<'t>(&self, line: &'t str) -> Option<Captures<'t>> {
        self.pattern.captures(line)
    }
}

/// Ordered rules for one task. The first rule whose pattern is found in a
/// line claims it.
#[derive(Debug, Clone)]
pub struct RuleSet {
    renderer: RendererKind,
    integration_version: Option<i64>,
    rules: Vec<MatchRule>,
}

impl RuleSet {
    /// `integration_version` is the MtoA major version for Arnold jobs.
    pub fn build(renderer: &RendererKind, integration_version: Option<i64>) -> Self {
        let mut families: Vec<&[RuleSpec]> = vec![FUMEFX, LICENSING, USAGE, CHUNKED, CUDA, STATUS];

        match renderer {
            RendererKind::Redshift => families.push(REDSHIFT_FATAL),
            RendererKind::Vray | RendererKind::VrayExport => families.push(VRAY_FATAL),
            RendererKind::ThreeDelight => families.push(THREE_DELIGHT_FATAL),
            RendererKind::Arnold | RendererKind::ArnoldExport => families.push(ARNOLD_FATAL),
            _ => {}
        }

        families.push(CATCH_ALL);

        match renderer {
            RendererKind::Vray | RendererKind::VrayExport => families.push(VRAY_PROGRESS),
            RendererKind::Renderman
            | RendererKind::RendermanRis
            | RendererKind::RendermanExport => families.push(RENDERMAN_PROGRESS),
            RendererKind::OctaneRender => families.push(OCTANE_PROGRESS),
            RendererKind::CausticVisualizer => families.push(CAUSTIC_PROGRESS),
            _ => {}
        }

        families.extend([MENTAL_RAY, FRAME_COMPLETION, ABSOLUTE_PERCENT, FRAME_PERCENT]);

        let rules: Vec<MatchRule> = families
            .into_iter()
            .flat_map(|family| family.iter().map(MatchRule::from_spec))
            .collect();

        tracing::debug!(
            renderer = %renderer,
            integration_version = ?integration_version,
            rules = rules.len(),
            "rule set built"
        );

        Self {
            renderer: renderer.clone(),
            integration_version,
            rules,
        }
    }

    pub fn renderer(&self) -> &RendererKind {
        &self.renderer
    }

    pub fn integration_version(&self) -> Option<i64> {
        self.integration_version
    }

    pub fn rules(&self) -> &[MatchRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// First rule found in `line`, with its captures.
    pub fn find<'r, 't>(&'r self, line: &'t str) -> Option<(&'r MatchRule, Captures<'t>)> {
        self.rules
            .iter()
            .find_map(|rule| rule.captures(line).map(|caps| (rule, caps)))
    }
}
