use crate::error::ConfigError;
use crate::job::{JobSettings, TaskContext};
use crate::renderer::RendererKind;

/// Pixel bounds of the region one task renders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Region {
    /// Tile jobs suffix each entry with the task id (`RegionLeft3`).
    pub fn from_settings(settings: &JobSettings, task: &TaskContext) -> Result<Self, ConfigError> {
        let suffix = if task.tile_job { task.task_id.as_str() } else { "" };
        let read = |side: &str| -> Result<f64, ConfigError> {
            let key = format!("Region{side}{suffix}");
            let raw = settings.plugin_info().get_or(&key, "0");
            let raw = raw.trim();
            if raw.is_empty() {
                return Ok(0.0);
            }
            raw.parse::<f64>()
                .map_err(|_| ConfigError::invalid(key, "number", raw))
        };
        Ok(Self {
            left: read("Left")?,
            right: read("Right")?,
            top: read("Top")?,
            bottom: read("Bottom")?,
        })
    }

    fn fractions(&self, width: i64, height: i64) -> Option<Self> {
        if width <= 0 || height <= 0 {
            return None;
        }
        let (w, h) = (width as f64, height as f64);
        Some(Self {
            left: self.left / w,
            right: self.right / w,
            top: self.top / h,
            bottom: self.bottom / h,
        })
    }
}

/// Region arguments for renderers that support tile rendering.
pub fn tile_arguments(
    settings: &JobSettings,
    task: &TaskContext,
) -> Result<Vec<String>, ConfigError> {
    if !settings.region_rendering {
        return Ok(Vec::new());
    }

    let r = Region::from_settings(settings, task)?;
    let width = settings.int_entry("ImageWidth")?;
    let height = settings.int_entry("ImageHeight")?;

    let args = match &settings.renderer {
        RendererKind::Renderman | RendererKind::RendermanRis | RendererKind::Renderman22 => {
            match r.fractions(width, height) {
                Some(p) if settings.renderer == RendererKind::Renderman22 => {
                    flag_with("-crop", [p.left, p.top, p.right, p.bottom], fraction)
                }
                Some(p) => flag_with("-crop", [p.left, p.right, p.top, p.bottom], fraction),
                None => Vec::new(),
            }
        }
        RendererKind::Turtle => flag_with("-region", [r.left, r.top, r.right, r.bottom], pixels),
        RendererKind::ThreeDelight => match r.fractions(width, height) {
            Some(p) => vec![
                "-crop".into(),
                "true".into(),
                "-crminx".into(),
                fraction(p.left),
                "-crminy".into(),
                fraction(p.top),
                "-crmaxx".into(),
                fraction(p.right),
                "-crmaxy".into(),
                fraction(p.bottom),
            ],
            None => {
                tracing::warn!("3delight crop needs ImageWidth and ImageHeight; rendering full frame");
                Vec::new()
            }
        },
        RendererKind::Iray => flag_with("-window", [r.left, r.right, r.top, r.bottom], pixels),
        _ => flag_with("-reg", [r.left, r.right, r.top, r.bottom], pixels),
    };
    Ok(args)
}

fn flag_with(flag: &str, values: [f64; 4], fmt: fn(f64) -> String) -> Vec<String> {
    std::iter::once(flag.to_string())
        .chain(values.into_iter().map(fmt))
        .collect()
}

fn pixels(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        v.to_string()
    }
}

fn fraction(v: f64) -> String {
    format!("{v:?}")
}
