use crate::error::ConfigError;
use crate::job::{JobSettings, TaskContext};

/// Octane exposes eight device slots (`-gpu1` .. `-gpu8`).
const OCTANE_SLOTS: u32 = 8;
/// Iray exposes sixteen (`-rOn 1` .. `-rOn 16`).
const IRAY_SLOTS: u32 = 16;

/// GPU assignment inputs shared by the GPU renderers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpuRequest {
    pub per_task: u32,
    pub select_devices: Vec<u32>,
    pub thread_number: u32,
    pub affinity: Option<Vec<u32>>,
}

impl GpuRequest {
    pub fn from_settings(settings: &JobSettings, task: &TaskContext) -> Result<Self, ConfigError> {
        let per_task = settings.int_entry("GPUsPerTask")?;
        let per_task = u32::try_from(per_task.max(0))
            .map_err(|_| ConfigError::invalid("GPUsPerTask", "GPU count", per_task.to_string()))?;
        Ok(Self {
            per_task,
            select_devices: parse_devices(&settings.entry("GPUsSelectDevices"))?,
            thread_number: task.thread_number,
            affinity: task.gpu_affinity.clone().filter(|a| !a.is_empty()),
        })
    }

    fn per_thread(&self) -> Vec<u32> {
        let first = self.thread_number * self.per_task;
        (first..first + self.per_task).collect()
    }

    /// Redshift: explicit devices, then one block per render thread, then
    /// the worker's affinity override.
    pub fn redshift_devices(&self) -> Option<Vec<u32>> {
        if self.per_task == 0 && !self.select_devices.is_empty() {
            Some(self.select_devices.clone())
        } else if self.per_task > 0 {
            Some(self.per_thread())
        } else {
            self.affinity.clone()
        }
    }

    /// Octane and Iray: a worker affinity override constrains whatever the
    /// job asked for.
    pub fn constrained_devices(&self) -> Result<Option<Vec<u32>>, ConfigError> {
        let Some(affinity) = &self.affinity else {
            return Ok(if self.per_task == 0 && !self.select_devices.is_empty() {
                Some(self.select_devices.clone())
            } else if self.per_task > 0 {
                Some(self.per_thread())
            } else {
                None
            });
        };

        if self.per_task == 0 && !self.select_devices.is_empty() {
            let (kept, dropped): (Vec<u32>, Vec<u32>) = self
                .select_devices
                .iter()
                .copied()
                .partition(|id| affinity.contains(id));
            if !dropped.is_empty() {
                tracing::warn!(
                    gpus = %join(&dropped),
                    "The Worker is overriding its GPU affinity and these GPUs do not match the Worker's affinity so they will not be used"
                );
            }
            if kept.is_empty() {
                return Err(ConfigError::NoGpuAffinity);
            }
            Ok(Some(kept))
        } else if self.per_task > 0 {
            let wanted = self.per_task as usize;
            if wanted > affinity.len() {
                tracing::warn!(
                    available = affinity.len(),
                    requested = wanted,
                    "The Worker is overriding its GPU affinity and has fewer GPUs than requested"
                );
                Ok(Some(affinity.clone()))
            } else {
                Ok(Some(affinity[..wanted].to_vec()))
            }
        } else {
            Ok(Some(affinity.clone()))
        }
    }
}

pub fn parse_devices(raw: &str) -> Result<Vec<u32>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u32>()
                .map_err(|_| ConfigError::invalid("GPUsSelectDevices", "GPU id", s))
        })
        .collect()
}

pub fn join(ids: &[u32]) -> String {
    ids.iter().map(u32::to_string).collect::<Vec<_>>().join(",")
}

/// `-gpu {0,1}`
pub fn redshift_arguments(request: &GpuRequest) -> Vec<String> {
    match request.redshift_devices() {
        Some(ids) => {
            tracing::info!(gpus = %join(&ids), "GPUs used by Redshift");
            vec!["-gpu".to_string(), format!("{{{}}}", join(&ids))]
        }
        None => Vec::new(),
    }
}

/// `-gpuN 1` for each enabled slot, `-gpuN 0` for the rest.
pub fn octane_arguments(request: &GpuRequest) -> Result<Vec<String>, ConfigError> {
    let Some(ids) = request.constrained_devices()? else {
        return Ok(Vec::new());
    };
    tracing::info!(gpus = %join(&ids), "GPUs used by Octane");

    let mut args = Vec::new();
    for id in ids.iter().filter(|id| **id < OCTANE_SLOTS) {
        args.push(format!("-gpu{}", id + 1));
        args.push("1".to_string());
    }
    for slot in (0..OCTANE_SLOTS).filter(|s| !ids.contains(s)) {
        args.push(format!("-gpu{}", slot + 1));
        args.push("0".to_string());
    }
    Ok(args)
}

/// `-rOn N` for each enabled device, `-rOff N` for the rest. Device 0 is
/// the CPU, so GPU ids are shifted by one.
pub fn iray_arguments(request: &GpuRequest) -> Result<Vec<String>, ConfigError> {
    let Some(ids) = request.constrained_devices()? else {
        return Ok(Vec::new());
    };
    tracing::info!(gpus = %join(&ids), "GPUs used by Iray");

    let mut args = Vec::new();
    for id in &ids {
        args.push("-rOn".to_string());
        args.push((id + 1).to_string());
    }
    for slot in (0..IRAY_SLOTS).filter(|s| !ids.contains(s)) {
        args.push("-rOff".to_string());
        args.push((slot + 1).to_string());
    }
    Ok(args)
}
