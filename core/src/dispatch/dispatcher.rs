use regex::Captures;

use crate::config::PluginConfig;
use crate::job::{FrameRange, JobSettings, TaskContext};
use crate::matcher::{triage, Action, RuleSet, Triage, TriagePolicy};
use crate::renderer::RendererKind;

use super::effect::{Effect, Effects};
use super::progress::ProgressState;

/// Task-level inputs the handlers read but never change.
#[derive(Debug, Clone)]
pub struct DispatchOptions {
    pub strict_error_checking: bool,
    pub suppress_warnings: bool,
    /// Reported back when the renderer rejects its arguments.
    pub command_line: String,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            strict_error_checking: true,
            suppress_warnings: false,
            command_line: String::new(),
        }
    }
}

/// Feeds renderer output through the task's rules, one line at a time.
#[derive(Debug)]
pub struct LineDispatcher {
    rules: RuleSet,
    frames: FrameRange,
    options: DispatchOptions,
    state: ProgressState,
    previous_line: String,
}

impl LineDispatcher {
    pub fn new(rules: RuleSet, frames: FrameRange, options: DispatchOptions) -> Self {
        Self {
            rules,
            frames,
            options,
            state: ProgressState::new(),
            previous_line: String::new(),
        }
    }

    pub fn for_task(
        settings: &JobSettings,
        task: &TaskContext,
        plugin: &PluginConfig,
        command_line: impl Into<String>,
    ) -> Self {
        let rules = RuleSet::build(&settings.renderer, Some(settings.mtoa_version));
        Self::new(
            rules,
            task.frames,
            DispatchOptions {
                strict_error_checking: settings.strict_error_checking,
                suppress_warnings: plugin.suppress_warnings,
                command_line: command_line.into(),
            },
        )
    }

    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn frames(&self) -> FrameRange {
        self.frames
    }

    /// Start over for a new task on the same rules.
    pub fn reset(&mut self) {
        self.state.reset();
        self.previous_line.clear();
    }

    pub fn dispatch(&mut self, line: &str) -> Effects {
        let matched = self
            .rules
            .find(line)
            .map(|(rule, caps)| (rule.name(), rule.action(), caps));

        let effects = match matched {
            Some((name, action, caps)) => {
                tracing::trace!(rule = name, ?action, "line matched");
                self.apply(action, &caps)
            }
            None => Effects::none(),
        };

        self.previous_line.clear();
        self.previous_line.push_str(line);
        effects
    }

    fn apply(&mut self, action: Action, caps: &Captures<'_>) -> Effects {
        let text = caps.get(0).map(|m| m.as_str()).unwrap_or_default();

        match action {
            Action::Fatal => self.fail(text.to_string()),
            Action::UsageError => self.fail(format!(
                "Bad command line arguments: {}\nMaya Error: {}",
                self.options.command_line, self.previous_line
            )),
            Action::RedshiftGpuAffinity => {
                let id = group(caps, 1).unwrap_or_default();
                self.fail(format!(
                    "Redshift has detected that the selected GPU '{id}' is invalid. \
                     Failing the task to prevent Redshift from using all GPUs."
                ))
            }
            Action::CatchAll => {
                let policy = TriagePolicy {
                    strict_error_checking: self.options.strict_error_checking,
                    suppress_warnings: self.options.suppress_warnings,
                };
                match triage(text, policy) {
                    Triage::Fail(reason) => self.fail(reason),
                    Triage::Tolerate(message) => Effects::one(Effect::LogWarning(message)),
                    Triage::Suppress => Effects::one(Effect::SuppressLine),
                }
            }
            Action::Suppress => Effects::one(Effect::SuppressLine),
            Action::Status => self.status(text.to_string()),

            Action::FrameFinished => {
                let (Some(frame), Some(span)) = (int_group(caps, 1), self.span()) else {
                    return Effects::none();
                };
                let done = frame
                    .checked_sub(self.frames.start)
                    .and_then(|d| d.checked_add(1))
                    .and_then(|d| d.checked_mul(100));
                match done {
                    Some(done) => self.progress(done.div_euclid(span) as f64),
                    None => Effects::none(),
                }
            }
            Action::FrameCompleted => self.count_frame(),
            Action::AbsolutePercent => match float_group(caps, 1) {
                Some(percent) => self.progress(percent),
                None => Effects::none(),
            },
            Action::FramePercent => match float_group(caps, 1) {
                Some(sub) => self.blend(sub),
                None => Effects::none(),
            },

            Action::FumeFxStart => {
                if let (Some(start), Some(end)) = (int_group(caps, 1), int_group(caps, 2)) {
                    self.state.fumefx.start_frame = start;
                    self.state.fumefx.end_frame = end;
                }
                Effects::none()
            }
            Action::FumeFxFrame => {
                let Some(current) = int_group(caps, 1) else {
                    return Effects::none();
                };
                let fx = &mut self.state.fumefx;
                fx.current_frame = current;
                let span = fx.end_frame as f64 - fx.start_frame as f64 + 1.0;
                let done = current as f64 - fx.start_frame as f64 + 1.0;
                let message = fx.status_message();

                let mut effects = Effects::none();
                if span > 0.0 {
                    effects = self.progress(done / span * 100.0);
                }
                self.state.status_message.clone_from(&message);
                effects.push(Effect::UpdateStatus(message));
                effects
            }
            Action::FumeFxMemory => {
                self.state.fumefx.memory_used = group(caps, 1).unwrap_or_default().to_string();
                Effects::none()
            }
            Action::FumeFxFrameTime => {
                self.state.fumefx.frame_time = group(caps, 1).unwrap_or_default().to_string();
                Effects::none()
            }
            Action::FumeFxEta => {
                self.state.fumefx.estimated_time = group(caps, 1).unwrap_or_default().to_string();
                Effects::none()
            }

            Action::VrayLightCache => self.status("Building light cache.".to_string()),
            Action::VrayPrepass => self.status(text.to_string()),
            Action::VrayRenderingImage => {
                self.state.vray.rendering_image = true;
                self.status(text.to_string())
            }
            Action::VrayPercent => {
                if !self.state.vray.rendering_image {
                    return Effects::none();
                }
                match float_group(caps, 1) {
                    Some(sub) => self.blend(sub),
                    None => Effects::none(),
                }
            }
            Action::VrayFrameTime => {
                if self.state.vray.rendering_image {
                    self.state.complete_frame();
                    self.state.vray.rendering_image = false;
                }
                Effects::none()
            }
            Action::VrayExportFrame => {
                if self.rules.renderer() != &RendererKind::VrayExport {
                    return Effects::none();
                }
                let count = i64::from(self.state.complete_frame());
                match self.span() {
                    Some(span) => self.progress(((count - 1) * 100).div_euclid(span) as f64),
                    None => Effects::none(),
                }
            }
            Action::VrayExportComplete => {
                if self.rules.renderer() != &RendererKind::VrayExport {
                    return Effects::none();
                }
                self.progress(100.0)
            }

            Action::RendermanFrame => {
                let mut effects = Effects::none();
                let span = self.frames.span();
                if span > 1 {
                    if let Some(current) = float_group(caps, 1) {
                        let initial = *self.state.renderman.initial_frame.get_or_insert(current);
                        let normalized = if initial > 1.0 {
                            current - self.frames.start as f64 + 1.0
                        } else {
                            current
                        };
                        effects = self.progress(normalized * 100.0 / span as f64);
                    }
                }
                self.state.status_message = text.to_string();
                effects.push(Effect::UpdateStatus(text.to_string()));
                effects
            }

            Action::OctaneFrameStart => {
                self.state.complete_frame();
                Effects::none()
            }
            Action::OctaneSamples => {
                let mut effects = Effects::none();
                if let (Some(current), Some(max), Some(span)) =
                    (float_group(caps, 1), float_group(caps, 2), self.span())
                {
                    if max > 0.0 {
                        let started = f64::from(self.state.finished_frame_count) - 1.0;
                        effects = self.progress(
                            (current * 100.0 / max + started * 100.0) / span as f64,
                        );
                    }
                }
                self.state.status_message = text.to_string();
                effects.push(Effect::UpdateStatus(text.to_string()));
                effects
            }

            Action::CausticFrame => {
                if let Some(frame) = int_group(caps, 1) {
                    self.state.caustic.current_frame = frame;
                }
                Effects::none()
            }
            Action::CausticPasses => {
                if let Some(passes) = int_group(caps, 1) {
                    self.state.caustic.total_passes = passes;
                }
                Effects::none()
            }
            Action::CausticPass => {
                let passes = self.state.caustic.total_passes;
                let (Some(pass), Some(span)) = (int_group(caps, 1), self.span()) else {
                    return Effects::none();
                };
                if passes <= 0 {
                    return Effects::none();
                }
                let pass_percent = pass.checked_mul(100).map(|p| p.div_euclid(passes));
                let frame_percent = self
                    .state
                    .caustic
                    .current_frame
                    .checked_sub(self.frames.start)
                    .and_then(|o| o.checked_mul(100));
                match (pass_percent, frame_percent) {
                    (Some(a), Some(b)) => match a.checked_add(b) {
                        Some(numerator) => self.progress(numerator as f64 / span as f64),
                        None => Effects::none(),
                    },
                    _ => Effects::none(),
                }
            }

            Action::MentalRayPercent => {
                let (Some(sub), Some(_)) = (float_group(caps, 1), self.span()) else {
                    return Effects::none();
                };
                let mut effects = self.blend(sub);
                effects.extend(self.status(text.to_string()));
                effects
            }
            Action::MentalRayGathering => self.status(text.to_string()),
            Action::MentalRayWritingFrame => {
                let frame = group(caps, 1).unwrap_or_default();
                let mr = &mut self.state.mental_ray;
                if mr.previous_written_frame.as_deref() == Some(frame) {
                    // A repeat before the frame was counted holds its skip
                    // until that first completion has been counted.
                    if mr.counted_since_write {
                        mr.skip_next_completion = true;
                    } else {
                        mr.skip_after_count = true;
                    }
                } else {
                    mr.previous_written_frame = Some(frame.to_string());
                    mr.counted_since_write = false;
                }
                Effects::none()
            }
            Action::MentalRayComplete => {
                let mr = &mut self.state.mental_ray;
                if mr.skip_next_completion {
                    mr.skip_next_completion = false;
                    return Effects::none();
                }
                mr.counted_since_write = true;
                if mr.skip_after_count {
                    mr.skip_after_count = false;
                    mr.skip_next_completion = true;
                }
                self.count_frame()
            }
        }
    }

    /// Positive frame span of the task, if progress can be computed.
    fn span(&self) -> Option<i64> {
        self.frames.frame_count()
    }

    fn count_frame(&mut self) -> Effects {
        let count = i64::from(self.state.complete_frame());
        match self.span() {
            Some(span) => self.progress((100 * count).div_euclid(span) as f64),
            None => Effects::none(),
        }
    }

    /// Overall progress from the finished frames plus the frame in flight.
    fn blend(&mut self, sub_percent: f64) -> Effects {
        match self.span() {
            Some(span) => {
                let finished = f64::from(self.state.finished_frame_count) * 100.0;
                self.progress((sub_percent + finished) / span as f64)
            }
            None => Effects::none(),
        }
    }

    fn progress(&mut self, percent: f64) -> Effects {
        self.state.progress_percent = percent;
        Effects::one(Effect::UpdateProgress(percent))
    }

    fn status(&mut self, message: String) -> Effects {
        self.state.status_message.clone_from(&message);
        Effects::one(Effect::UpdateStatus(message))
    }

    fn fail(&self, reason: String) -> Effects {
        tracing::debug!(reason = %reason, "fatal line");
        Effects::one(Effect::Fail(reason))
    }
}

fn group<'t>(caps: &Captures<'t>, i: usize) -> Option<&'t str> {
    caps.get(i).map(|m| m.as_str())
}

fn int_group(caps: &Captures<'_>, i: usize) -> Option<i64> {
    group(caps, i)?.trim().parse().ok()
}

fn float_group(caps: &Captures<'_>, i: usize) -> Option<f64> {
    group(caps, i)?
        .trim()
        .trim_end_matches('%')
        .trim_end()
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dispatcher(renderer: &str, start: i64, end: i64) -> LineDispatcher {
        LineDispatcher::new(
            RuleSet::build(&RendererKind::parse(renderer), None),
            FrameRange::new(start, end),
            DispatchOptions {
                command_line: "-r sw -s 1 -e 10 -b 1 \"/jobs/shot.mb\"".into(),
                ..DispatchOptions::default()
            },
        )
    }

    fn progress_of(d: &mut LineDispatcher, line: &str) -> Option<f64> {
        d.dispatch(line).progress()
    }

    #[test]
    fn by_frame_progress_uses_frame_number() {
        let mut d = dispatcher("mayaSoftware", 1, 10);
        for f in 1..=10 {
            let line = format!("Finished Rendering /out/shot.{f:04}.exr");
            assert_eq!(progress_of(&mut d, &line), Some((100 * f / 10) as f64));
        }

        let mut d = dispatcher("mayaSoftware", 3, 5);
        assert_eq!(progress_of(&mut d, "Finished Rendering /out/a.4.iff"), Some(66.0));
    }

    #[test]
    fn degenerate_range_never_updates_progress() {
        let mut d = dispatcher("mayaSoftware", 10, 5);
        assert!(d.dispatch("Finished Rendering /out/a.7.iff").is_noop());
        assert!(d.dispatch("Finished Rendering").is_noop());
        assert!(d.dispatch("45%").is_noop());
        // the frame still counts
        assert_eq!(d.state().finished_frame_count, 1);
    }

    #[test]
    fn generic_completion_counts_up_to_one_hundred() {
        let mut d = dispatcher("mayaSoftware", 1, 10);
        let mut seen = Vec::new();
        for i in 1..=10 {
            seen.push(progress_of(&mut d, "Finished Rendering").unwrap());
            assert_eq!(d.state().finished_frame_count, i);
        }
        assert_eq!(
            seen,
            vec![10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0]
        );
    }

    #[test]
    fn specific_fatal_pattern_wins_over_catch_all() {
        let mut d = dispatcher("mayaSoftware", 1, 1);
        let fx = d.dispatch("// Error: CUDA_ERROR_UNKNOWN");
        assert_eq!(fx.failure(), Some("// Error: CUDA_ERROR_UNKNOWN"));
    }

    #[test]
    fn strict_checking_decides_license_errors() {
        let line = "// Error: Arnold could not get a license";
        let mut strict = dispatcher("mayaSoftware", 1, 1);
        assert!(strict.dispatch(line).failure().is_some());

        let mut lenient = LineDispatcher::new(
            RuleSet::build(&RendererKind::MayaSoftware, None),
            FrameRange::single(1),
            DispatchOptions {
                strict_error_checking: false,
                ..DispatchOptions::default()
            },
        );
        let fx = lenient.dispatch(line);
        assert!(fx.failure().is_none());
        assert!(matches!(fx.iter().next(), Some(Effect::LogWarning(_))));
    }

    #[test]
    fn scene_load_failure_fails_under_both_settings() {
        let line = "// Error: Cannot load scene /jobs/shot.mb";
        for strict in [true, false] {
            let mut d = LineDispatcher::new(
                RuleSet::build(&RendererKind::MayaSoftware, None),
                FrameRange::single(1),
                DispatchOptions {
                    strict_error_checking: strict,
                    ..DispatchOptions::default()
                },
            );
            assert_eq!(d.dispatch(line).failure(), Some(line));
        }
    }

    #[test]
    fn usage_error_reports_command_line_and_previous_line() {
        let mut d = dispatcher("mayaSoftware", 1, 10);
        assert!(d.dispatch("Error: unknown flag -foo").failure().is_none());
        let fx = d.dispatch("Usage: Render [options] filename");
        assert_eq!(
            fx.failure(),
            Some(
                "Bad command line arguments: -r sw -s 1 -e 10 -b 1 \"/jobs/shot.mb\"\n\
                 Maya Error: Error: unknown flag -foo"
            )
        );
    }

    #[test]
    fn mental_ray_duplicate_write_counts_once() {
        let mut d = dispatcher("mentalRay", 1, 2);
        d.dispatch("progr: writing image file /out/a.0001.iff (frame 1)");
        d.dispatch("progr: writing image file /out/a.0001.iff (frame 1)");
        d.dispatch("progr: rendering finished");
        assert_eq!(d.state().finished_frame_count, 1);
    }

    #[test]
    fn mental_ray_repeated_frame_completion_is_skipped() {
        let mut d = dispatcher("mentalRay", 1, 2);
        d.dispatch("progr: writing image file /out/a.0001.iff (frame 1)");
        assert_eq!(progress_of(&mut d, "progr: rendering finished"), Some(50.0));
        d.dispatch("progr: writing image file /out/a.0001.iff (frame 1)");
        assert!(d.dispatch("progr: rendering finished").is_noop());
        assert_eq!(d.state().finished_frame_count, 1);

        d.dispatch("progr: writing image file /out/a.0002.iff (frame 2)");
        assert_eq!(progress_of(&mut d, "progr: rendering finished"), Some(100.0));
    }

    #[test]
    fn mental_ray_duplicate_write_skips_the_following_completion() {
        let mut d = dispatcher("mentalRay", 1, 2);
        d.dispatch("progr: writing image file /out/a.0001.iff (frame 1)");
        d.dispatch("progr: writing image file /out/a.0001.iff (frame 1)");
        assert_eq!(progress_of(&mut d, "progr: rendering finished"), Some(50.0));
        assert!(d.dispatch("progr: rendering finished").is_noop());
        assert_eq!(d.state().finished_frame_count, 1);

        // no repeat, every completion counts
        let mut d = dispatcher("mentalRay", 1, 2);
        d.dispatch("progr: writing image file /out/a.0001.iff (frame 1)");
        d.dispatch("progr: rendering finished");
        d.dispatch("progr: rendering finished");
        assert_eq!(d.state().finished_frame_count, 2);
    }

    #[test]
    fn mental_ray_percent_blends_finished_frames() {
        let mut d = dispatcher("mentalRay", 1, 4);
        d.dispatch("progr: rendering finished");
        let fx = d.dispatch("progr:    50.0% rendered on host");
        assert_eq!(fx.progress(), Some(37.5));
        assert_eq!(fx.status(), Some("progr:    50.0% rendered"));
    }

    #[test]
    fn vray_progress_only_while_rendering_image() {
        let mut d = dispatcher("vray", 1, 2);
        assert_eq!(
            d.dispatch("V-Ray: Building light cache...").status(),
            Some("Building light cache.")
        );
        assert!(d.dispatch("V-Ray:  40%").is_noop());

        d.dispatch("V-Ray: Rendering image...");
        assert!(d.state().vray.rendering_image);
        assert_eq!(progress_of(&mut d, "V-Ray:  40%"), Some(20.0));

        d.dispatch("V-Ray: Total frame time 12.3s");
        assert_eq!(d.state().finished_frame_count, 1);
        assert!(!d.state().vray.rendering_image);

        // no second increment without a new image phase
        d.dispatch("V-Ray: Total frame time 12.3s");
        assert_eq!(d.state().finished_frame_count, 1);

        d.dispatch("V-Ray: Rendering image...");
        assert_eq!(progress_of(&mut d, "50 % completed"), Some(75.0));
    }

    #[test]
    fn vray_export_progress_only_for_exports() {
        let mut d = dispatcher("vrayexport", 1, 4);
        assert_eq!(progress_of(&mut d, "V-Ray: Updating frame at time 1"), Some(0.0));
        assert_eq!(progress_of(&mut d, "V-Ray: Updating frame at time 2"), Some(25.0));
        assert_eq!(progress_of(&mut d, "V-Ray: Render complete"), Some(100.0));

        let mut d = dispatcher("vray", 1, 4);
        assert!(d.dispatch("V-Ray: Updating frame at time 1").is_noop());
        assert!(d.dispatch("V-Ray: Render complete").is_noop());
    }

    #[test]
    fn fumefx_uses_its_own_span() {
        let mut d = dispatcher("mayaSoftware", 1, 1);
        d.dispatch("FumeFX: Starting simulation (-20 - 40).");
        d.dispatch("FumeFX: Memory used: 86Mb");
        d.dispatch("FumeFX: Frame Time: 00:01.69");
        d.dispatch("FumeFX: Estimated Time: 00:00:18");
        let fx = d.dispatch("FumeFX: Frame: 10");
        let p = fx.progress().unwrap();
        assert!((p - 31.0 / 61.0 * 100.0).abs() < 1e-9);
        assert_eq!(
            fx.status(),
            Some("FumeFX: (10 to 40) - Mem: 86Mb - LastTime: 00:01.69 - ETA: 00:00:18")
        );
    }

    #[test]
    fn caustic_pass_progress_needs_pass_count() {
        let mut d = dispatcher("causticvisualizer", 1, 2);
        assert!(d.dispatch("Rendered to pass 4").is_noop());
        d.dispatch("Executing frame 2");
        d.dispatch("Rendering 8 passes");
        assert_eq!(progress_of(&mut d, "Rendered to pass 4"), Some(75.0));
    }

    #[test]
    fn oversized_numbers_leave_progress_alone() {
        let mut d = dispatcher("mayaSoftware", 1, 10);
        assert!(d
            .dispatch("Finished Rendering /out/shot.99999999999999999.exr")
            .is_noop());
        assert_eq!(progress_of(&mut d, "Finished Rendering /out/shot.0002.exr"), Some(20.0));

        let mut d = dispatcher("causticvisualizer", 1, 2);
        d.dispatch("Rendering 8 passes");
        assert!(d.dispatch("Rendered to pass 99999999999999999").is_noop());
        d.dispatch("Executing frame 99999999999999999");
        assert!(d.dispatch("Rendered to pass 4").is_noop());

        let mut d = dispatcher("mayaSoftware", 1, 1);
        d.dispatch("FumeFX: Starting simulation (-9223372036854775808 - 9223372036854775807).");
        let fx = d.dispatch("FumeFX: Frame: 9223372036854775807");
        assert!(fx.progress().is_some_and(f64::is_finite));
    }

    #[test]
    fn octane_blends_samples_with_started_frames() {
        let mut d = dispatcher("octanerender", 1, 2);
        d.dispatch("Octane: starting animation of frame 1");
        let fx = d.dispatch("Octane: Refreshed image, 50 samples per pixel of 200");
        assert_eq!(fx.progress(), Some(12.5));
        assert!(fx.status().unwrap().starts_with("Octane: Refreshed image"));
        d.dispatch("Octane: starting animation of frame 2");
        assert_eq!(
            progress_of(&mut d, "Octane: Refreshed image, 200 samples per pixel of 200"),
            Some(100.0)
        );
    }

    #[test]
    fn renderman_normalizes_offset_frame_numbers() {
        let mut d = dispatcher("renderman", 101, 104);
        let fx = d.dispatch("rfm Notice: Rendering layer at 102");
        assert_eq!(fx.progress(), Some(50.0));
        assert_eq!(fx.status(), Some("rfm Notice: Rendering layer at 102"));

        let mut single = dispatcher("renderman", 5, 5);
        let fx = single.dispatch("rfm Notice: Rendering layer at 5");
        assert_eq!(fx.progress(), None);
        assert!(fx.status().is_some());
    }

    #[test]
    fn redshift_gpu_affinity_failure_names_the_device() {
        let mut d = dispatcher("redshift", 1, 1);
        let fx = d.dispatch("redshiftSelectCudaDevices.mel line 12: Invalid device id: 3");
        assert_eq!(
            fx.failure(),
            Some(
                "Redshift has detected that the selected GPU '3' is invalid. \
                 Failing the task to prevent Redshift from using all GPUs."
            )
        );
    }

    #[test]
    fn unmatched_and_malformed_lines_are_noops() {
        let mut d = dispatcher("mayaSoftware", 1, 10);
        assert!(d.dispatch("Starting Rendering /jobs/shot.mb").is_noop());
        assert!(d.dispatch("[PROGRESS] Percentage of rendering done: lots").is_noop());
        assert_eq!(d.state().progress_percent, 0.0);
    }

    #[test]
    fn absolute_percent_is_taken_verbatim() {
        let mut d = dispatcher("turtle", 1, 10);
        assert_eq!(
            progress_of(&mut d, "[PROGRESS] TURTLE rendering frame 42.50 done"),
            Some(42.5)
        );
        assert_eq!(
            progress_of(&mut d, "[PROGRESS] Percentage of rendering done: 61%"),
            Some(61.0)
        );
    }

    #[test]
    fn reset_starts_a_fresh_task() {
        let mut d = dispatcher("mayaSoftware", 1, 10);
        d.dispatch("Finished Rendering");
        d.reset();
        assert_eq!(d.state(), &ProgressState::default());
    }
}
