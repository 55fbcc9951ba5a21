use crate::job::JobSettings;
use crate::renderer::RendererKind;

/// Environment variables set for the renderer process, in the order they
/// are applied.
pub fn session_environment(settings: &JobSettings) -> Vec<(String, String)> {
    let mut env = SessionEnv::default();

    env.set("MAYA_DEBUG_ENABLE_CRASH_REPORTING", "0", None);
    env.set("MAYA_DISABLE_CIP", "1", Some("ADSK Customer Involvement Program"));
    env.set("MAYA_DISABLE_CER", "1", Some("ADSK Customer Error Reporting"));
    env.set("MAYA_DISABLE_CLIC_IPM", "1", Some("ADSK In Product Messaging"));
    env.set("MAYA_OPENCL_IGNORE_DRIVER_VERSION", "1", None);
    env.set("MAYA_VP2_DEVICE_OVERRIDE", "VirtualDeviceDx11", None);
    env.set(
        "MAYA_RENDER_SETUP_INCLUDE_ALL_LIGHTS",
        flag(settings.render_setup_include_lights),
        None,
    );

    if !settings.ocio_policy_file.is_empty() {
        env.set("MAYA_COLOR_MANAGEMENT_POLICY_FILE", &settings.ocio_policy_file, None);
    } else if !settings.ocio_config_file.is_empty() {
        env.set("OCIO", &settings.ocio_config_file, None);
    }

    if settings.renderer == RendererKind::Redshift {
        env.set(
            "REDSHIFT_FORCEQUITONINTERNALERROR",
            "1",
            Some("quit Maya on internal Redshift errors"),
        );
    }

    if settings.version.at_least(2016, true) {
        env.set(
            "MAYA_ENABLE_LEGACY_RENDER_LAYERS",
            flag(settings.use_legacy_render_layers),
            None,
        );
    }

    env.vars
}

#[derive(Default)]
struct SessionEnv {
    vars: Vec<(String, String)>,
}

impl SessionEnv {
    fn set(&mut self, key: &str, value: &str, description: Option<&str>) {
        match description {
            Some(d) => tracing::info!("Setting {key} ({d}) environment variable to {value} for this session"),
            None => tracing::info!("Setting {key} environment variable to {value} for this session"),
        }
        self.vars.push((key.to_string(), value.to_string()));
    }
}

fn flag(b: bool) -> &'static str {
    if b {
        "1"
    } else {
        "0"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::PluginInfo;

    fn env_for(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        let mut info = PluginInfo::from_pairs([("SceneFile", "/jobs/shot.mb")]);
        for (k, v) in pairs {
            info.insert(k, v);
        }
        session_environment(&JobSettings::from_plugin_info(info).unwrap())
    }

    fn get<'a>(env: &'a [(String, String)], key: &str) -> Option<&'a str> {
        env.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    #[test]
    fn baseline_variables_are_always_set() {
        let env = env_for(&[("Version", "2016")]);
        assert_eq!(env[0], ("MAYA_DEBUG_ENABLE_CRASH_REPORTING".into(), "0".into()));
        assert_eq!(get(&env, "MAYA_VP2_DEVICE_OVERRIDE"), Some("VirtualDeviceDx11"));
        assert_eq!(get(&env, "MAYA_RENDER_SETUP_INCLUDE_ALL_LIGHTS"), Some("1"));
        assert_eq!(get(&env, "MAYA_ENABLE_LEGACY_RENDER_LAYERS"), None);
        assert_eq!(get(&env, "REDSHIFT_FORCEQUITONINTERNALERROR"), None);
    }

    #[test]
    fn legacy_layers_from_2016_5() {
        let env = env_for(&[("Version", "2016.5"), ("UseLegacyRenderLayers", "true")]);
        assert_eq!(get(&env, "MAYA_ENABLE_LEGACY_RENDER_LAYERS"), Some("1"));
    }

    #[test]
    fn policy_file_wins_over_ocio_config() {
        let env = env_for(&[
            ("Version", "2023"),
            ("OCIOConfigFile", "/color/config.ocio"),
            ("OCIOPolicyFile", "/color/policy.xml"),
        ]);
        assert_eq!(get(&env, "MAYA_COLOR_MANAGEMENT_POLICY_FILE"), Some("/color/policy.xml"));
        assert_eq!(get(&env, "OCIO"), None);

        let env = env_for(&[("Version", "2023"), ("OCIOConfigFile", "/color/config.ocio")]);
        assert_eq!(get(&env, "OCIO"), Some("/color/config.ocio"));
    }

    #[test]
    fn redshift_quits_on_internal_error() {
        let env = env_for(&[("Version", "2023"), ("Renderer", "redshift")]);
        assert_eq!(get(&env, "REDSHIFT_FORCEQUITONINTERNALERROR"), Some("1"));
    }
}
