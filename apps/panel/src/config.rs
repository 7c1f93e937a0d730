use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::Deserialize;
use teleop_core::{speed, SpeedBounds};
use tracing::{info, warn};

const DEFAULT_CONFIG_FILE: &str = "panel.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct PanelSettings {
    pub bridge_url: String,
    pub cmd_vel_topic: String,
    pub pose_topic: String,
    pub speed_min: f64,
    pub speed_max: f64,
    pub speed_step: f64,
    pub speed_initial: f64,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            bridge_url: "ws://192.168.10.123:9090".into(),
            cmd_vel_topic: "/cmd_vel".into(),
            pose_topic: teleop_core::pose::DEFAULT_POSE_TOPIC.into(),
            speed_min: speed::DEFAULT_MIN,
            speed_max: speed::DEFAULT_MAX,
            speed_step: speed::DEFAULT_STEP,
            speed_initial: teleop_core::translator::BASE_LIMIT,
        }
    }
}

impl PanelSettings {
    pub fn speed_bounds(&self) -> SpeedBounds {
        SpeedBounds {
            min: self.speed_min,
            max: self.speed_max,
            step: self.speed_step,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    bridge_url: Option<String>,
    cmd_vel_topic: Option<String>,
    pose_topic: Option<String>,
    speed_min: Option<f64>,
    speed_max: Option<f64>,
    speed_step: Option<f64>,
    speed_initial: Option<f64>,
}

/// Defaults, then the config file, then environment variables.
///
/// An explicit `path` must exist; otherwise `panel.toml` in the working
/// directory is read when present.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<PanelSettings> {
    let mut settings = PanelSettings::default();

    let file = match path {
        Some(path) => Some(path.to_path_buf()),
        None => Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|p| p.exists()),
    };
    if let Some(file) = file {
        let raw = fs::read_to_string(&file)
            .with_context(|| format!("failed to read config file '{}'", file.display()))?;
        apply_file(&mut settings, &raw)
            .with_context(|| format!("invalid config file '{}'", file.display()))?;
        info!(path = %file.display(), "loaded panel config");
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn apply_file(settings: &mut PanelSettings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw)?;
    if let Some(v) = file_cfg.bridge_url {
        settings.bridge_url = v;
    }
    if let Some(v) = file_cfg.cmd_vel_topic {
        settings.cmd_vel_topic = v;
    }
    if let Some(v) = file_cfg.pose_topic {
        settings.pose_topic = v;
    }
    if let Some(v) = file_cfg.speed_min {
        settings.speed_min = v;
    }
    if let Some(v) = file_cfg.speed_max {
        settings.speed_max = v;
    }
    if let Some(v) = file_cfg.speed_step {
        settings.speed_step = v;
    }
    if let Some(v) = file_cfg.speed_initial {
        settings.speed_initial = v;
    }
    Ok(())
}

fn apply_env(settings: &mut PanelSettings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("TELEOP_BRIDGE_URL") {
        settings.bridge_url = v;
    }
    if let Some(v) = lookup("APP__BRIDGE_URL") {
        settings.bridge_url = v;
    }

    if let Some(v) = lookup("TELEOP_CMD_VEL_TOPIC") {
        settings.cmd_vel_topic = v;
    }
    if let Some(v) = lookup("TELEOP_POSE_TOPIC") {
        settings.pose_topic = v;
    }

    for (key, slot) in [
        ("APP__SPEED_MIN", &mut settings.speed_min),
        ("APP__SPEED_MAX", &mut settings.speed_max),
        ("APP__SPEED_STEP", &mut settings.speed_step),
        ("APP__SPEED_INITIAL", &mut settings.speed_initial),
    ] {
        let Some(raw) = lookup(key) else {
            continue;
        };
        match raw.trim().parse::<f64>() {
            Ok(parsed) => *slot = parsed,
            Err(err) => warn!(key, value = %raw, %err, "ignoring non-numeric setting"),
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
