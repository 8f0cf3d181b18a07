//! Host configuration stored as `config.toml` in the data directory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use asana_studio_core::{PlaybackSettings, SpeechParams};
use serde::{Deserialize, Serialize};

/// Returns the data directory, creating it if needed.
///
/// `ASANA_STUDIO_DATA_DIR` wins when set. Otherwise this is
/// `~/.config/asana-studio[-dev]/`, where `ASANA_STUDIO_ENV=dev` selects the
/// development directory.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let dir = match std::env::var_os("ASANA_STUDIO_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("ASANA_STUDIO_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("asana-studio-dev")
            } else {
                base_dir.join("asana-studio")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Milliseconds between countdown ticks.
    #[serde(default = "default_tick_millis")]
    pub tick_millis: u64,
    #[serde(default = "default_true")]
    pub voice_enabled: bool,
    /// Column width of the pose glyph; 0 hides it.
    #[serde(default = "default_glyph_size")]
    pub glyph_size: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechConfig {
    #[serde(default = "default_rate")]
    pub rate: f64,
    #[serde(default = "default_pitch")]
    pub pitch: f64,
    #[serde(default = "default_volume")]
    pub volume: f64,
    /// External text-to-speech program. Announcements are printed when unset.
    #[serde(default)]
    pub command: Option<String>,
    /// Arguments placed before the text. `{rate}`, `{pitch}` and `{volume}`
    /// are substituted.
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

fn default_tick_millis() -> u64 {
    1000
}
fn default_true() -> bool {
    true
}
fn default_glyph_size() -> u16 {
    9
}
fn default_rate() -> f64 {
    0.9
}
fn default_pitch() -> f64 {
    1.0
}
fn default_volume() -> f64 {
    0.8
}
fn default_base_url() -> String {
    "http://localhost:8000/api".to_string()
}
fn default_timeout_secs() -> u64 {
    10
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tick_millis: default_tick_millis(),
            voice_enabled: true,
            glyph_size: default_glyph_size(),
        }
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            rate: default_rate(),
            pitch: default_pitch(),
            volume: default_volume(),
            command: None,
            args: Vec::new(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            playback: PlaybackConfig::default(),
            speech: SpeechConfig::default(),
            api: ApiConfig::default(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }
        key.split('.').try_fold(root, |current, part| current.get(part))
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let (parent, leaf) = match key.rsplit_once('.') {
            Some((parent, leaf)) => (Some(parent), leaf),
            None => (None, key),
        };
        if leaf.is_empty() {
            return Err("config key is empty".into());
        }

        let mut current = root;
        if let Some(parent) = parent {
            for part in parent.split('.') {
                current = current
                    .get_mut(part)
                    .ok_or_else(|| format!("unknown config key: {key}"))?;
            }
        }

        let obj = current
            .as_object_mut()
            .ok_or_else(|| format!("unknown config key: {key}"))?;
        let existing = obj
            .get(leaf)
            .ok_or_else(|| format!("unknown config key: {key}"))?;

        let new_value = match existing {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(value.parse::<bool>()?),
            serde_json::Value::Number(_) => {
                if let Ok(n) = value.parse::<u64>() {
                    serde_json::Value::Number(n.into())
                } else if let Ok(n) = value.parse::<f64>() {
                    serde_json::Number::from_f64(n)
                        .map(serde_json::Value::Number)
                        .ok_or_else(|| format!("cannot parse '{value}' as number"))?
                } else {
                    return Err(format!("cannot parse '{value}' as number").into());
                }
            }
            serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                serde_json::from_str(value)?
            }
            _ => serde_json::Value::String(value.into()),
        };

        obj.insert(leaf.to_string(), new_value);
        Ok(())
    }

    pub fn path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the data directory, writing defaults on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Persist to the data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key and persist it.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown keys, values of the wrong type, or
    /// when saving fails.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
        self.apply(key, value)?;
        self.save()
    }

    fn apply(&mut self, key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json)?;
        Ok(())
    }

    /// Load config, falling back to defaults on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default config");
            Self::default()
        })
    }

    pub fn playback_settings(&self) -> PlaybackSettings {
        PlaybackSettings {
            tick_period: Duration::from_millis(self.playback.tick_millis.max(1)),
            voice_enabled: self.playback.voice_enabled,
        }
    }

    pub fn speech_params(&self) -> SpeechParams {
        SpeechParams {
            rate: self.speech.rate as f32,
            pitch: self.speech.pitch as f32,
            volume: self.speech.volume as f32,
        }
    }
}
