//! Settings persistence
//!
//! Stores user preferences in `~/.config/csdedit/config.yaml`

use serde::{Deserialize, Serialize};

/// Run and environment settings that persist across sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Csound binary used for terminal runs
    #[serde(default = "default_csound_executable")]
    pub csound_executable: String,

    /// Python binary used for terminal runs of .py documents
    #[serde(default = "default_python_executable")]
    pub python_executable: String,

    /// Terminal emulator for "run in terminal"
    #[serde(default = "default_terminal")]
    pub terminal: String,

    /// OPCODEDIR exported before the engine starts, when active
    #[serde(default)]
    pub opcodedir: Option<String>,
    #[serde(default)]
    pub opcodedir_active: bool,

    /// Flags for realtime runs (e.g. "-o dac")
    #[serde(default = "default_rt_flags")]
    pub rt_flags: String,
    /// Flags for offline renders
    #[serde(default = "default_file_flags")]
    pub file_flags: String,

    /// When false, the document's own <CsOptions> win for realtime runs
    #[serde(default = "default_true")]
    pub rt_use_options: bool,
    /// When false, the document's own <CsOptions> win for offline renders
    #[serde(default = "default_true")]
    pub file_use_options: bool,
}

fn default_csound_executable() -> String {
    "csound".to_string()
}

fn default_python_executable() -> String {
    "python3".to_string()
}

fn default_terminal() -> String {
    "xterm".to_string()
}

fn default_rt_flags() -> String {
    "-o dac".to_string()
}

fn default_file_flags() -> String {
    "-o output.wav".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            csound_executable: default_csound_executable(),
            python_executable: default_python_executable(),
            terminal: default_terminal(),
            opcodedir: None,
            opcodedir_active: false,
            rt_flags: default_rt_flags(),
            file_flags: default_file_flags(),
            rt_use_options: true,
            file_use_options: true,
        }
    }
}

impl Settings {
    /// Load settings from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(settings) => {
                    tracing::info!("Loaded config from {}", path.display());
                    settings
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save settings to disk
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(&path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// The configured flag set for one run, or None when the corresponding
    /// "use options" toggle is off and the document's own options win.
    pub fn command_line_flags(&self, realtime: bool) -> Option<&str> {
        let use_configured = if realtime {
            self.rt_use_options
        } else {
            self.file_use_options
        };
        if !use_configured {
            return None;
        }
        Some(if realtime {
            &self.rt_flags
        } else {
            &self.file_flags
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let settings = Settings::default();
        assert_eq!(settings.csound_executable, "csound");
        assert_eq!(settings.terminal, "xterm");
        assert!(settings.rt_use_options);
        assert!(!settings.opcodedir_active);
    }

    #[test]
    fn flags_follow_the_use_options_toggles() {
        let mut settings = Settings::default();
        assert_eq!(settings.command_line_flags(true), Some("-o dac"));
        assert_eq!(settings.command_line_flags(false), Some("-o output.wav"));

        settings.rt_use_options = false;
        assert_eq!(settings.command_line_flags(true), None);
        assert_eq!(settings.command_line_flags(false), Some("-o output.wav"));
    }

    #[test]
    fn yaml_roundtrip_preserves_fields() {
        let mut settings = Settings::default();
        settings.opcodedir = Some("/usr/lib/csound/plugins".to_string());
        settings.opcodedir_active = true;
        settings.rt_flags = "-+rtaudio=jack -o dac".to_string();

        let yaml = serde_yaml::to_string(&settings).unwrap();
        let loaded: Settings = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(loaded.opcodedir.as_deref(), Some("/usr/lib/csound/plugins"));
        assert!(loaded.opcodedir_active);
        assert_eq!(loaded.rt_flags, "-+rtaudio=jack -o dac");
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let loaded: Settings = serde_yaml::from_str("terminal: konsole\n").unwrap();
        assert_eq!(loaded.terminal, "konsole");
        assert_eq!(loaded.csound_executable, "csound");
        assert!(loaded.file_use_options);
    }
}
