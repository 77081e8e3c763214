//! Code for loading program settings.
use crate::get_agrisuit_config_dir;
use crate::input::read_toml;
use crate::log::DEFAULT_LOG_LEVEL;
use anyhow::{Context, Result, anyhow};
use documented::DocumentedFields;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};

const SETTINGS_FILE_NAME: &str = "settings.toml";

const DEFAULT_SETTINGS_FILE_HEADER: &str = "# This file contains the program settings for agrisuit.
# Uncomment a setting to change it from its default value.
";

/// Default log level for program
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

/// Get the path to where the settings file will be read from
pub fn get_settings_file_path() -> PathBuf {
    let mut path = get_agrisuit_config_dir();
    path.push(SETTINGS_FILE_NAME);

    path
}

/// Program settings from config file
#[derive(Debug, DocumentedFields, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// The default program log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Whether to overwrite existing report files by default
    #[serde(default)]
    pub overwrite: bool,
    /// Whether to write every sub-parameter score to an extra CSV file
    #[serde(default)]
    pub debug_scores: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            overwrite: false,
            debug_scores: false,
        }
    }
}

impl Settings {
    /// Read the program settings from the user's config directory.
    ///
    /// If the file is not present, default values for settings will be used
    ///
    /// # Returns
    ///
    /// The program settings as a `Settings` struct or an error if the file is invalid
    pub fn load() -> Result<Settings> {
        Self::load_from_dir(&get_agrisuit_config_dir())
    }

    /// Read the settings file from the specified directory, if it exists
    fn load_from_dir(config_dir: &Path) -> Result<Settings> {
        if !config_dir.join(SETTINGS_FILE_NAME).is_file() {
            return Ok(Settings::default());
        }

        read_toml(config_dir, SETTINGS_FILE_NAME)
    }

    /// The contents of the default settings file
    pub fn default_file_contents() -> Result<String> {
        // Convert default settings to TOML
        let settings_raw =
            toml::to_string(&Settings::default()).context("Could not convert settings to TOML")?;

        // Iterate through the generated TOML, commenting out lines and adding docs
        let mut out = DEFAULT_SETTINGS_FILE_HEADER.to_string();
        for line in settings_raw.split('\n') {
            if let Some(last) = line.find('=') {
                // Add documentation from doc comments
                let field = line[..last].trim();
                let docs = Settings::get_field_docs(field)
                    .map_err(|_| anyhow!("Missing doc comment for field {field}"))?;
                for line in docs.split('\n') {
                    write!(&mut out, "\n# # {}\n", line.trim())?;
                }

                writeln!(&mut out, "# {}", line.trim())?;
            }
        }

        Ok(out)
    }

    /// Write the default settings file to `file_path` unless a file is already there.
    ///
    /// Returns whether a new file was written.
    pub fn write_default_file(file_path: &Path) -> Result<bool> {
        if file_path.is_file() {
            return Ok(false);
        }

        if let Some(dir_path) = file_path.parent() {
            fs::create_dir_all(dir_path)
                .with_context(|| format!("Failed to create directory: {}", dir_path.display()))?;
        }
        fs::write(file_path, Self::default_file_contents()?)
            .with_context(|| format!("Failed to write settings file: {}", file_path.display()))?;

        Ok(true)
    }

    /// The settings as TOML, with the log level replaced by `log_level_from_env` if given
    pub fn effective_toml(mut self, log_level_from_env: Option<String>) -> Result<String> {
        if let Some(log_level) = log_level_from_env {
            self.log_level = log_level;
        }

        toml::to_string(&self).context("Could not convert settings to TOML")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_settings_load_from_dir_no_file() {
        let dir = tempdir().unwrap(); // NB: no settings file
        assert_eq!(
            Settings::load_from_dir(dir.path()).unwrap(),
            Settings::default()
        );
    }

    #[test]
    fn test_settings_load_from_dir() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join(SETTINGS_FILE_NAME);

        {
            let mut file = File::create(&file_path).unwrap();
            writeln!(file, "log_level = \"warn\"\ndebug_scores = true").unwrap();
        }

        assert_eq!(
            Settings::load_from_dir(dir.path()).unwrap(),
            Settings {
                log_level: "warn".to_string(),
                overwrite: false,
                debug_scores: true,
            }
        );
    }

    #[test]
    fn test_default_file_contents() {
        let contents = Settings::default_file_contents().unwrap();
        assert!(contents.starts_with(DEFAULT_SETTINGS_FILE_HEADER));
        assert!(contents.contains("# log_level = \"info\""));
        assert!(contents.contains("# # Whether to overwrite existing report files by default"));

        // Uncommenting every setting gives back the defaults
        let uncommented: String = contents
            .lines()
            .filter_map(|line| line.strip_prefix("# "))
            .filter(|line| line.contains('=') && !line.starts_with('#'))
            .map(|line| format!("{line}\n"))
            .collect();
        let settings: Settings = toml::from_str(&uncommented).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_write_default_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("agrisuit").join(SETTINGS_FILE_NAME);
        assert!(Settings::write_default_file(&file_path).unwrap());
        assert_eq!(
            fs::read_to_string(&file_path).unwrap(),
            Settings::default_file_contents().unwrap()
        );

        // An existing file is left alone
        fs::write(&file_path, "log_level = \"warn\"\n").unwrap();
        assert!(!Settings::write_default_file(&file_path).unwrap());
        assert_eq!(
            Settings::load_from_dir(&dir.path().join("agrisuit")).unwrap(),
            Settings {
                log_level: "warn".to_string(),
                ..Settings::default()
            }
        );
    }

    #[test]
    fn test_effective_toml() {
        let settings = Settings {
            debug_scores: true,
            ..Settings::default()
        };
        let toml = settings.effective_toml(None).unwrap();
        assert!(toml.contains("log_level = \"info\""));
        assert!(toml.contains("debug_scores = true"));

        let toml = Settings::default()
            .effective_toml(Some("trace".to_string()))
            .unwrap();
        assert!(toml.contains("log_level = \"trace\""));
    }
}
