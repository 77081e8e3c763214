//! The `settings` subcommands.
use crate::log::LOG_LEVEL_ENV_VAR;
use crate::settings::{Settings, get_settings_file_path};
use anyhow::{Context, Result};
use clap::Subcommand;
use std::env;

/// Subcommands for settings
#[derive(Subcommand)]
pub enum SettingsSubcommands {
    /// Open the settings file in a text editor, creating it first if needed
    Edit,
    /// Print the path the settings file is read from
    Path,
    /// Print the settings in effect, including any AGRISUIT_LOG_LEVEL override
    Show,
    /// Print a settings file with every setting commented out at its default value
    DumpDefault,
}

impl SettingsSubcommands {
    /// Execute the supplied settings subcommand
    pub fn execute(self) -> Result<()> {
        let file_path = get_settings_file_path();
        match self {
            Self::Edit => {
                if Settings::write_default_file(&file_path)? {
                    println!("Created settings file: {}", file_path.display());
                }
                println!("Opening settings file for editing: {}", file_path.display());
                edit::edit_file(&file_path)
                    .with_context(|| format!("Could not open editor for {}", file_path.display()))?;
            }
            Self::Path => println!("{}", file_path.display()),
            Self::Show => {
                let settings = Settings::load().context("Failed to load settings.")?;
                print!("{}", settings.effective_toml(env::var(LOG_LEVEL_ENV_VAR).ok())?);
            }
            Self::DumpDefault => print!("{}", Settings::default_file_contents()?),
        }

        Ok(())
    }
}
