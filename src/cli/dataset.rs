//! The CLI commands for interacting with the bundled datasets.
use crate::dataset::{BUILTIN_DATASETS, builtin_dataset_names, get_builtin_dataset};
use anyhow::{Context, Result, bail, ensure};
use clap::Subcommand;
use include_dir::DirEntry;
use std::fs;
use std::path::{Path, PathBuf};

/// The available subcommands for managing bundled datasets.
#[derive(Subcommand)]
pub enum DatasetSubcommands {
    /// List bundled datasets.
    List,
    /// Provide information about the specified dataset.
    Info {
        /// The name of the dataset.
        name: String,
    },
    /// Extract a bundled dataset to a new directory.
    Extract {
        /// The name of the dataset to extract.
        name: String,
        /// The destination folder for the dataset.
        new_path: Option<PathBuf>,
    },
}

impl DatasetSubcommands {
    /// Execute the supplied dataset subcommand
    pub fn execute(self) -> Result<()> {
        match self {
            Self::List => handle_dataset_list_command(),
            Self::Info { name } => handle_dataset_info_command(&name)?,
            Self::Extract {
                name,
                new_path: dest,
            } => handle_dataset_extract_command(&name, dest.as_deref())?,
        }

        Ok(())
    }
}

/// Handle the `dataset list` command.
fn handle_dataset_list_command() {
    for name in builtin_dataset_names() {
        println!("{name}");
    }
}

/// Handle the `dataset info` command.
fn handle_dataset_info_command(name: &str) -> Result<()> {
    let path: PathBuf = [name, "README.txt"].iter().collect();
    let readme = BUILTIN_DATASETS
        .get_file(path)
        .context("Dataset not found.")?
        .contents_utf8()
        .context("README.txt is not UTF-8 encoded")?;

    println!("{readme}");

    Ok(())
}

/// Handle the `dataset extract` command
fn handle_dataset_extract_command(name: &str, dest: Option<&Path>) -> Result<()> {
    let dest = dest.unwrap_or(Path::new(name));
    extract_dataset(name, dest)
}

/// Extract the specified bundled dataset to a new directory
pub fn extract_dataset(name: &str, new_path: &Path) -> Result<()> {
    let sub_dir = get_builtin_dataset(name)?;

    ensure!(
        !new_path.exists(),
        "Destination directory {} already exists",
        new_path.display()
    );

    // Copy the contents of the subdirectory to the destination
    fs::create_dir(new_path)?;
    for entry in sub_dir.entries() {
        match entry {
            DirEntry::Dir(dir) => bail!(
                "Subdirectories in datasets not supported: {}",
                dir.path().display()
            ),
            DirEntry::File(f) => {
                let file_name = f
                    .path()
                    .file_name()
                    .with_context(|| format!("Invalid file path: {}", f.path().display()))?;
                fs::write(new_path.join(file_name), f.contents())?;
            }
        }
    }

    Ok(())
}
