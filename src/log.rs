//! Program logging, built on `fern`.
//!
//! Where messages go depends on the command being run. Query commands print their results (often
//! JSON) on stdout, so every log message goes to stderr instead. The `report` command logs
//! progress to stdout, problems to stderr, and keeps a copy of both in the output directory.
//!
//! The log level set by the user applies to agrisuit's own messages; other crates only get
//! through with warnings and errors.
use anyhow::{Context, Result, bail};
use chrono::Local;
use fern::colors::{Color, ColoredLevelConfig};
use fern::{Dispatch, FormatCallback};
use log::{LevelFilter, Metadata, Record};
use std::env;
use std::fmt::{Arguments, Display};
use std::fs::File;
use std::io::IsTerminal;
use std::path::Path;
use std::sync::{Mutex, OnceLock, PoisonError};

/// A flag indicating whether the logger has been initialised
static LOGGER_INIT: OnceLock<()> = OnceLock::new();

/// Held while checking for and setting up the logger in [`init_once`]
static INIT_LOCK: Mutex<()> = Mutex::new(());

/// The log target prefix shared by all of agrisuit's modules
const CRATE_TARGET: &str = env!("CARGO_CRATE_NAME");

/// The log level used if neither `AGRISUIT_LOG_LEVEL` nor the settings file gives one
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// The environment variable which overrides the log level
pub const LOG_LEVEL_ENV_VAR: &str = "AGRISUIT_LOG_LEVEL";

/// The file name for the log file containing messages about ordinary operation
pub const LOG_INFO_FILE_NAME: &str = "agrisuit_info.log";

/// The file name for the log file containing warnings and error messages
pub const LOG_ERROR_FILE_NAME: &str = "agrisuit_error.log";

/// Where log messages are sent
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogOutput<'a> {
    /// Everything to stderr, leaving stdout for command results
    Stderr,
    /// Progress to stdout, warnings and errors to stderr
    Console,
    /// As for [`LogOutput::Console`], also writing both streams to files in this directory
    Directory(&'a Path),
}

/// Whether the program logger has been initialised
pub fn is_logger_initialised() -> bool {
    LOGGER_INIT.get().is_some()
}

/// Initialise the program logger.
///
/// The level is taken from `AGRISUIT_LOG_LEVEL` if set, else from `settings.toml`, else
/// [`DEFAULT_LOG_LEVEL`]. Levels are `off`, `error`, `warn`, `info`, `debug` and `trace`.
///
/// Fails if the level is unknown, a log file cannot be created or the logger is already set up.
pub fn init(log_level_from_settings: Option<&str>, output: LogOutput) -> Result<()> {
    let log_level_from_env = env::var(LOG_LEVEL_ENV_VAR).ok();
    let log_level = resolve_log_level(log_level_from_env.as_deref(), log_level_from_settings)?;

    let mut dispatch = Dispatch::new()
        .level(log_level.min(LevelFilter::Warn))
        .level_for(CRATE_TARGET, log_level);

    dispatch = match output {
        LogOutput::Stderr => {
            dispatch.chain(terminal(std::io::stderr().is_terminal()).chain(std::io::stderr()))
        }
        LogOutput::Console | LogOutput::Directory(_) => dispatch
            .chain(
                terminal(std::io::stdout().is_terminal())
                    .filter(is_progress)
                    .chain(std::io::stdout()),
            )
            .chain(
                terminal(std::io::stderr().is_terminal())
                    .level(LevelFilter::Warn)
                    .chain(std::io::stderr()),
            ),
    };

    if let LogOutput::Directory(dir) = output {
        dispatch = dispatch
            .chain(
                Dispatch::new()
                    .filter(is_progress)
                    .format(write_log_plain)
                    .chain(create_log_file(dir, LOG_INFO_FILE_NAME)?),
            )
            .chain(
                Dispatch::new()
                    .level(LevelFilter::Warn)
                    .format(write_log_plain)
                    .chain(create_log_file(dir, LOG_ERROR_FILE_NAME)?),
            );
    }

    dispatch.apply().context("Logger already initialised")?;
    let _ = LOGGER_INIT.set(());

    Ok(())
}

/// As [`init`], but does nothing if the logger is already set up, even by another thread
pub fn init_once(log_level_from_settings: Option<&str>, output: LogOutput) -> Result<()> {
    let _guard = INIT_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    if is_logger_initialised() {
        return Ok(());
    }

    init(log_level_from_settings, output)
}

/// Pick the log level, giving the environment precedence over the settings file
fn resolve_log_level(from_env: Option<&str>, from_settings: Option<&str>) -> Result<LevelFilter> {
    parse_log_level(from_env.or(from_settings).unwrap_or(DEFAULT_LOG_LEVEL))
}

/// Convert a log level name (case-insensitive) to a [`LevelFilter`]
fn parse_log_level(log_level: &str) -> Result<LevelFilter> {
    let level = match log_level.trim().to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        unknown => bail!("Unknown log level: {unknown}"),
    };

    Ok(level)
}

/// Messages below warning level
fn is_progress(metadata: &Metadata) -> bool {
    metadata.level() > LevelFilter::Warn
}

fn create_log_file(dir: &Path, file_name: &str) -> Result<File> {
    let file_path = dir.join(file_name);
    File::create(&file_path)
        .with_context(|| format!("Could not create log file {}", file_path.display()))
}

/// A dispatcher for a terminal stream, coloured if the stream is a terminal
fn terminal(use_colour: bool) -> Dispatch {
    let colours = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::Magenta);

    Dispatch::new().format(move |out, message, record| {
        if use_colour {
            write_log(out, colours.color(record.level()), record, message);
        } else {
            write_log_plain(out, message, record);
        }
    })
}

/// Module path relative to the crate, e.g. `input::crop` for `agrisuit::input::crop`
fn short_target(target: &str) -> &str {
    target
        .strip_prefix(CRATE_TARGET)
        .and_then(|rest| rest.strip_prefix("::"))
        .unwrap_or(target)
}

fn write_log<T: Display>(out: FormatCallback, level: T, record: &Record, message: &Arguments) {
    let timestamp = Local::now().format("%H:%M:%S");
    let target = short_target(record.target());

    out.finish(format_args!("[{timestamp} {level} {target}] {message}"));
}

fn write_log_plain(out: FormatCallback, message: &Arguments, record: &Record) {
    write_log(out, record.level(), record, message);
}
