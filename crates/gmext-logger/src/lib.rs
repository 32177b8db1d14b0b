//! Console and file logging for gmextpack
//!
//! Console output depends on the verbosity set at startup; every record also
//! goes to a per-run log file under the user config directory.

use colored::Colorize;
use indicatif::ProgressBar;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

static LOG_FILE: Mutex<Option<PathBuf>> = Mutex::new(None);
static VERBOSITY: Mutex<u8> = Mutex::new(0);
static QUIET: Mutex<bool> = Mutex::new(false);
static SPINNER: Mutex<Option<ProgressBar>> = Mutex::new(None);

const LOG_FILE_NAME: &str = "gmextpack.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Success,
}

impl Level {
    fn tag(self) -> &'static str {
        match self {
            Level::Trace => "STEP",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Success => "SUCCESS",
        }
    }

    /// Whether the record is shown on stderr at the current settings
    fn on_console(self) -> bool {
        match self {
            Level::Trace => get_verbosity() >= 2,
            Level::Debug | Level::Info => get_verbosity() >= 1,
            Level::Warn | Level::Error => true,
            Level::Success => !get_quiet(),
        }
    }
}

/// Current verbosity: 0 = warnings only, 1 = debug (-v), 2 = trace (-vv)
pub fn get_verbosity() -> u8 {
    VERBOSITY.lock().ok().map(|v| *v).unwrap_or(0)
}

fn get_quiet() -> bool {
    QUIET.lock().ok().map(|v| *v).unwrap_or(false)
}

/// Filter directive for the tracing subscriber matching the verbosity level
pub fn verbosity_filter() -> &'static str {
    match get_verbosity() {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}

/// Initialize the logger with a verbosity level, logging to the default file
pub fn init_with_verbosity(verbosity: u8, quiet: bool) -> Result<(), String> {
    init_with_log_dir(verbosity, quiet, &get_config_dir()?)
}

/// Initialize the logger, writing the log file into `dir`
pub fn init_with_log_dir(verbosity: u8, quiet: bool, dir: &Path) -> Result<(), String> {
    if let Ok(mut v) = VERBOSITY.lock() {
        *v = verbosity;
    }
    if let Ok(mut q) = QUIET.lock() {
        *q = quiet;
    }

    fs::create_dir_all(dir).map_err(|e| format!("Failed to create log directory: {}", e))?;

    // One log per run
    let log_file = dir.join(LOG_FILE_NAME);
    fs::write(&log_file, "").map_err(|e| format!("Failed to reset log file: {}", e))?;

    let mut guard = LOG_FILE
        .lock()
        .map_err(|_| "Log file lock poisoned".to_string())?;
    *guard = Some(log_file);
    Ok(())
}

fn get_config_dir() -> Result<PathBuf, String> {
    #[cfg(not(target_os = "windows"))]
    let config_dir = dirs::home_dir()
        .ok_or("Could not determine home directory")?
        .join(".config")
        .join("gmextpack");

    #[cfg(target_os = "windows")]
    let config_dir = dirs::config_dir()
        .ok_or("Could not determine config directory")?
        .join("gmextpack");

    Ok(config_dir)
}

pub fn get_log_path() -> Option<PathBuf> {
    LOG_FILE.lock().ok().and_then(|guard| guard.clone())
}

fn append_to_log(level: Level, message: &str) -> io::Result<()> {
    let Some(path) = get_log_path() else {
        return Ok(());
    };
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    writeln!(file, "[{}] {} {}", timestamp, level.tag(), message)
}

fn record(level: Level, message: &str) {
    if append_to_log(level, message).is_err() {
        // Stop retrying a log file that cannot be written
        if let Ok(mut guard) = LOG_FILE.lock() {
            *guard = None;
        }
    }

    if !level.on_console() {
        return;
    }
    match level {
        Level::Trace => eprintln!("TRACE: {}", message),
        Level::Debug => eprintln!("{} {}", "DEBUG:".blue().bold(), message),
        Level::Info => eprintln!("{}", message),
        Level::Warn => eprintln!("{} {}", "warning:".yellow().bold(), message),
        Level::Error => eprintln!("{} {}", "Error:".red().bold(), message),
        Level::Success => eprintln!("{} {}", "\u{2714}".green().bold(), message),
    }
}

/// Informational message (console at -v, always to file)
pub fn info(message: &str) {
    record(Level::Info, message);
}

/// Debug message (console at -v, always to file)
pub fn debug(message: &str) {
    record(Level::Debug, message);
}

pub fn warn(message: &str) {
    record(Level::Warn, message);
}

pub fn error(message: &str) {
    record(Level::Error, message);
}

/// Success message, hidden with --quiet
pub fn success(message: &str) {
    record(Level::Success, message);
}

/// Progress step (console at -vv, always to file)
pub fn step(message: &str) {
    record(Level::Trace, message);
}

/// Start a spinner with the given message (only if neither verbose nor quiet)
pub fn spinner_start(message: &str) {
    if get_verbosity() > 0 || get_quiet() {
        return;
    }

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = indicatif::ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template("{spinner:.cyan} {msg}")
    {
        spinner.set_style(style);
    }
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message(message.to_string());

    if let Ok(mut guard) = SPINNER.lock() {
        *guard = Some(spinner);
    }
}

/// Clear the spinner, if one is running
pub fn spinner_stop() {
    if let Some(spinner) = SPINNER.lock().ok().and_then(|mut guard| guard.take()) {
        spinner.finish_and_clear();
    }
}
