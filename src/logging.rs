//! Logging System
//!
//! Structured logging through `tracing`. The library only emits events; a
//! host that wants to see them calls [`init_logging`] once to install a
//! subscriber with the configured level, format and destination.

use crate::error::{DiskError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

const ENV_FILTER: &str = "VDISK_LOG";
const ENV_MODULES: &str = "VDISK_LOG_MODULES";
const ENV_FILE: &str = "VDISK_LOG_FILE";

/// Log file path with precedence: `VDISK_LOG_FILE`, configured path, platform state dir.
pub fn resolve_log_file_path(config_file: Option<&Path>) -> Result<PathBuf> {
    if let Ok(env_path) = std::env::var(ENV_FILE) {
        if !env_path.is_empty() {
            return Ok(PathBuf::from(env_path));
        }
    }
    if let Some(p) = config_file {
        if !p.as_os_str().is_empty() {
            return Ok(p.to_path_buf());
        }
    }
    default_log_file_path()
}

fn default_log_file_path() -> Result<PathBuf> {
    let project_dirs = directories::ProjectDirs::from("", "vdisk", "vdisk").ok_or_else(|| {
        DiskError::Config("Could not determine platform directories for log file".to_string())
    })?;
    let dir = project_dirs
        .state_dir()
        .unwrap_or_else(|| project_dirs.data_local_dir());
    Ok(dir.join("vdisk.log"))
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stdout, stderr, file, file+stderr
    #[serde(default = "default_output")]
    pub output: String,

    /// Log file path when output includes file; None means the platform default
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Colored text output on terminals
    #[serde(default = "default_true")]
    pub color: bool,

    /// Per-module levels, e.g. `vdisk::driver = "trace"`
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "stderr".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
            file: None,
            color: default_true(),
            modules: HashMap::new(),
        }
    }
}

/// Install the global subscriber.
///
/// `VDISK_LOG` replaces the configured filter entirely; `VDISK_LOG_MODULES`
/// (`module=level,...`) adds directives on top of the configured ones.
/// Fails if a subscriber is already installed.
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<()> {
    let defaults = LoggingConfig::default();
    let config = config.unwrap_or(&defaults);

    let filter = build_env_filter(config)?;
    let output = parse_output_destinations(&config.output)?;
    let writer = make_writer(config, &output)?;
    let use_color = config.color && !output.file;

    let base_subscriber = Registry::default().with(filter);
    let installed = match config.format.as_str() {
        "json" => base_subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(writer),
            )
            .try_init(),
        "text" => base_subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(use_color)
                    .with_writer(writer),
            )
            .try_init(),
        other => {
            return Err(DiskError::Config(format!(
                "Invalid log format: {} (must be 'json' or 'text')",
                other
            )))
        }
    };
    installed.map_err(|e| DiskError::Config(format!("Failed to install subscriber: {}", e)))
}

fn make_writer(config: &LoggingConfig, output: &OutputDestinations) -> Result<BoxMakeWriter> {
    if !output.file {
        return Ok(if output.stdout {
            BoxMakeWriter::new(std::io::stdout)
        } else {
            BoxMakeWriter::new(std::io::stderr)
        });
    }

    let log_file = resolve_log_file_path(config.file.as_deref())?;
    if let Some(parent) = log_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
        .map_err(|e| {
            DiskError::Config(format!("Failed to open log file {:?}: {}", log_file, e))
        })?;
    Ok(if output.stderr {
        BoxMakeWriter::new(std::sync::Mutex::new(file).and(std::io::stderr))
    } else {
        BoxMakeWriter::new(std::sync::Mutex::new(file))
    })
}

/// Filter from `VDISK_LOG`, or the configured level plus module directives
fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_env(ENV_FILTER) {
        return Ok(filter);
    }
    if config.level == "off" {
        return Ok(EnvFilter::new("off"));
    }

    let mut filter = EnvFilter::new(&config.level);
    for (module, module_level) in &config.modules {
        filter = filter.add_directive(parse_directive(module, module_level)?);
    }
    if let Ok(modules_str) = std::env::var(ENV_MODULES) {
        for module_spec in modules_str.split(',') {
            if let Some((module, level)) = module_spec.split_once('=') {
                filter = filter.add_directive(parse_directive(module.trim(), level.trim())?);
            }
        }
    }
    Ok(filter)
}

fn parse_directive(module: &str, level: &str) -> Result<tracing_subscriber::filter::Directive> {
    format!("{}={}", module, level)
        .parse()
        .map_err(|e| DiskError::Config(format!("Invalid log directive {}={}: {}", module, level, e)))
}

#[derive(Debug, PartialEq, Eq)]
struct OutputDestinations {
    stdout: bool,
    stderr: bool,
    file: bool,
}

fn parse_output_destinations(output: &str) -> Result<OutputDestinations> {
    let (stdout, stderr, file) = match output {
        "stdout" => (true, false, false),
        "stderr" => (false, true, false),
        "file" => (false, false, true),
        "file+stderr" => (false, true, true),
        _ => {
            return Err(DiskError::Config(format!(
                "Invalid log output: {} (must be 'stdout', 'stderr', 'file' or 'file+stderr')",
                output
            )))
        }
    };
    Ok(OutputDestinations {
        stdout,
        stderr,
        file,
    })
}
