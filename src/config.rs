//! Disk configuration.
//!
//! Layered through the `config` crate: struct defaults, then an optional
//! config file (format picked from its extension), then `VDISK__*`
//! environment variables with `__` between nested keys, e.g.
//! `VDISK__WORKING_DIRECTORY` or `VDISK__LOGGING__LEVEL`. `VDISK__DRIVES`
//! takes a comma separated list.

use crate::error::{DiskError, Result};
use crate::ident::path::DEFAULT_ROOT;
use crate::ident::DirectoryIdentifier;
use crate::logging::LoggingConfig;
use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

const ENV_PREFIX: &str = "VDISK";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiskConfig {
    /// Base for relative paths
    pub working_directory: String,

    /// Roots materialized when the disk is built
    pub drives: Vec<String>,

    pub logging: LoggingConfig,
}

impl Default for DiskConfig {
    fn default() -> Self {
        Self {
            working_directory: DEFAULT_ROOT.to_string(),
            drives: vec![DEFAULT_ROOT.to_string()],
            logging: LoggingConfig::default(),
        }
    }
}

impl DiskConfig {
    /// Load defaults, then `file` if given, then the environment.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = file {
            if !path.exists() {
                return Err(DiskError::Config(format!(
                    "config file {} does not exist",
                    path.display()
                )));
            }
            builder = builder.add_source(File::from(path).required(true));
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("drives")
                .try_parsing(true),
        );

        let config: DiskConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Working directory and drives must parse; drives must be roots.
    pub fn validate(&self) -> Result<()> {
        self.working_directory()?;
        self.drive_roots()?;
        Ok(())
    }

    /// Relative values resolve against `C:\`
    pub fn working_directory(&self) -> Result<DirectoryIdentifier> {
        DirectoryIdentifier::new(&self.working_directory)
    }

    pub fn drive_roots(&self) -> Result<Vec<DirectoryIdentifier>> {
        self.drives
            .iter()
            .map(|drive| {
                let id = DirectoryIdentifier::new(drive)?;
                if !id.is_root() {
                    return Err(DiskError::Config(format!(
                        "drive '{}' is not a drive or share root",
                        drive
                    )));
                }
                Ok(id)
            })
            .collect()
    }
}
