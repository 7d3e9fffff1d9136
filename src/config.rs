use crate::error::SwapError;
use dirs::home_dir;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const CONFIG_NAME: &str = "depswap.toml";

pub const DEFAULT_FROM: &str = "bcrypt";
pub const DEFAULT_TO: &str = "bcryptjs";
pub const DEFAULT_EXTENSION: &str = ".js";
pub const DEFAULT_ROOTS: [&str; 2] = ["api", "scripts"];

/// Contents of a `depswap.toml` file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub migration: MigrationConfig,

    #[serde(default)]
    pub paths: PathConfig,

    /// Directory that relative roots in this file are anchored to. Unset for
    /// the defaults and for a user-wide config in `~/.config`.
    #[serde(skip)]
    pub base_directory: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
pub struct MigrationConfig {
    pub from: Option<String>,
    pub to: Option<String>,
    pub extension: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct PathConfig {
    pub roots: Option<Vec<PathBuf>>,
}

/// The dependency being replaced, its replacement, and which files are eligible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    pub from: String,
    pub to: String,
    pub extension: String,
}

impl Default for Migration {
    fn default() -> Self {
        Migration {
            from: DEFAULT_FROM.to_string(),
            to: DEFAULT_TO.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl Migration {
    pub fn new(from: impl Into<String>, to: impl Into<String>, extension: impl Into<String>) -> Self {
        Migration {
            from: from.into(),
            to: to.into(),
            extension: extension.into(),
        }
    }

    pub fn validate(&self) -> Result<(), SwapError> {
        if self.from.is_empty() {
            return Err(SwapError::InvalidConfig(
                "the dependency to replace must not be empty".to_string(),
            ));
        }
        if self.to.is_empty() {
            return Err(SwapError::InvalidConfig(
                "the replacement dependency must not be empty".to_string(),
            ));
        }
        if self.extension.is_empty() {
            return Err(SwapError::InvalidConfig(
                "the file extension must not be empty".to_string(),
            ));
        }
        if self.from == self.to {
            return Err(SwapError::InvalidConfig(format!(
                "'{}' would be replaced with itself",
                self.from
            )));
        }
        Ok(())
    }
}

/// Everything a single run needs, fully resolved. Built once at startup and
/// handed to [`crate::migrate::run`].
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Directories to scan, in order
    pub roots: Vec<PathBuf>,
    pub migration: Migration,
    /// Report what would change without writing anything
    pub dry_run: bool,
    /// Suppress informational output. Failures are still printed.
    pub quiet: bool,
}

impl RunConfig {
    /// Resolve `roots` against `directory` and validate the migration.
    /// Absolute roots are kept as they are.
    pub fn new(
        directory: &Path,
        roots: &[PathBuf],
        migration: Migration,
        dry_run: bool,
        quiet: bool,
    ) -> Result<Self, SwapError> {
        migration.validate()?;
        if roots.is_empty() {
            return Err(SwapError::InvalidConfig(
                "at least one root directory is required".to_string(),
            ));
        }
        Ok(RunConfig {
            roots: roots.iter().map(|root| directory.join(root)).collect(),
            migration,
            dry_run,
            quiet,
        })
    }
}

impl Config {
    /// Load config from a toml file
    pub fn from_file(path: &Path) -> Result<Self, SwapError> {
        let config_str = fs::read_to_string(path)?;
        match toml::from_str::<Config>(&config_str) {
            Ok(mut config) => {
                config.base_directory = path.parent().map(Path::to_path_buf);
                Ok(config)
            }
            Err(e) => {
                eprintln!("Toml parse error in {}: {e}", path.display());
                Err(SwapError::TomlError(e))
            }
        }
    }

    /// Try to load the config from the current directory, then from `~/.config`.
    /// Falls back to the built-in defaults.
    pub fn load() -> Self {
        Config::load_from(Path::new(CONFIG_NAME), home_dir().as_deref())
    }

    /// The first config file that exists wins. If it can't be read or parsed the
    /// problem is reported and the defaults are used; later locations are not tried.
    pub fn load_from(local: &Path, home: Option<&Path>) -> Self {
        if let Some(local_config) = Config::discover(local) {
            return local_config;
        }
        if let Some(home) = home {
            let home_config = home.join(".config").join(CONFIG_NAME);
            if let Some(mut home_config) = Config::discover(&home_config) {
                // roots in a user-wide config are relative to wherever depswap runs
                home_config.base_directory = None;
                return home_config;
            }
        }
        Config::default()
    }

    /// `None` only when there is no file at `path`
    fn discover(path: &Path) -> Option<Self> {
        match Config::from_file(path) {
            Ok(config) => Some(config),
            Err(SwapError::IoError(e)) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                // parse errors were already printed by from_file
                if let SwapError::IoError(e) = &e {
                    eprintln!("Unable to read {}: {e}", path.display());
                }
                eprintln!("Ignoring {} and using the defaults", path.display());
                Some(Config::default())
            }
        }
    }

    /// The configured migration, with defaults for anything left out
    pub fn get_migration(&self) -> Migration {
        let defaults = Migration::default();
        Migration {
            from: self.migration.from.clone().unwrap_or(defaults.from),
            to: self.migration.to.clone().unwrap_or(defaults.to),
            extension: self.migration.extension.clone().unwrap_or(defaults.extension),
        }
    }

    pub fn get_roots(&self) -> Vec<PathBuf> {
        match &self.paths.roots {
            Some(roots) => roots.clone(),
            None => DEFAULT_ROOTS.iter().map(PathBuf::from).collect(),
        }
    }

    /// The directory relative roots are resolved against when none is given
    /// on the command line: the project config's own directory, or the current one.
    pub fn get_base_directory(&self) -> Result<PathBuf, SwapError> {
        match self.base_directory.as_deref() {
            Some(parent) if !parent.as_os_str().is_empty() => Ok(parent.to_path_buf()),
            _ => Ok(std::env::current_dir()?),
        }
    }
}
