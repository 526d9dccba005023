use crate::error::{AppError, Result};
use log;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_DIR: &str = ".fcollect";
pub const DEFAULT_CONFIG_FILENAME: &str = "fcollect.toml";
pub const DEFAULT_OUTPUT_FILENAME: &str = "collected_files.txt";
pub const DEFAULT_MAX_FILE_SIZE_MB: f64 = 5.0;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Static configuration source. Supplies the defaults used when no last-used
/// config has been persisted yet, plus output options.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default = "default_extensions")]
    pub default_extensions: Vec<String>,
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: f64,
    #[serde(default = "default_output_file_name")]
    pub output_file_name: String,
    #[serde(default = "default_true")]
    pub include_file_header: bool,
    /// Leave the current output file out of the collected set even when it
    /// matches a requested extension.
    #[serde(default)]
    pub exclude_output_file: bool,
}

fn default_true() -> bool {
    true
}
fn default_extensions() -> Vec<String> {
    vec!["js".to_string()]
}
fn default_max_file_size_mb() -> f64 {
    DEFAULT_MAX_FILE_SIZE_MB
}
fn default_output_file_name() -> String {
    DEFAULT_OUTPUT_FILENAME.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_extensions: default_extensions(),
            exclude_patterns: Vec::new(),
            max_file_size_mb: default_max_file_size_mb(),
            output_file_name: default_output_file_name(),
            include_file_header: default_true(),
            exclude_output_file: false,
        }
    }
}

impl Settings {
    /// The config used before anything was ever persisted.
    pub fn default_collection_config(&self) -> CollectionConfig {
        CollectionConfig {
            extensions: self.default_extensions.clone(),
            exclude_patterns: self.exclude_patterns.clone(),
            max_file_size_mb: self.max_file_size_mb,
            selected_folders: None,
        }
    }

    pub fn determine_workspace_roots(cli_roots: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let raw_roots = if cli_roots.is_empty() {
            vec![env::current_dir().map_err(AppError::Io)?]
        } else {
            cli_roots
                .iter()
                .map(|p| PathBuf::from(shellexpand::tilde(&p.to_string_lossy()).as_ref()))
                .collect()
        };

        let mut roots = Vec::with_capacity(raw_roots.len());
        for root in raw_roots {
            let canonical = root.canonicalize().map_err(|e| {
                AppError::Io(std::io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to canonicalize workspace root '{}': {}",
                        root.display(),
                        e
                    ),
                ))
            })?;
            if !canonical.is_dir() {
                return Err(AppError::Config(format!(
                    "Workspace root is not a directory: {}",
                    canonical.display()
                )));
            }
            if !roots.contains(&canonical) {
                roots.push(canonical);
            }
        }
        Ok(roots)
    }

    /// Finds the settings file. A requested name is tried as a path first,
    /// then as `<name>.toml` inside `.fcollect/`. Without a request, the
    /// default file is used only when it exists.
    pub fn resolve_config_path(
        workspace_root: &Path,
        requested: Option<&str>,
        disabled: bool,
    ) -> Result<Option<PathBuf>> {
        if disabled {
            log::debug!("Settings file loading disabled via CLI flag.");
            return Ok(None);
        }
        let settings_dir = workspace_root.join(DEFAULT_CONFIG_DIR);

        let Some(requested) = requested else {
            let default_path = settings_dir.join(DEFAULT_CONFIG_FILENAME);
            if default_path.is_file() {
                log::debug!("Using default settings file: {}", default_path.display());
                return Ok(Some(default_path));
            }
            log::debug!("No settings file at {}", default_path.display());
            return Ok(None);
        };

        let direct = PathBuf::from(shellexpand::tilde(requested).as_ref());
        let mut named = settings_dir.join(&direct);
        if named.extension().is_none() {
            named.set_extension("toml");
        }
        match [direct, named].into_iter().find(|p| p.is_file()) {
            Some(path) => {
                log::debug!("Using settings file: {}", path.display());
                Ok(Some(path))
            }
            None => Err(AppError::Config(format!(
                "Settings file '{}' not found (also looked in {})",
                requested,
                settings_dir.display()
            ))),
        }
    }

    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        log::info!("Loading settings from: {}", config_path.display());
        let toml_content = fs::read_to_string(config_path).map_err(|e| AppError::FileRead {
            path: config_path.to_path_buf(),
            source: e,
        })?;
        let settings = toml::from_str::<Settings>(&toml_content).map_err(|e| {
            AppError::TomlParse(format!(
                "Error parsing settings file '{}': {}. Check TOML syntax and structure.",
                config_path.display(),
                e
            ))
        })?;
        validate_max_size(settings.max_file_size_mb)?;
        Ok(settings)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Filter settings for one collection run. Serialized form is the persisted
/// last-used record.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CollectionConfig {
    #[serde(default)]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
    #[serde(rename = "maxFileSizeMB", default = "default_max_file_size_mb")]
    pub max_file_size_mb: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_folders: Option<Vec<PathBuf>>,
}

impl CollectionConfig {
    pub fn new(extensions: Vec<String>, folders: Vec<PathBuf>) -> Self {
        Self {
            extensions,
            exclude_patterns: Vec::new(),
            max_file_size_mb: DEFAULT_MAX_FILE_SIZE_MB,
            selected_folders: Some(folders),
        }
    }

    pub fn with_exclude_patterns(mut self, patterns: Vec<String>) -> Self {
        self.exclude_patterns = patterns;
        self
    }

    pub fn with_max_file_size_mb(mut self, mb: f64) -> Self {
        self.max_file_size_mb = mb;
        self
    }

    pub fn folders(&self) -> &[PathBuf] {
        self.selected_folders.as_deref().unwrap_or(&[])
    }

    pub fn validate(&self) -> Result<()> {
        validate_max_size(self.max_file_size_mb)
    }

    pub fn max_file_size_bytes(&self) -> u64 {
        (self.max_file_size_mb * BYTES_PER_MB).floor() as u64
    }
}

fn validate_max_size(mb: f64) -> Result<()> {
    if !mb.is_finite() || mb <= 0.0 {
        return Err(AppError::InvalidFilterValue(format!(
            "max file size must be a positive number of MB, got {}",
            mb
        )));
    }
    Ok(())
}

/// A partial edit of the filter settings. `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterUpdate {
    pub extensions: Option<Vec<String>>,
    pub exclude_patterns: Option<Vec<String>>,
    pub max_file_size_mb: Option<f64>,
}

impl FilterUpdate {
    pub fn is_empty(&self) -> bool {
        self.extensions.is_none()
            && self.exclude_patterns.is_none()
            && self.max_file_size_mb.is_none()
    }

    /// Validates before touching `config`, so a rejected edit leaves it unchanged.
    pub fn apply_to(&self, config: &mut CollectionConfig) -> Result<()> {
        if let Some(mb) = self.max_file_size_mb {
            validate_max_size(mb)?;
        }
        if let Some(extensions) = &self.extensions {
            config.extensions = extensions.clone();
        }
        if let Some(patterns) = &self.exclude_patterns {
            config.exclude_patterns = patterns.clone();
        }
        if let Some(mb) = self.max_file_size_mb {
            config.max_file_size_mb = mb;
        }
        Ok(())
    }
}

/// Splits comma separated user input. Blank entries are dropped.
pub fn parse_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

pub fn parse_extensions(input: &str) -> Vec<String> {
    parse_list(input)
        .into_iter()
        .map(|ext| ext.trim_start_matches('.').to_string())
        .filter(|ext| !ext.is_empty())
        .collect()
}

pub fn parse_max_size_mb(input: &str) -> Result<f64> {
    let value: f64 = input.trim().parse().map_err(|_| {
        AppError::InvalidFilterValue(format!("'{}' is not a number", input.trim()))
    })?;
    validate_max_size(value)?;
    Ok(value)
}
