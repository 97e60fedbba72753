//! Application configuration for readmepack.
//!
//! User config lives at `~/.readmepack/readmepack.toml` (or any file passed
//! with `--config`). CLI flags and CI input variables override config file
//! values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ReadmePackError, Result};
use crate::types::{
    DEFAULT_TOC_END_TAG, DEFAULT_TOC_START_TAG, LineEnding, PackVariant, TocMarkers,
};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "readmepack.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".readmepack";

// ---------------------------------------------------------------------------
// Config structs (matching readmepack.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Source, destination and archive naming.
    #[serde(default)]
    pub pack: PackSection,

    /// Markdown rewriting settings.
    #[serde(default)]
    pub markdown: MarkdownSection,
}

/// `[pack]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackSection {
    /// Parent directory of the working tree and the archive.
    #[serde(default = "default_destination_directory")]
    pub destination_directory: String,

    /// Documentation tree to package.
    #[serde(default = "default_root_directory")]
    pub root_directory: String,

    /// File name of the produced archive.
    #[serde(default = "default_zip_filename")]
    pub zip_filename: String,

    /// Name fragment identifying index files.
    #[serde(default = "default_index_name")]
    pub index_name: String,

    /// Working directory name for the versioned variant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_code: Option<String>,

    /// Pipeline flavour.
    #[serde(default)]
    pub variant: PackVariant,
}

impl Default for PackSection {
    fn default() -> Self {
        Self {
            destination_directory: default_destination_directory(),
            root_directory: default_root_directory(),
            zip_filename: default_zip_filename(),
            index_name: default_index_name(),
            version_code: None,
            variant: PackVariant::default(),
        }
    }
}

fn default_destination_directory() -> String {
    ".".into()
}
fn default_root_directory() -> String {
    "docs".into()
}
fn default_zip_filename() -> String {
    "readme.zip".into()
}
fn default_index_name() -> String {
    "index".into()
}

/// `[markdown]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkdownSection {
    /// Line that opens a generated table of contents.
    #[serde(default = "default_toc_start_tag")]
    pub toc_start_tag: String,

    /// Line that closes a generated table of contents.
    #[serde(default = "default_toc_end_tag")]
    pub toc_end_tag: String,

    /// Line terminator for splitting and writing documents.
    #[serde(default)]
    pub line_ending: LineEnding,
}

impl Default for MarkdownSection {
    fn default() -> Self {
        Self {
            toc_start_tag: default_toc_start_tag(),
            toc_end_tag: default_toc_end_tag(),
            line_ending: LineEnding::default(),
        }
    }
}

impl MarkdownSection {
    /// Configured TOC delimiters.
    pub fn toc_markers(&self) -> TocMarkers {
        TocMarkers {
            start: self.toc_start_tag.clone(),
            end: self.toc_end_tag.clone(),
        }
    }
}

fn default_toc_start_tag() -> String {
    DEFAULT_TOC_START_TAG.into()
}
fn default_toc_end_tag() -> String {
    DEFAULT_TOC_END_TAG.into()
}

// ---------------------------------------------------------------------------
// Pack options (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Values supplied on the command line or through CI inputs.
/// `None` falls back to the config file.
#[derive(Debug, Clone, Default)]
pub struct PackOverrides {
    pub destination_directory: Option<String>,
    pub root_directory: Option<String>,
    pub zip_filename: Option<String>,
    pub index_name: Option<String>,
    pub version_code: Option<String>,
    pub variant: Option<PackVariant>,
}

/// Runtime pipeline configuration, resolved once at startup and passed
/// explicitly into every component.
#[derive(Debug, Clone)]
pub struct PackOptions {
    pub destination_dir: PathBuf,
    pub root_dir: PathBuf,
    pub zip_filename: String,
    pub index_name: String,
    pub version_code: Option<String>,
    pub variant: PackVariant,
    pub toc_markers: TocMarkers,
    pub line_ending: LineEnding,
}

impl PackOptions {
    /// Merge overrides on top of the config file and validate the result.
    pub fn resolve(config: &AppConfig, overrides: &PackOverrides) -> Result<Self> {
        let pack = &config.pack;

        let options = Self {
            destination_dir: PathBuf::from(
                non_blank(&overrides.destination_directory)
                    .unwrap_or(&pack.destination_directory),
            ),
            root_dir: PathBuf::from(
                non_blank(&overrides.root_directory).unwrap_or(&pack.root_directory),
            ),
            zip_filename: non_blank(&overrides.zip_filename)
                .unwrap_or(&pack.zip_filename)
                .to_string(),
            index_name: non_blank(&overrides.index_name)
                .unwrap_or(&pack.index_name)
                .to_string(),
            version_code: non_blank(&overrides.version_code)
                .or_else(|| non_blank(&pack.version_code))
                .map(String::from),
            variant: overrides.variant.unwrap_or(pack.variant),
            toc_markers: config.markdown.toc_markers(),
            line_ending: config.markdown.line_ending,
        };

        options.validate()?;
        Ok(options)
    }

    /// Name of the intermediate working directory.
    ///
    /// The mirror variant derives it from the archive name, the versioned
    /// variant uses the version code.
    pub fn working_dir_name(&self) -> &str {
        match self.variant {
            PackVariant::Mirror => self
                .zip_filename
                .strip_suffix(".zip")
                .unwrap_or(&self.zip_filename),
            PackVariant::Versioned => self.version_code.as_deref().unwrap_or_default(),
        }
    }

    /// Full path of the intermediate working directory.
    pub fn working_dir(&self) -> PathBuf {
        self.destination_dir.join(self.working_dir_name())
    }

    /// Full path of the produced archive.
    pub fn archive_path(&self) -> PathBuf {
        self.destination_dir.join(&self.zip_filename)
    }

    fn validate(&self) -> Result<()> {
        if self.zip_filename.is_empty() {
            return Err(ReadmePackError::config("zip filename must not be empty"));
        }
        if self.zip_filename.contains(['/', '\\']) {
            return Err(ReadmePackError::config(format!(
                "zip filename '{}' must be a plain file name",
                self.zip_filename
            )));
        }
        if self.index_name.is_empty() {
            return Err(ReadmePackError::config("index name must not be empty"));
        }
        if self.variant == PackVariant::Versioned && self.version_code.is_none() {
            return Err(ReadmePackError::config(
                "the versioned variant requires a version code",
            ));
        }

        let work = self.working_dir_name();
        if work.is_empty() || work == "." || work == ".." || work.contains(['/', '\\']) {
            return Err(ReadmePackError::config(format!(
                "'{work}' is not a usable working directory name"
            )));
        }
        if work == self.zip_filename {
            return Err(ReadmePackError::config(format!(
                "working directory '{work}' would collide with the archive; \
                 give the zip filename a .zip extension"
            )));
        }
        if self.toc_markers.start.is_empty() || self.toc_markers.end.is_empty() {
            return Err(ReadmePackError::config(
                "generated TOC start and end tags must not be empty",
            ));
        }

        Ok(())
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.readmepack/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| ReadmePackError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.readmepack/readmepack.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| ReadmePackError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        ReadmePackError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| ReadmePackError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| ReadmePackError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| ReadmePackError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("zip_filename"));
        assert!(toml_str.contains("<!-- toc -->"));
        assert!(!toml_str.contains("version_code"));
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[pack]
root_directory = "site/content"
variant = "versioned"
version_code = "v2.1"

[markdown]
line_ending = "crlf"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.pack.root_directory, "site/content");
        assert_eq!(config.pack.index_name, "index");
        assert_eq!(config.pack.variant, PackVariant::Versioned);
        assert_eq!(config.markdown.line_ending, LineEnding::CrLf);
        assert_eq!(config.markdown.toc_end_tag, DEFAULT_TOC_END_TAG);
    }

    #[test]
    fn configured_toc_tags_reach_pack_options() {
        let toml_str = r#"
[markdown]
toc_start_tag = "<!-- begin toc -->"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        let options = PackOptions::resolve(&config, &PackOverrides::default()).unwrap();

        assert_eq!(options.toc_markers, config.markdown.toc_markers());
        assert_eq!(options.toc_markers.start, "<!-- begin toc -->");
        assert_eq!(options.toc_markers.end, DEFAULT_TOC_END_TAG);
    }

    #[test]
    fn load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[pack]\nzip_filename = \"docs.zip\"\n").unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.pack.zip_filename, "docs.zip");
    }

    #[test]
    fn load_config_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[pack\nzip_filename = 1").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse"));
    }

    #[test]
    fn overrides_win_over_config() {
        let config = AppConfig::default();
        let overrides = PackOverrides {
            destination_directory: Some("out".into()),
            zip_filename: Some("site.zip".into()),
            index_name: Some("  ".into()),
            ..Default::default()
        };

        let options = PackOptions::resolve(&config, &overrides).unwrap();
        assert_eq!(options.destination_dir, PathBuf::from("out"));
        assert_eq!(options.root_dir, PathBuf::from("docs"));
        assert_eq!(options.index_name, "index");
        assert_eq!(options.working_dir(), PathBuf::from("out").join("site"));
        assert_eq!(options.archive_path(), PathBuf::from("out").join("site.zip"));
    }

    #[test]
    fn versioned_uses_version_code_for_working_dir() {
        let config = AppConfig::default();
        let overrides = PackOverrides {
            variant: Some(PackVariant::Versioned),
            version_code: Some("v3.0".into()),
            ..Default::default()
        };

        let options = PackOptions::resolve(&config, &overrides).unwrap();
        assert_eq!(options.working_dir_name(), "v3.0");
        assert_eq!(options.archive_path(), PathBuf::from(".").join("readme.zip"));
    }

    #[test]
    fn versioned_without_version_code_is_rejected() {
        let overrides = PackOverrides {
            variant: Some(PackVariant::Versioned),
            ..Default::default()
        };
        let err = PackOptions::resolve(&AppConfig::default(), &overrides).unwrap_err();
        assert!(err.to_string().contains("requires a version code"));
    }

    #[test]
    fn archive_name_without_extension_is_rejected() {
        let overrides = PackOverrides {
            zip_filename: Some("bundle".into()),
            ..Default::default()
        };
        let err = PackOptions::resolve(&AppConfig::default(), &overrides).unwrap_err();
        assert!(err.to_string().contains("collide"));
    }
}
