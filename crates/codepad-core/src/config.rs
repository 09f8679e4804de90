//! Configuration management for CodePad.
//!
//! Loads configuration from ${CODEPAD_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::platform::PlatformKind;

/// Returns the default config template with comments.
///
/// This is embedded from default_config.toml at compile time.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

/// Recursively merges items from source table into target table.
fn merge_items(target: &mut toml_edit::Table, source: &toml_edit::Table) {
    use toml_edit::Item;

    for (key, value) in source.iter() {
        match value {
            Item::Value(v) => {
                target[key] = Item::Value(v.clone());
            }
            Item::Table(src_table) => {
                if let Some(Item::Table(target_table)) = target.get_mut(key) {
                    merge_items(target_table, src_table);
                } else {
                    target[key] = Item::Table(src_table.clone());
                }
            }
            Item::ArrayOfTables(src_arr) => {
                target[key] = Item::ArrayOfTables(src_arr.clone());
            }
            Item::None => {}
        }
    }
}

pub mod paths {
    //! Path resolution for CodePad configuration and data directories.
    //!
    //! CODEPAD_HOME resolution order:
    //! 1. CODEPAD_HOME environment variable (if set)
    //! 2. ~/.config/codepad (default)
    //! 3. ./.codepad when no home directory can be determined

    use std::path::PathBuf;

    pub fn codepad_home() -> PathBuf {
        if let Ok(home) = std::env::var("CODEPAD_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".codepad"),
            |h| h.join(".config").join("codepad"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        codepad_home().join("config.toml")
    }
}

/// Editing behavior of a document session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Extension the save prompt adds when the chosen name has none
    pub default_extension: String,
    /// Maximum undo depth (0 = unlimited)
    pub undo_limit: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_extension: "txt".to_string(),
            undo_limit: 1000,
        }
    }
}

impl EditorConfig {
    /// Applies the default extension to a name picked at the save prompt.
    ///
    /// Names that already have an extension, or dotfiles like `.bashrc`, are
    /// kept as given.
    pub fn with_default_extension(&self, path: &Path) -> PathBuf {
        let ext = self.default_extension.trim().trim_start_matches('.');
        let keep = match path.file_name() {
            Some(name) => name.to_string_lossy().starts_with('.') || path.extension().is_some(),
            None => true,
        };
        if ext.is_empty() || keep {
            return path.to_path_buf();
        }
        path.with_extension(ext)
    }
}

/// Print subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintConfig {
    /// Spooler program (unix)
    pub command: String,
    /// Arguments placed before the print file
    pub args: Vec<String>,
    /// Temporary file the buffer is written to before spooling (unix)
    pub temp_file: String,
    /// Shell used for the "print" verb (windows)
    pub shell: String,
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self {
            command: "lpr".to_string(),
            args: Vec::new(),
            temp_file: "/tmp/tempfile_to_print.txt".to_string(),
            shell: "powershell".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrashConfig {
    /// Recycle directory override (windows)
    pub dir: Option<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive used when RUST_LOG is unset
    pub level: String,
    /// Log file; stderr when unset
    pub file: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Platform actions variant
    pub platform: PlatformKind,

    #[serde(default)]
    pub editor: EditorConfig,

    #[serde(default)]
    pub print: PrintConfig,

    #[serde(default)]
    pub trash: TrashConfig,

    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    /// Loads configuration from the default config path.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    ///
    /// # Errors
    /// Returns an error if the file exists or cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Generates a fresh config TOML from Rust defaults.
    ///
    /// Uses the embedded template for structure/comments and merges
    /// generated values from `Config::default()` into it.
    ///
    /// # Errors
    /// Returns an error if serialization or template parsing fails.
    pub fn generate() -> Result<String> {
        use toml_edit::DocumentMut;

        let generated_toml = toml::to_string(&Config::default())
            .context("Failed to serialize default config to TOML")?;

        let mut doc: DocumentMut = default_config_template()
            .parse()
            .context("Failed to parse default config template")?;
        let generated_doc: DocumentMut = generated_toml
            .parse()
            .context("Failed to parse generated config")?;

        merge_items(doc.as_table_mut(), generated_doc.as_table());

        Ok(doc.to_string())
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}
