use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Project configuration loaded from `.swaggen.yaml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SwaggenConfig {
    pub input: String,
    /// Extension used for module paths, including the leading dot.
    pub extension: String,
    pub layout: LayoutConfig,
    pub grouping: GroupingConfig,
}

impl Default for SwaggenConfig {
    fn default() -> Self {
        Self {
            input: "swagger.json".to_string(),
            extension: ".ts".to_string(),
            layout: LayoutConfig::default(),
            grouping: GroupingConfig::default(),
        }
    }
}

/// Where modules live relative to the output root.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub schemas_dir: String,
    pub operations_dir: String,
    pub file_naming: FileNaming,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            schemas_dir: "schemas".to_string(),
            operations_dir: "operations".to_string(),
            file_naming: FileNaming::Original,
        }
    }
}

/// Casing applied to a module name to form its file stem.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileNaming {
    #[default]
    Original,
    PascalCase,
    CamelCase,
    SnakeCase,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GroupingConfig {
    /// Module for operations that declare no tags.
    pub default_tag: String,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            default_tag: "default".to_string(),
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".swaggen.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<SwaggenConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let config = serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Yaml {
        path: path.display().to_string(),
        source,
    })?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# swaggen configuration
input: swagger.json
extension: .ts

layout:
  schemas_dir: schemas
  operations_dir: operations
  file_naming: original   # original | pascal_case | camel_case | snake_case

grouping:
  default_tag: default    # module for operations without tags
"#
}
