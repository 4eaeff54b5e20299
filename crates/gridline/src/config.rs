//! View configuration.
//!
//! A [`ViewConfig`] can be written in YAML or JSON. Every key is optional:
//!
//! ```yaml
//! title: Comments List
//! pagination:
//!   enabled: true
//!   page_size: 100
//! exact_filter_field: postId
//! columns:
//!   sortable_excludes: [body]
//!   hidden_fields: [email]
//!   fixed_fields: [id, postId]
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::columns::ColumnPolicy;
use crate::error::ConfigError;
use crate::pagination::{PageSize, DEFAULT_PAGE_SIZE};
use crate::record::ID_FIELD;

/// Title used when none is configured.
pub const DEFAULT_TITLE: &str = "List";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// When `false`, every record is on page 1.
    pub enabled: bool,
    pub page_size: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        PaginationConfig {
            enabled: true,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Settings for a [`DataView`](crate::DataView).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Table title, also the stem of export file names.
    pub title: String,
    pub pagination: PaginationConfig,
    pub columns: ColumnPolicy,
    /// Field compared by the exact numeric filter.
    pub exact_filter_field: String,
}

impl Default for ViewConfig {
    fn default() -> Self {
        ViewConfig {
            title: DEFAULT_TITLE.to_string(),
            pagination: PaginationConfig::default(),
            columns: ColumnPolicy::default(),
            exact_filter_field: ID_FIELD.to_string(),
        }
    }
}

impl ViewConfig {
    /// Loads a config file, choosing the format by extension.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => ViewConfig::from_yaml_str(&content),
            Some("json") => ViewConfig::from_json_str(&content),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ViewConfig = serde_yaml::from_str(content)?;
        config.validated()
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: ViewConfig = serde_json::from_str(content)?;
        config.validated()
    }

    /// Checks values serde cannot.
    pub fn validated(self) -> Result<Self, ConfigError> {
        if self.pagination.enabled && self.pagination.page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        Ok(self)
    }

    /// The configured page size.
    pub fn page_size(&self) -> Result<PageSize, ConfigError> {
        if !self.pagination.enabled {
            return Ok(PageSize::Unbounded);
        }
        PageSize::limited(self.pagination.page_size).ok_or(ConfigError::ZeroPageSize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = ViewConfig::default();
        assert_eq!(config.title, "List");
        assert_eq!(config.exact_filter_field, "id");
        assert_eq!(config.page_size().unwrap(), PageSize::limited(100).unwrap());
    }

    #[test]
    fn yaml_overrides() {
        let config = ViewConfig::from_yaml_str(
            "title: Comments List\npagination:\n  page_size: 25\nexact_filter_field: postId\ncolumns:\n  hidden_fields: [email]\n",
        )
        .unwrap();
        assert_eq!(config.title, "Comments List");
        assert_eq!(config.page_size().unwrap(), PageSize::limited(25).unwrap());
        assert!(config.pagination.enabled);
        assert_eq!(config.exact_filter_field, "postId");
        assert!(config.columns.hidden_fields.contains("email"));
    }

    #[test]
    fn json_config() {
        let config =
            ViewConfig::from_json_str(r#"{"pagination": {"enabled": false}}"#).unwrap();
        assert_eq!(config.page_size().unwrap(), PageSize::Unbounded);
        assert_eq!(config.title, "List");
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let err = ViewConfig::from_yaml_str("pagination:\n  page_size: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ZeroPageSize));

        // Irrelevant when pagination is off.
        assert!(
            ViewConfig::from_yaml_str("pagination:\n  enabled: false\n  page_size: 0\n").is_ok()
        );
    }

    #[test]
    fn malformed_yaml() {
        assert!(matches!(
            ViewConfig::from_yaml_str("pagination: [1, 2"),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn from_path_by_extension() {
        let mut yaml = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        writeln!(yaml, "title: From File").unwrap();
        assert_eq!(ViewConfig::from_path(yaml.path()).unwrap().title, "From File");

        let mut json = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        writeln!(json, r#"{{"title": "Json"}}"#).unwrap();
        assert_eq!(ViewConfig::from_path(json.path()).unwrap().title, "Json");

        let toml = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        assert!(matches!(
            ViewConfig::from_path(toml.path()),
            Err(ConfigError::UnsupportedFormat(ext)) if ext == "toml"
        ));
    }

    #[test]
    fn missing_file() {
        let err = ViewConfig::from_path(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
