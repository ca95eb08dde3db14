// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Connection settings and the path rules shared by every location comparison

use crate::error::{MetastoreError, Result};
use crate::model::{DEFAULT_DATABASE, Database};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use url::{ParseError, Url};

/// Hive's default field delimiter (`^A`)
pub const DEFAULT_TEXT_DELIMITER: &str = "\u{1}";

/// Everything needed to reach the store and resolve table locations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaStoreSettings {
    /// Remote metastore endpoint(s); `None` selects an embedded store
    #[serde(default)]
    pub uris: Option<String>,

    /// Root under which managed tables are placed
    pub warehouse: String,

    /// Field delimiter for text tables when none is given
    #[serde(default = "default_text_delimiter")]
    pub text_delimiter: String,
}

fn default_text_delimiter() -> String {
    DEFAULT_TEXT_DELIMITER.to_string()
}

impl MetaStoreSettings {
    pub fn new<S: Into<String>>(warehouse: S) -> Self {
        Self {
            uris: None,
            warehouse: warehouse.into(),
            text_delimiter: default_text_delimiter(),
        }
    }

    #[must_use]
    pub fn with_uris<S: Into<String>>(mut self, uris: S) -> Self {
        self.uris = Some(uris.into());
        self
    }

    #[must_use]
    pub fn with_text_delimiter<S: Into<String>>(mut self, delimiter: S) -> Self {
        self.text_delimiter = delimiter.into();
        self
    }

    /// Parse settings from YAML text
    pub fn from_yaml_str(content: &str) -> anyhow::Result<Self> {
        let settings: MetaStoreSettings = serde_yaml_ng::from_str(content)
            .with_context(|| "Failed to parse metastore settings")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a YAML file
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(&path).with_context(|| {
            format!("Failed to read settings file: {}", path.as_ref().display())
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.warehouse.trim().is_empty() {
            anyhow::bail!("warehouse cannot be empty");
        }
        if self.text_delimiter.is_empty() {
            anyhow::bail!("text_delimiter cannot be empty");
        }
        if self.uris.as_deref().is_some_and(|uris| uris.trim().is_empty()) {
            anyhow::bail!("uris cannot be empty when present");
        }
        Ok(())
    }

    /// Fully qualify a location.
    ///
    /// Anything with a scheme is taken as a URL and must parse as one. Bare
    /// paths are made absolute against the current directory, lexically
    /// normalised and turned into `file:` URLs. A trailing slash is never
    /// significant.
    pub fn qualify(&self, location: &str) -> Result<Url> {
        let location = location.trim();
        if location.is_empty() {
            return Err(MetastoreError::invalid_location(location, "empty location"));
        }

        let mut url = match Url::parse(location) {
            // Single-letter schemes are Windows drive letters
            Ok(url) if url.scheme().len() > 1 => url,
            Ok(_) | Err(ParseError::RelativeUrlWithoutBase) => {
                let path = absolute(Path::new(location))?;
                Url::from_file_path(&path).map_err(|()| {
                    MetastoreError::invalid_location(location, "not an absolute path")
                })?
            }
            Err(e) => return Err(MetastoreError::invalid_location(location, e.to_string())),
        };

        let path = url.path();
        if path.len() > 1 && path.ends_with('/') {
            let trimmed = path.trim_end_matches('/').to_string();
            url.set_path(if trimmed.is_empty() { "/" } else { &trimmed });
        }
        Ok(url)
    }

    /// The qualified warehouse root
    pub fn warehouse_url(&self) -> Result<Url> {
        self.qualify(&self.warehouse)
    }

    /// Where the store puts a managed table that has no explicit location
    ///
    /// `<warehouse>/<table>` for the default database and
    /// `<warehouse>/<db>.db/<table>` for every other database.
    pub fn default_table_location(&self, database: &str, table: &str) -> Result<Url> {
        let database = database.to_ascii_lowercase();
        let table = table.to_ascii_lowercase();

        let mut segments = Vec::with_capacity(2);
        if database != DEFAULT_DATABASE {
            segments.push(format!("{database}.db"));
        }
        segments.push(table);
        self.join(&self.warehouse, &segments)
    }

    /// Where the store puts a managed table of `database`.
    ///
    /// Directly under the database's own location when it has one,
    /// otherwise [`Self::default_table_location`].
    pub fn managed_table_location(&self, database: &Database, table: &str) -> Result<Url> {
        match &database.location_uri {
            Some(location) => self.join(location, &[table.to_ascii_lowercase()]),
            None => self.default_table_location(&database.name, table),
        }
    }

    fn join(&self, base: &str, segments: &[String]) -> Result<Url> {
        let mut url = self.qualify(base)?;
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| MetastoreError::invalid_location(base, "cannot be a base"))?;
            _ = path.pop_if_empty();
            _ = path.extend(segments);
        }
        Ok(url)
    }
}

/// Make a path absolute and drop `.` and `..` components without touching the filesystem
fn absolute(path: &Path) -> Result<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let mut normalised = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                _ = normalised.pop();
            }
            other => normalised.push(other.as_os_str()),
        }
    }
    Ok(normalised)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_qualify_url_and_path_agree() {
        let settings = MetaStoreSettings::new("/warehouse");
        let from_path = settings.qualify("/data/events/").expect("path");
        let from_url = settings.qualify("file:///data/events").expect("url");
        assert_eq!(from_path, from_url);
        assert_eq!(from_path.as_str(), "file:///data/events");
    }

    #[test]
    fn test_qualify_normalises_dots() {
        let settings = MetaStoreSettings::new("/warehouse");
        let url = settings.qualify("/data/./raw/../events").expect("qualify");
        assert_eq!(url.as_str(), "file:///data/events");
    }

    #[test]
    fn test_qualify_relative_path_uses_current_dir() {
        let settings = MetaStoreSettings::new("/warehouse");
        let url = settings.qualify("events").expect("qualify");
        let expected = Url::from_file_path(std::env::current_dir().expect("cwd").join("events"))
            .expect("file url");
        assert_eq!(url, expected);
    }

    #[test]
    fn test_qualify_keeps_remote_schemes() {
        let settings = MetaStoreSettings::new("/warehouse");
        let url = settings
            .qualify("hdfs://namenode:8020/user/hive/warehouse/")
            .expect("qualify");
        assert_eq!(url.as_str(), "hdfs://namenode:8020/user/hive/warehouse");
    }

    #[test]
    fn test_qualify_rejects_malformed_urls() {
        let settings = MetaStoreSettings::new("/warehouse");
        for location in ["hdfs://bad host/x", "s3://[bucket/key", "hdfs://namenode:99999/x"] {
            assert!(
                matches!(
                    settings.qualify(location),
                    Err(MetastoreError::InvalidLocation { .. })
                ),
                "{location} should be rejected"
            );
        }
    }

    #[test]
    fn test_managed_table_location_follows_database() {
        let settings = MetaStoreSettings::new("/warehouse");
        let placed = Database::new("custom").with_location("/elsewhere/custom.db/");
        assert_eq!(
            settings
                .managed_table_location(&placed, "Events")
                .expect("location")
                .as_str(),
            "file:///elsewhere/custom.db/events"
        );

        let unplaced = Database::new("custom");
        assert_eq!(
            settings
                .managed_table_location(&unplaced, "events")
                .expect("location")
                .as_str(),
            "file:///warehouse/custom.db/events"
        );
    }

    #[test]
    fn test_qualify_rejects_empty() {
        let settings = MetaStoreSettings::new("/warehouse");
        assert!(matches!(
            settings.qualify("  "),
            Err(MetastoreError::InvalidLocation { .. })
        ));
    }

    #[test]
    fn test_default_table_location() {
        let settings = MetaStoreSettings::new("/warehouse/");
        assert_eq!(
            settings
                .default_table_location("default", "Events")
                .expect("location")
                .as_str(),
            "file:///warehouse/events"
        );
        assert_eq!(
            settings
                .default_table_location("Sales", "orders")
                .expect("location")
                .as_str(),
            "file:///warehouse/sales.db/orders"
        );
    }

    #[test]
    fn test_yaml_defaults() -> anyhow::Result<()> {
        let settings = MetaStoreSettings::from_yaml_str("warehouse: /tmp/warehouse\n")?;
        assert_eq!(settings.warehouse, "/tmp/warehouse");
        assert_eq!(settings.text_delimiter, DEFAULT_TEXT_DELIMITER);
        assert!(settings.uris.is_none());
        Ok(())
    }

    #[test]
    fn test_yaml_file() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("metastore.yaml");
        std::fs::write(
            &path,
            "uris: thrift://metastore:9083\nwarehouse: /srv/warehouse\ntext_delimiter: \"|\"\n",
        )?;

        let settings = MetaStoreSettings::from_yaml_file(&path)?;
        assert_eq!(settings.uris.as_deref(), Some("thrift://metastore:9083"));
        assert_eq!(settings.text_delimiter, "|");
        Ok(())
    }

    #[test]
    fn test_yaml_validation() {
        assert!(MetaStoreSettings::from_yaml_str("warehouse: ''\n").is_err());
        assert!(MetaStoreSettings::from_yaml_str("warehouse: /w\ntext_delimiter: ''\n").is_err());
        assert!(MetaStoreSettings::from_yaml_file("/nonexistent/metastore.yaml").is_err());
    }
}
