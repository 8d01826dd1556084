//! Facet configuration
//!
//! Read-only settings for one faceted listing: the table, the facet columns
//! and their labels, date display formats, column aliasing, required columns
//! and keyword behavior. Loaded from YAML using the same human-readable keys
//! as existing installations:
//!
//! ```yaml
//! database table: documents
//! facet labels:
//!   category: Category
//!   published: Date published
//! keyword columns: [title, body]
//! date formats:
//!   published: F j, Y
//! columns for additional values:
//!   category_secondary: category
//! required columns: [status]
//! use AND for keyword logic by default: true
//! automatically put wildcards on keywords entered: false
//! ```
//!
//! Unknown keys (database credentials and the like) are ignored.

use std::fmt;
use std::path::Path;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::granularity::{resolve_granularities, DateGranularities};
use crate::params::EXTRA_PARAMETERS;
use crate::{Error, Result};

const DEFAULT_PAGER_LIMIT: usize = 20;

/// Column-keyed string mapping that keeps the order entries were written in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    entries: Vec<(String, String)>,
}

impl ColumnMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry. Replacing keeps the original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ColumnMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ColumnMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<'de> Deserialize<'de> for ColumnMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct ColumnMapVisitor;

        impl<'de> Visitor<'de> for ColumnMapVisitor {
            type Value = ColumnMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a mapping of column names to strings")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut map = ColumnMap::new();
                while let Some((key, value)) = access.next_entry::<String, String>()? {
                    map.insert(key, value);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(ColumnMapVisitor)
    }
}

/// Treat an explicit YAML `null` (a key with nothing after it) as the default.
fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn default_pager_limit() -> usize {
    DEFAULT_PAGER_LIMIT
}

/// Validated facet configuration.
///
/// Construct through [`FacetConfig::from_yaml_str`] or [`FacetConfig::from_path`];
/// both validate and resolve date granularities once, so a loaded config is
/// always consistent and can be shared across requests.
#[derive(Debug, Clone, Deserialize)]
pub struct FacetConfig {
    #[serde(rename = "database table")]
    table: String,

    #[serde(rename = "facet labels")]
    facet_labels: ColumnMap,

    #[serde(rename = "keyword columns", default, deserialize_with = "nullable")]
    keyword_columns: Vec<String>,

    /// Extra MATCH columns used when the request sets the `full_text` flag.
    #[serde(rename = "full text columns", default, deserialize_with = "nullable")]
    full_text_columns: Vec<String>,

    #[serde(rename = "output columns", default, deserialize_with = "nullable")]
    output_columns: ColumnMap,

    #[serde(rename = "date formats", default, deserialize_with = "nullable")]
    date_formats: ColumnMap,

    /// Auxiliary column → main facet column.
    #[serde(
        rename = "columns for additional values",
        default,
        deserialize_with = "nullable"
    )]
    additional_columns: ColumnMap,

    #[serde(rename = "required columns", default, deserialize_with = "nullable")]
    required_columns: Vec<String>,

    #[serde(rename = "use AND for keyword logic by default", default)]
    keyword_default_and: bool,

    #[serde(rename = "automatically put wildcards on keywords entered", default)]
    keyword_auto_wildcard: bool,

    #[serde(rename = "pager limit", default = "default_pager_limit")]
    pager_limit: usize,

    #[serde(rename = "location of assets", default, deserialize_with = "nullable")]
    assets_location: String,

    #[serde(skip)]
    granularities: DateGranularities,
}

impl FacetConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let mut config: FacetConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        config.granularities = resolve_granularities(&config.date_formats)?;
        tracing::debug!(
            table = %config.table,
            facets = config.facet_labels.len(),
            date_columns = config.granularities.len(),
            "Facet configuration loaded"
        );
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let yaml = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&yaml)
    }

    /// Check structural consistency. Called by the loaders.
    pub fn validate(&self) -> Result<()> {
        check_identifier("database table", &self.table)?;

        if self.facet_labels.is_empty() {
            return Err(Error::Config(
                "'facet labels' must name at least one column".to_string(),
            ));
        }
        for column in self.facet_labels.keys() {
            check_identifier("facet labels", column)?;
            if EXTRA_PARAMETERS.contains(&column) {
                return Err(Error::Config(format!(
                    "facet column '{column}' collides with a reserved parameter name"
                )));
            }
        }

        let column_lists = [
            ("keyword columns", &self.keyword_columns),
            ("full text columns", &self.full_text_columns),
            ("required columns", &self.required_columns),
        ];
        for (setting, columns) in column_lists {
            for column in columns {
                check_identifier(setting, column)?;
            }
        }
        for column in self.output_columns.keys() {
            check_identifier("output columns", column)?;
        }
        for column in self.date_formats.keys() {
            check_identifier("date formats", column)?;
        }

        for (additional, main) in self.additional_columns.iter() {
            check_identifier("columns for additional values", additional)?;
            if !self.facet_labels.contains_key(main) {
                return Err(Error::Config(format!(
                    "additional column '{additional}' points at '{main}', which is not a facet column"
                )));
            }
        }

        if self.pager_limit == 0 {
            return Err(Error::Config("'pager limit' must be at least 1".to_string()));
        }

        Ok(())
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Facet column names in display order.
    pub fn facet_columns(&self) -> impl Iterator<Item = &str> {
        self.facet_labels.keys()
    }

    pub fn facet_labels(&self) -> &ColumnMap {
        &self.facet_labels
    }

    pub fn facet_label(&self, column: &str) -> Option<&str> {
        self.facet_labels.get(column)
    }

    pub fn is_facet(&self, column: &str) -> bool {
        self.facet_labels.contains_key(column)
    }

    pub fn keyword_columns(&self) -> &[String] {
        &self.keyword_columns
    }

    pub fn full_text_columns(&self) -> &[String] {
        &self.full_text_columns
    }

    pub fn output_columns(&self) -> &ColumnMap {
        &self.output_columns
    }

    pub fn date_formats(&self) -> &ColumnMap {
        &self.date_formats
    }

    pub fn date_format(&self, column: &str) -> Option<&str> {
        self.date_formats.get(column)
    }

    pub fn is_date_facet(&self, column: &str) -> bool {
        self.date_formats.contains_key(column)
    }

    pub fn additional_columns(&self) -> &ColumnMap {
        &self.additional_columns
    }

    /// Auxiliary columns whose values also count for `main_column`.
    pub fn additional_columns_for<'a>(
        &'a self,
        main_column: &'a str,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.additional_columns
            .iter()
            .filter(move |(_, main)| *main == main_column)
            .map(|(additional, _)| additional)
    }

    pub fn required_columns(&self) -> &[String] {
        &self.required_columns
    }

    pub fn keyword_default_and(&self) -> bool {
        self.keyword_default_and
    }

    pub fn keyword_auto_wildcard(&self) -> bool {
        self.keyword_auto_wildcard
    }

    pub fn pager_limit(&self) -> usize {
        self.pager_limit
    }

    pub fn assets_location(&self) -> &str {
        &self.assets_location
    }

    /// Supported granularities of every date column.
    pub fn granularities(&self) -> &DateGranularities {
        &self.granularities
    }

    /// Columns a result listing may be sorted by.
    pub fn is_sortable(&self, column: &str) -> bool {
        self.output_columns.contains_key(column) || self.facet_labels.contains_key(column)
    }

    /// Query-string names the request parser accepts: facet columns, then
    /// the reserved parameters.
    pub fn allowed_parameters(&self) -> Vec<&str> {
        self.facet_columns()
            .chain(EXTRA_PARAMETERS.iter().copied())
            .collect()
    }
}

/// Column and table names are interpolated into SQL text, so only plain
/// (optionally dot-qualified) identifiers are accepted.
fn check_identifier(setting: &str, name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && !name.starts_with('.')
        && !name.ends_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
    if valid {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "'{setting}' contains an invalid column name: {name:?}"
        )))
    }
}
