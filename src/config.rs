//! Table schema files.
//!
//! A schema is a JSON file describing a [`TableConfig`]. Every key is
//! optional; unknown keys are rejected so typos surface early.
//!
//! ```json
//! {
//!   "title": "Protected areas",
//!   "headers": [{ "name": "Name", "value": "name", "sortable": true }],
//!   "searchable_fields": ["name", "region"],
//!   "filters": [{ "name": "Region", "key": "region" }],
//!   "max_rows": 15
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::filter::Filter;
use crate::row::Column;
use crate::table::TableConfig;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableSchema {
    pub title: Option<String>,
    pub headers: Vec<Column>,
    pub searchable: Option<bool>,
    pub searchable_fields: Option<Vec<String>>,
    /// Filters; one with no options gets them from the loaded rows
    pub filters: Vec<Filter>,
    pub max_rows: Option<usize>,
    pub display_header: Option<bool>,
    pub skeleton_rows: Option<usize>,
    pub max_visible_pages: Option<usize>,
    pub empty_message: Option<String>,
    pub no_results_message: Option<String>,
    pub add_label: Option<String>,
}

impl TableSchema {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Table configuration with defaults for everything not set.
    pub fn into_config(self) -> TableConfig {
        let defaults = TableConfig::default();
        TableConfig {
            title: self.title,
            headers: self.headers,
            searchable: self.searchable.unwrap_or(defaults.searchable),
            searchable_fields: self.searchable_fields,
            filters: self.filters,
            max_rows: self.max_rows.unwrap_or(defaults.max_rows),
            display_header: self.display_header.unwrap_or(defaults.display_header),
            skeleton_rows: self.skeleton_rows,
            max_visible_pages: self
                .max_visible_pages
                .map_or(defaults.max_visible_pages, |n| n.max(1)),
            empty_message: self.empty_message.unwrap_or(defaults.empty_message),
            no_results_message: self
                .no_results_message
                .unwrap_or(defaults.no_results_message),
            add_label: self.add_label.unwrap_or(defaults.add_label),
        }
    }
}
