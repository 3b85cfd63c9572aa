//! Filter descriptors and active filter selections.

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::row::Row;

/// A single-select filter over one row key.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Filter {
    /// Label, also used for the implicit "All {name}" choice
    pub name: String,
    /// Row key matched by this filter (defaults to `name`)
    #[serde(default)]
    key: Option<String>,
    /// Allowed option values, in display order
    #[serde(default)]
    pub options: Vec<String>,
}

/// One entry of a filter's option list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterChoice<'a> {
    /// No selection: every row passes this filter.
    All,
    Value(&'a str),
}

impl Filter {
    pub fn new<I, S>(name: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            key: None,
            options: options.into_iter().map(Into::into).collect(),
        }
    }

    /// Build a filter whose options are the distinct non-empty values found
    /// at `key` in `rows`, sorted.
    pub fn from_rows(name: impl Into<String>, key: impl Into<String>, rows: &[Row]) -> Self {
        let key = key.into();
        let options: BTreeSet<&str> = rows
            .iter()
            .map(|row| row.raw(&key))
            .filter(|v| !v.is_empty())
            .collect();
        Self {
            name: name.into(),
            options: options.into_iter().map(str::to_string).collect(),
            key: Some(key),
        }
    }

    /// Fill an empty option list from the distinct values in `rows`.
    pub fn derive_options(&mut self, rows: &[Row]) {
        if self.options.is_empty() {
            self.options = Self::from_rows(self.name.as_str(), self.key(), rows).options;
        }
    }

    /// Match a row key other than the filter's name.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Row key this filter matches against.
    pub fn key(&self) -> &str {
        self.key.as_deref().unwrap_or(&self.name)
    }

    /// Label of the implicit first choice.
    pub fn all_label(&self) -> String {
        format!("All {}", self.name)
    }

    /// Choices in display order, starting with [`FilterChoice::All`].
    pub fn choices(&self) -> impl Iterator<Item = FilterChoice<'_>> {
        std::iter::once(FilterChoice::All)
            .chain(self.options.iter().map(|o| FilterChoice::Value(o.as_str())))
    }

    /// Number of choices including "All".
    pub fn choice_count(&self) -> usize {
        self.options.len() + 1
    }

    pub fn choice_label(&self, choice: FilterChoice<'_>) -> String {
        match choice {
            FilterChoice::All => self.all_label(),
            FilterChoice::Value(v) => v.to_string(),
        }
    }

    /// Position of `selection` in [`Filter::choices`]. Unset or unknown
    /// selections map to "All" (0).
    pub fn choice_index(&self, selection: Option<&str>) -> usize {
        selection
            .and_then(|s| self.options.iter().position(|o| o == s))
            .map_or(0, |i| i + 1)
    }
}

/// Parses `NAME` or `NAME=OPT1,OPT2`. With no options listed, the caller is
/// expected to derive them from the loaded rows.
impl FromStr for Filter {
    type Err = ConfigError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let (name, options) = match spec.split_once('=') {
            Some((name, opts)) => (name, opts),
            None => (spec, ""),
        };
        let name = name.trim();
        if name.is_empty() {
            return Err(ConfigError::FilterSpec(spec.to_string()));
        }
        let options = options
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty());
        Ok(Filter::new(name, options))
    }
}

/// Active selections keyed by filter name. An absent entry means "All".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveFilters(BTreeMap<String, String>);

impl ActiveFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Set or clear the selection for `name`. An empty string clears.
    /// Returns true when the stored selection changed.
    pub fn set(&mut self, name: &str, selection: Option<String>) -> bool {
        match selection.filter(|s| !s.is_empty()) {
            Some(value) => {
                if self.get(name) == Some(value.as_str()) {
                    return false;
                }
                self.0.insert(name.to_string(), value);
                true
            }
            None => self.0.remove(name).is_some(),
        }
    }

    /// Drop every selection. Returns true when anything was set.
    pub fn clear(&mut self) -> bool {
        let changed = !self.0.is_empty();
        self.0.clear();
        changed
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for ActiveFilters {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        let mut active = Self::new();
        for (name, value) in iter {
            active.set(&name.into(), Some(value.into()));
        }
        active
    }
}
