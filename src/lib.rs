//! Searchable, filterable, paginated data table for terminal dashboards.
//!
//! The [`DataTable`] component takes a row set plus a configuration and
//! handles search, filtering, paging and the loading/empty states itself.
//! Row and add clicks are reported through callbacks. Loading rows is left
//! to the host; [`fetch::RowFetcher`] is one way to do it.

pub mod config;
pub mod empty_state;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod filter_dropdown;
pub mod handlers;
pub mod loader;
pub mod pagination;
pub mod query;
pub mod render;
pub mod row;
pub mod search_box;
pub mod skeleton;
pub mod state;
pub mod table;

pub use filter::{ActiveFilters, Filter, FilterChoice};
pub use handlers::KeyAction;
pub use row::{CellValue, Column, Row};
pub use state::Focus;
pub use table::{DataTable, TableConfig, TableView};
