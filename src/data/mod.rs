//! Data module - CSV discovery, loading and merging

mod catalog;
mod loader;

pub use catalog::{FileCatalog, FileRef};
pub use loader::{column_names, format_cell, DataLoader, LoadError};
