//! Data module - dataset download, CSV loading, and cleaning

pub mod cleaner;
pub mod fetch;
pub mod loader;

pub use cleaner::Cleaner;
pub use loader::DataLoader;
