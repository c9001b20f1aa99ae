pub mod attributes;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod db;
pub mod describe;
pub mod error;
pub mod feature;
mod metrics;
pub mod server;
pub mod similarity;

pub use catalog::{Catalog, CatalogBuilder};
pub use config::Opts;
pub use error::{Error, Result};
