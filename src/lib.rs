pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::{cli::LocalStorage, toml_config::TomlConfig, CliConfig};
pub use core::{etl::ReportEngine, pipeline::CostEstimatePipeline};
pub use domain::model::{FeedItem, Report, ReportRow, RunSummary};
pub use utils::error::{ReportError, Result};
