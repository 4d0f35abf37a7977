pub mod cdg;
pub mod citation;
pub mod congress;
pub mod etl;
pub mod feed;
pub mod pipeline;
pub mod report;

pub use crate::domain::model::{FeedItem, Report, ReportRow};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
