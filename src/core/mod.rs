pub mod aggregate;
pub mod device;
pub mod engine;
pub mod pipeline;
pub mod ranking;
pub mod report;

pub use crate::domain::model::{
    ContentItem, NanPolicy, NavigationContext, OutputFormat, Ranking, RankingEntry,
    RankingReport, Unit, UnitCollection, UnitsDocument,
};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
