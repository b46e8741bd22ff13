pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::config::{cli::LocalStorage, toml_config::TomlConfig};
pub use crate::core::{
    aggregate::{aggregate, aggregate_with},
    device::is_mobile_device,
    engine::RankingEngine,
    pipeline::RankingPipeline,
    ranking::{rank_top_units, rank_top_units_with},
};
pub use crate::domain::model::{
    ContentItem, NanPolicy, NavigationContext, OutputFormat, Ranking, RankingEntry, Unit,
    UnitCollection,
};
pub use crate::utils::error::{RankError, Result};
