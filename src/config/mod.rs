pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::{ConfigProvider, NanPolicy, OutputFormat};
#[cfg(feature = "cli")]
use crate::utils::error::{RankError, Result};
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "unigoals-rank")]
#[command(about = "Rank academic units by their weighted grade totals")]
pub struct CliConfig {
    #[arg(long, default_value = "units.json", help = "JSON file holding the units or a years profile")]
    pub units_file: String,

    #[arg(long, help = "Year key to rank when the file is a profile")]
    pub year: Option<String>,

    #[arg(long, default_value = "", help = "Query string prefixed to every unit link")]
    pub search_query: String,

    #[arg(long, help = "Only write the best N units to CSV/TSV")]
    pub top_n: Option<usize>,

    #[arg(long, default_value = "hardened", help = "hardened | literal")]
    pub nan_policy: NanPolicy,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, value_delimiter = ',', default_value = "csv,tsv,json")]
    pub formats: Vec<OutputFormat>,

    #[arg(long, help = "Bundle the report files into this ZIP archive")]
    pub archive: Option<String>,

    #[arg(long, help = "Classify this user agent as mobile or desktop")]
    pub user_agent: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn units_file(&self) -> &str {
        &self.units_file
    }

    fn year(&self) -> Option<&str> {
        self.year.as_deref()
    }

    fn search_query(&self) -> &str {
        &self.search_query
    }

    fn top_n(&self) -> Option<usize> {
        self.top_n
    }

    fn nan_policy(&self) -> NanPolicy {
        self.nan_policy
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> Vec<OutputFormat> {
        self.formats.clone()
    }

    fn archive_name(&self) -> Option<&str> {
        self.archive.as_deref()
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("units_file", &self.units_file)?;
        validation::validate_file_extension("units_file", &self.units_file, &["json"])?;
        validation::validate_path("output_path", &self.output_path)?;

        if let Some(top_n) = self.top_n {
            validation::validate_positive_number("top_n", top_n, 1)?;
        }

        if let Some(archive) = &self.archive {
            validation::validate_file_extension("archive", archive, &["zip"])?;
        }

        if self.formats.is_empty() {
            return Err(RankError::ValidationError {
                message: "At least one output format is required".to_string(),
            });
        }

        Ok(())
    }
}
