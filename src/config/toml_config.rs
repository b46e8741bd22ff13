use crate::core::{ConfigProvider, NanPolicy, OutputFormat};
use crate::utils::error::{RankError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub report: ReportConfig,
    pub source: SourceConfig,
    #[serde(default)]
    pub ranking: RankingConfig,
    pub load: LoadConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub name: String,
    pub description: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub units_file: String,
    pub year: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RankingConfig {
    pub search_query: Option<String>,
    pub top_n: Option<usize>,
    pub nan_policy: Option<NanPolicy>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub output_formats: Vec<String>,
    pub compression: Option<CompressionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
    pub filename: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub json: Option<bool>,
}

const MAX_TOP_N: usize = 1000;

impl TomlConfig {
    /// Loads and parses a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(RankError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses TOML text after `${VAR}` substitution.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| RankError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value. Unset variables are left as written.
    fn substitute_env_vars(content: &str) -> String {
        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR
            .get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("report.name", &self.report.name)?;

        validation::validate_path("source.units_file", &self.source.units_file)?;
        validation::validate_file_extension("source.units_file", &self.source.units_file, &["json"])?;

        validation::validate_path("load.output_path", &self.load.output_path)?;

        if let Some(top_n) = self.ranking.top_n {
            validation::validate_range("ranking.top_n", top_n, 1, MAX_TOP_N)?;
        }

        if self.load.output_formats.is_empty() {
            return Err(RankError::MissingConfigError {
                field: "load.output_formats".to_string(),
            });
        }

        for format in &self.load.output_formats {
            OutputFormat::from_str(format).map_err(|reason| RankError::InvalidConfigValueError {
                field: "load.output_formats".to_string(),
                value: format.clone(),
                reason,
            })?;
        }

        if let Some(compression) = self.load.compression.as_ref().filter(|c| c.enabled) {
            validation::validate_file_extension(
                "load.compression.filename",
                &compression.filename,
                &["zip"],
            )?;
        }

        Ok(())
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.level.as_deref())
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn units_file(&self) -> &str {
        &self.source.units_file
    }

    fn year(&self) -> Option<&str> {
        self.source.year.as_deref()
    }

    fn search_query(&self) -> &str {
        self.ranking.search_query.as_deref().unwrap_or("")
    }

    fn top_n(&self) -> Option<usize> {
        self.ranking.top_n
    }

    fn nan_policy(&self) -> NanPolicy {
        self.ranking.nan_policy.unwrap_or_default()
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn output_formats(&self) -> Vec<OutputFormat> {
        // unknown formats are reported by validate_config
        self.load
            .output_formats
            .iter()
            .filter_map(|f| OutputFormat::from_str(f).ok())
            .collect()
    }

    fn archive_name(&self) -> Option<&str> {
        self.load
            .compression
            .as_ref()
            .filter(|c| c.enabled)
            .map(|c| c.filename.as_str())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
