use crate::core::ranking::rank_top_units_with;
use crate::core::report::build_report;
use crate::core::{
    ConfigProvider, NavigationContext, OutputFormat, Pipeline, RankingReport, Storage,
    UnitCollection, UnitsDocument,
};
use crate::utils::error::{RankError, Result};
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

/// Reads a units document through `source`, ranks it, and writes the
/// leaderboard through `sink`.
pub struct RankingPipeline<S: Storage, C: ConfigProvider> {
    source: S,
    sink: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> RankingPipeline<S, C> {
    pub fn new(source: S, sink: S, config: C) -> Self {
        Self {
            source,
            sink,
            config,
        }
    }

    fn bodies<'a>(&self, report: &'a RankingReport) -> Vec<(&'static str, &'a str)> {
        self.config
            .output_formats()
            .into_iter()
            .map(|format| {
                let body = match format {
                    OutputFormat::Csv => report.csv_output.as_str(),
                    OutputFormat::Tsv => report.tsv_output.as_str(),
                    OutputFormat::Json => report.json_output.as_str(),
                };
                (format.file_name(), body)
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for RankingPipeline<S, C> {
    async fn extract(&self) -> Result<UnitCollection> {
        let units_file = self.config.units_file();
        tracing::debug!("Reading units document from: {}", units_file);

        let raw = self.source.read_file(units_file).await?;
        let value: serde_json::Value = serde_json::from_slice(&raw)?;

        let units = UnitsDocument::from_value(value)
            .and_then(|document| document.into_units(self.config.year()))
            .map_err(|message| RankError::DocumentError { message })?;

        tracing::debug!("Loaded {} units", units.len());
        Ok(units)
    }

    async fn transform(&self, units: UnitCollection) -> Result<RankingReport> {
        let nav = NavigationContext::new(self.config.search_query());
        let policy = self.config.nan_policy();
        tracing::debug!("Ranking with {:?} NaN policy", policy);

        let ranking = rank_top_units_with(&units, &nav, policy);
        if ranking.is_empty() {
            tracing::warn!("No gradable units found, writing empty leaderboard");
        }

        build_report(
            ranking,
            &nav.current_search_query,
            self.config.top_n(),
            chrono::Utc::now(),
        )
    }

    async fn load(&self, report: RankingReport) -> Result<String> {
        let bodies = self.bodies(&report);
        if bodies.is_empty() {
            return Err(RankError::ValidationError {
                message: "No output formats selected".to_string(),
            });
        }

        if let Some(archive_name) = self.config.archive_name() {
            tracing::debug!("Creating ZIP file with {} files", bodies.len());

            let zip_data = {
                let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
                for (file_name, body) in &bodies {
                    zip.start_file::<_, ()>(*file_name, FileOptions::default())?;
                    zip.write_all(body.as_bytes())?;
                }
                let cursor = zip.finish()?;
                cursor.into_inner()
            };

            tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
            self.sink.write_file(archive_name, &zip_data).await?;
            return Ok(format!("{}/{}", self.config.output_path(), archive_name));
        }

        for (file_name, body) in &bodies {
            tracing::debug!("Writing {} ({} bytes)", file_name, body.len());
            self.sink.write_file(file_name, body.as_bytes()).await?;
        }

        Ok(self.config.output_path().to_string())
    }
}
