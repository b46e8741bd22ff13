use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct RankingEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> RankingEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting ranking run");

        let units = self.pipeline.extract().await?;
        tracing::info!("Extracted {} units", units.len());

        let report = self.pipeline.transform(units).await?;
        tracing::info!(
            "Ranked {} units, {} on the leaderboard",
            report.ranking.entries().len(),
            report.top.len()
        );
        if let Some(leader) = report.top.first() {
            tracing::info!("Top unit: {} ({})", leader.title, leader.total);
        }

        let output_path = self.pipeline.load(report).await?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(output_path)
    }
}
