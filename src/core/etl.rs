use crate::core::Pipeline;
use crate::domain::model::RunSummary;
use crate::utils::error::Result;
use std::time::Instant;

pub struct ReportEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> ReportEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<RunSummary> {
        let started = Instant::now();
        tracing::info!("Starting CBO cost estimate report");

        // Extract
        let phase = Instant::now();
        let items = self.pipeline.extract().await?;
        tracing::info!(
            "Extracted {} new feed items in {:?}",
            items.len(),
            phase.elapsed()
        );

        // Transform
        let phase = Instant::now();
        let report = self.pipeline.transform(items).await?;
        let total_new = report.total_new();
        let total_missing = report.total_missing();
        tracing::info!(
            "Checked {} bills against CDG in {:?} ({} missing)",
            total_new,
            phase.elapsed(),
            total_missing
        );

        // Load
        let phase = Instant::now();
        let output_path = self.pipeline.load(report).await?;
        tracing::info!("Report written to {} in {:?}", output_path, phase.elapsed());

        tracing::debug!("Run finished in {:?}", started.elapsed());
        Ok(RunSummary {
            output_path,
            total_new,
            total_missing,
        })
    }
}
