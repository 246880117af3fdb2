use crate::core::{HotCold, Pipeline};
use crate::utils::error::Result;

/// Outcome of one full pipeline run, kept for reporting.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub output_path: String,
    pub phase_count: usize,
    pub report: HotCold,
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<RunSummary> {
        tracing::info!("Extracting raw draw document...");
        let document = self.pipeline.extract().await?;
        tracing::info!("Got {} bytes of markup", document.len());

        tracing::info!("Transforming into phases...");
        let transformed = self.pipeline.transform(document).await?;
        let phase_count = transformed.phases.len();
        let report = transformed.report.clone();
        tracing::info!("Parsed {} phases", phase_count);

        tracing::info!("Loading results...");
        let output_path = self.pipeline.load(transformed).await?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(RunSummary {
            output_path,
            phase_count,
            report,
        })
    }
}
