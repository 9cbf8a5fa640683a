// Sample service - Holds the current isolate profile and handles FASTA uploads
use crate::application::analytics_repository::{AnalyticsRepository, GatewayError};
use crate::domain::sample::{GenePresencePanel, UploadOutcome};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;

pub const DEFAULT_UPLOAD_STATUS: &str = "Using default demo gene profile";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleLabel {
    pub name: String,
    pub upload_status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SampleSnapshot {
    #[serde(flatten)]
    pub label: SampleLabel,
    pub genes: GenePresencePanel,
}

/// Explicit context for the current sample.
///
/// Views read immutable gene panel snapshots through `subscribe_genes` and
/// only the upload flow replaces them. The label lives in its own channel
/// so status text changes do not count as a profile change.
#[derive(Clone)]
pub struct SampleContext {
    repository: Arc<dyn AnalyticsRepository>,
    genes: Arc<watch::Sender<GenePresencePanel>>,
    label: Arc<watch::Sender<SampleLabel>>,
}

impl SampleContext {
    pub fn new(repository: Arc<dyn AnalyticsRepository>, name: String, genes: GenePresencePanel) -> Self {
        let (genes, _) = watch::channel(genes);
        let (label, _) = watch::channel(SampleLabel {
            name,
            upload_status: DEFAULT_UPLOAD_STATUS.to_string(),
        });

        Self {
            repository,
            genes: Arc::new(genes),
            label: Arc::new(label),
        }
    }

    pub fn subscribe_genes(&self) -> watch::Receiver<GenePresencePanel> {
        self.genes.subscribe()
    }

    pub fn snapshot(&self) -> SampleSnapshot {
        SampleSnapshot {
            label: self.label.borrow().clone(),
            genes: self.genes.borrow().clone(),
        }
    }

    /// Forward a FASTA file for gene extraction. A non-empty extracted gene
    /// set replaces the current profile wholesale.
    pub async fn upload_fasta(&self, file_name: &str, contents: Vec<u8>) -> Result<UploadOutcome, GatewayError> {
        self.set_status("Uploading...");

        match self.repository.upload_fasta(file_name, contents).await {
            Ok(outcome) => {
                let status = outcome.status_message();
                self.label.send_modify(|label| {
                    label.name = file_name.to_string();
                    label.upload_status = status;
                });

                if let UploadOutcome::Extracted(genes) = &outcome {
                    if !genes.is_empty() {
                        tracing::info!("Sample {} now has {} genes", file_name, genes.len());
                        self.genes.send_replace(genes.clone());
                    }
                }
                Ok(outcome)
            }
            Err(e) => {
                tracing::error!("FASTA upload of {} failed: {}", file_name, e);
                self.mark_upload_failed();
                Err(e)
            }
        }
    }

    /// Record an upload that failed before it reached the service
    pub fn mark_upload_failed(&self) {
        self.set_status("Upload Failed");
    }

    fn set_status(&self, status: &str) {
        self.label.send_modify(|label| label.upload_status = status.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::fake_repository::FakeRepository;

    fn context(upload: Option<UploadOutcome>) -> SampleContext {
        let repo = Arc::new(FakeRepository {
            upload,
            ..FakeRepository::default()
        });
        SampleContext::new(repo, "Demo Isolate A".to_string(), GenePresencePanel::with_present(["blaNDM", "mecA"]))
    }

    #[tokio::test]
    async fn test_validation_phase_keeps_profile() {
        let sample = context(Some(UploadOutcome::ValidationPhase));
        let genes = sample.subscribe_genes();

        sample.upload_fasta("reads.fa", Vec::new()).await.unwrap();

        let snap = sample.snapshot();
        assert_eq!(snap.label.name, "reads.fa");
        assert_eq!(snap.label.upload_status, "Uploaded (Validation Phase - No Genes Extracted)");
        assert!(snap.genes.is_present("mecA"));
        assert!(!genes.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_empty_extraction_keeps_profile() {
        let sample = context(Some(UploadOutcome::Extracted(GenePresencePanel::default())));
        let genes = sample.subscribe_genes();

        sample.upload_fasta("empty.fasta", Vec::new()).await.unwrap();

        assert_eq!(sample.snapshot().label.upload_status, "Analysis Complete. Found 0 genes.");
        assert_eq!(sample.snapshot().genes.len(), 2);
        assert!(!genes.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_extracted_genes_replace_profile() {
        let sample = context(Some(UploadOutcome::Extracted(GenePresencePanel::with_present(["blaOXA"]))));
        let mut genes = sample.subscribe_genes();

        sample.upload_fasta("isolate.fasta", Vec::new()).await.unwrap();

        assert!(genes.has_changed().unwrap());
        let current = genes.borrow_and_update().clone();
        assert_eq!(current, GenePresencePanel::with_present(["blaOXA"]));
    }

    #[tokio::test]
    async fn test_failed_upload_reports_status() {
        let sample = context(None);

        let err = sample.upload_fasta("isolate.fasta", Vec::new()).await.unwrap_err();
        assert!(matches!(err, GatewayError::Status { status: 500, .. }));

        let snap = sample.snapshot();
        assert_eq!(snap.label.upload_status, "Upload Failed");
        assert_eq!(snap.label.name, "Demo Isolate A");
    }
}
