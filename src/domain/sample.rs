// Sample (isolate) domain models
use serde::Serialize;
use std::collections::BTreeMap;

/// Presence flags for resistance-associated markers, gene name to 0/1
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GenePresencePanel(BTreeMap<String, u8>);

impl GenePresencePanel {
    /// Panel with every listed gene marked present
    pub fn with_present<I, S>(genes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(genes.into_iter().map(|g| (g.into(), 1)).collect())
    }

    pub fn from_flags(flags: BTreeMap<String, u8>) -> Self {
        Self(flags)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_present(&self, gene: &str) -> bool {
        self.0.get(gene).is_some_and(|flag| *flag > 0)
    }
}

/// What the prediction service made of an uploaded FASTA file
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    ValidationPhase,
    Extracted(GenePresencePanel),
    Other(String),
}

impl UploadOutcome {
    pub fn status_message(&self) -> String {
        match self {
            UploadOutcome::ValidationPhase => "Uploaded (Validation Phase - No Genes Extracted)".to_string(),
            UploadOutcome::Extracted(genes) => format!("Analysis Complete. Found {} genes.", genes.len()),
            UploadOutcome::Other(status) => format!("Uploaded (status: {})", status),
        }
    }
}
