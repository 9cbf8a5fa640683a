// Risk service - Use case for the per-antibiotic risk overview
use crate::application::analytics_repository::AnalyticsRepository;
use crate::application::error::DashboardError;
use crate::application::sample_service::SampleContext;
use crate::application::view_scheduler::spawn_view;
use crate::application::view_state::{ViewCell, ViewEvents, ViewSnapshot};
use crate::domain::risk::{Antibiotic, RiskPanel};
use std::sync::Arc;
use tokio::sync::watch;

pub const ANALYSIS_FAILED_MESSAGE: &str = "Failed to fetch analysis from server. Ensure backend is running.";

#[derive(Clone)]
pub struct RiskService {
    catalog: Arc<Vec<Antibiotic>>,
    selected: Arc<watch::Sender<String>>,
    cell: Arc<ViewCell<RiskPanel>>,
}

impl RiskService {
    /// Start the risk view. It refetches whenever the selected antibiotic
    /// or the sample's gene panel changes.
    pub fn start(
        repository: Arc<dyn AnalyticsRepository>,
        sample: &SampleContext,
        catalog: Vec<Antibiotic>,
        events: ViewEvents,
    ) -> Self {
        let initial = catalog.first().map(|ab| ab.id.clone()).unwrap_or_default();
        let (selected, selected_rx) = watch::channel(initial);
        let cell = Arc::new(ViewCell::new("risk", events));

        spawn_view((selected_rx, sample.subscribe_genes()), cell.clone(), move |(antibiotic, genes)| {
            let repository = repository.clone();
            async move {
                match repository.analyze_sample(&antibiotic, &genes).await {
                    Ok(assessment) => Ok(RiskPanel::new(antibiotic, assessment)),
                    Err(e) => {
                        tracing::error!("Analysis for {} failed: {}", antibiotic, e);
                        Err(ANALYSIS_FAILED_MESSAGE.to_string())
                    }
                }
            }
        });

        Self {
            catalog: Arc::new(catalog),
            selected: Arc::new(selected),
            cell,
        }
    }

    pub fn catalog(&self) -> &[Antibiotic] {
        &self.catalog
    }

    pub fn selected(&self) -> String {
        self.selected.borrow().clone()
    }

    pub fn select_antibiotic(&self, id: &str) -> Result<(), DashboardError> {
        if !self.catalog.iter().any(|ab| ab.id == id) {
            return Err(DashboardError::UnknownAntibiotic(id.to_string()));
        }
        self.selected.send_if_modified(|current| {
            if current == id {
                return false;
            }
            *current = id.to_string();
            true
        });
        Ok(())
    }

    pub fn snapshot(&self) -> ViewSnapshot<RiskPanel> {
        self.cell.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::fake_repository::{FakeRepository, wait_until};
    use crate::application::view_state::Phase;
    use crate::domain::sample::{GenePresencePanel, UploadOutcome};

    fn catalog() -> Vec<Antibiotic> {
        [("ciprofloxacin", "Ciprofloxacin", "Fluoroquinolones"), ("meropenem", "Meropenem", "Carbapenems")]
            .into_iter()
            .map(|(id, name, class)| Antibiotic {
                id: id.to_string(),
                name: name.to_string(),
                class: class.to_string(),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_initial_analysis_uses_first_antibiotic() {
        let repo = Arc::new(FakeRepository::default());
        let sample = SampleContext::new(repo.clone(), "Demo Isolate A".to_string(), GenePresencePanel::with_present(["blaNDM"]));
        let service = RiskService::start(repo.clone(), &sample, catalog(), ViewEvents::new());

        let snap = wait_until(|| service.snapshot(), |s| s.phase == Phase::Success).await;
        let panel = snap.data.unwrap();
        assert_eq!(panel.antibiotic, "ciprofloxacin");
        assert_eq!(panel.assessment.genes.len(), 1);
        assert_eq!(repo.analyzed()[0].0, "ciprofloxacin");
    }

    #[tokio::test]
    async fn test_upload_with_genes_triggers_reanalysis() {
        let repo = Arc::new(FakeRepository {
            upload: Some(UploadOutcome::Extracted(GenePresencePanel::with_present(["qnrS", "blaKPC"]))),
            ..FakeRepository::default()
        });
        let sample = SampleContext::new(repo.clone(), "Demo Isolate A".to_string(), GenePresencePanel::with_present(["blaNDM"]));
        let service = RiskService::start(repo.clone(), &sample, catalog(), ViewEvents::new());
        wait_until(|| service.snapshot(), |s| s.phase == Phase::Success).await;

        sample.upload_fasta("isolate.fasta", b">qnrS\nACGT\n".to_vec()).await.unwrap();

        let snap = wait_until(|| service.snapshot(), |s| {
            s.generation == 2 && s.phase == Phase::Success
        })
        .await;
        assert!(snap.data.unwrap().drivers_note.is_some());
        assert!(repo.analyzed()[1].1.is_present("blaKPC"));
    }

    #[tokio::test]
    async fn test_select_antibiotic() {
        let repo = Arc::new(FakeRepository::default());
        let sample = SampleContext::new(repo.clone(), "Demo".to_string(), GenePresencePanel::default());
        let service = RiskService::start(repo.clone(), &sample, catalog(), ViewEvents::new());

        assert!(matches!(
            service.select_antibiotic("penicillin"),
            Err(DashboardError::UnknownAntibiotic(_))
        ));

        service.select_antibiotic("meropenem").unwrap();
        assert_eq!(service.selected(), "meropenem");
        let snap = wait_until(|| service.snapshot(), |s| {
            s.data.as_ref().is_some_and(|p| p.antibiotic == "meropenem")
        })
        .await;
        assert_eq!(snap.phase, Phase::Success);
    }

    #[tokio::test]
    async fn test_failed_analysis_shows_message() {
        let repo = Arc::new(FakeRepository {
            fail_analysis: true,
            ..FakeRepository::default()
        });
        let sample = SampleContext::new(repo.clone(), "Demo".to_string(), GenePresencePanel::default());
        let service = RiskService::start(repo, &sample, catalog(), ViewEvents::new());

        let snap = wait_until(|| service.snapshot(), |s| s.phase == Phase::Error).await;
        assert_eq!(snap.error.as_deref(), Some(ANALYSIS_FAILED_MESSAGE));
        assert!(snap.data.is_none());
    }
}
