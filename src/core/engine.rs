use crate::core::orchestrator::{EnrichmentOrchestrator, SelectionView};
use crate::domain::model::Product;
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Settled view of one product, ready to print or save.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentReport {
    pub generated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub view: SelectionView,
    pub image_src: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_to: Option<String>,
}

impl EnrichmentReport {
    pub fn new(view: SelectionView) -> Self {
        Self {
            generated_at: Utc::now(),
            image_src: view.image_src(),
            view,
            saved_to: None,
        }
    }
}

pub struct EnrichmentEngine<S: Storage> {
    orchestrator: EnrichmentOrchestrator,
    storage: Option<S>,
}

impl<S: Storage> EnrichmentEngine<S> {
    pub fn new(orchestrator: EnrichmentOrchestrator, storage: Option<S>) -> Self {
        Self {
            orchestrator,
            storage,
        }
    }

    pub fn orchestrator(&self) -> &EnrichmentOrchestrator {
        &self.orchestrator
    }

    pub async fn run(&self, product: &'static Product) -> Result<EnrichmentReport> {
        tracing::info!("Opening '{}' ({})", product.name, product.category);

        // 兩個請求各自在背景執行
        let in_flight = self.orchestrator.select(product);
        let view = self.orchestrator.settled().await;
        tracing::debug!(
            "Selection #{} settled (text: {:?}, image: {})",
            in_flight.ticket.generation,
            view.text_source,
            if view.image.is_some() { "generated" } else { "placeholder" }
        );

        let mut report = EnrichmentReport::new(view);

        if let Some(storage) = &self.storage {
            let json = serde_json::to_vec_pretty(&report)?;
            let filename = format!("enrichment_{}.json", product.id);
            tracing::debug!("Writing report ({} bytes) to storage", json.len());
            let path = storage.write_file(&filename, &json).await?;
            tracing::info!("📁 Report saved to: {}", path);
            report.saved_to = Some(path);
        }

        Ok(report)
    }
}
