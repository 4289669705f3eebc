use crate::domain::model::{Enrichment, Product, TextSource};
use crate::domain::ports::{ImageProvider, TextProvider};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Identifies the selection a provider request was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionTicket {
    pub generation: u64,
    pub product_id: &'static str,
}

/// Per-channel lifecycle: `idle -> loading -> {resolved | resolved-with-fallback}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChannelStatus {
    #[default]
    Idle,
    Loading,
    Resolved,
    ResolvedWithFallback,
}

#[derive(Debug, Clone, Default)]
pub struct EnrichmentState {
    generation: u64,
    product: Option<&'static Product>,
    text: Option<Enrichment>,
    text_status: ChannelStatus,
    image: Option<String>,
    image_status: ChannelStatus,
}

impl EnrichmentState {
    fn loading(product: &'static Product, generation: u64) -> Self {
        Self {
            generation,
            product: Some(product),
            text: None,
            text_status: ChannelStatus::Loading,
            image: None,
            image_status: ChannelStatus::Loading,
        }
    }

    fn is_current(&self, ticket: SelectionTicket) -> bool {
        self.generation == ticket.generation && self.product.map(|p| p.id) == Some(ticket.product_id)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn text_status(&self) -> ChannelStatus {
        self.text_status
    }

    pub fn image_status(&self) -> ChannelStatus {
        self.image_status
    }

    pub fn is_loading(&self) -> bool {
        self.text_status == ChannelStatus::Loading || self.image_status == ChannelStatus::Loading
    }

    /// What the presentation layer gets to see.
    pub fn view(&self) -> SelectionView {
        let text_source = match self.text_status {
            ChannelStatus::Resolved => Some(TextSource::Generated),
            ChannelStatus::ResolvedWithFallback => Some(TextSource::Fallback),
            ChannelStatus::Idle | ChannelStatus::Loading => None,
        };

        SelectionView {
            product: self.product,
            text: self.text.clone(),
            text_loading: self.text_status == ChannelStatus::Loading,
            text_source,
            image: self.image.clone(),
            image_loading: self.image_status == ChannelStatus::Loading,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionView {
    pub product: Option<&'static Product>,
    pub text: Option<Enrichment>,
    pub text_loading: bool,
    pub text_source: Option<TextSource>,
    pub image: Option<String>,
    pub image_loading: bool,
}

impl SelectionView {
    /// Generated data URI if present, otherwise the product's stock photo.
    pub fn image_src(&self) -> Option<String> {
        self.image
            .clone()
            .or_else(|| self.product.map(|p| p.placeholder_image_url()))
    }

    pub fn is_settled(&self) -> bool {
        !self.text_loading && !self.image_loading
    }
}

/// Requests spawned for one selection. Each handle yields whether its result
/// was applied (`false` when the selection moved on before it arrived).
/// Dropping the handles detaches the tasks.
pub struct InFlight {
    pub ticket: SelectionTicket,
    pub text: JoinHandle<bool>,
    pub image: JoinHandle<bool>,
}

pub struct EnrichmentOrchestrator {
    text_provider: Arc<dyn TextProvider>,
    image_provider: Arc<dyn ImageProvider>,
    state: Arc<watch::Sender<EnrichmentState>>,
}

impl EnrichmentOrchestrator {
    pub fn new(text_provider: Arc<dyn TextProvider>, image_provider: Arc<dyn ImageProvider>) -> Self {
        let (state, _) = watch::channel(EnrichmentState::default());
        Self {
            text_provider,
            image_provider,
            state: Arc::new(state),
        }
    }

    /// Opens `product` and fires both provider requests back to back.
    ///
    /// The previous selection's results are cleared in the same update, so
    /// nothing stale is ever visible next to the new product. Must be called
    /// from within a tokio runtime.
    pub fn select(&self, product: &'static Product) -> InFlight {
        let mut generation = 0;
        self.state.send_modify(|state| {
            generation = state.generation + 1;
            *state = EnrichmentState::loading(product, generation);
        });
        let ticket = SelectionTicket {
            generation,
            product_id: product.id,
        };

        tracing::info!("🐟 Selected '{}' (selection #{})", product.name, generation);

        let text = tokio::spawn(run_text(
            Arc::clone(&self.text_provider),
            Arc::clone(&self.state),
            ticket,
            product.name,
        ));
        let image = tokio::spawn(run_image(
            Arc::clone(&self.image_provider),
            Arc::clone(&self.state),
            ticket,
            product.name,
        ));

        InFlight {
            ticket,
            text,
            image,
        }
    }

    /// Clears the selection; requests still in flight are ignored when they land.
    pub fn close(&self) {
        self.state.send_modify(|state| {
            let generation = state.generation + 1;
            *state = EnrichmentState {
                generation,
                ..EnrichmentState::default()
            };
        });
        tracing::debug!("Selection closed");
    }

    pub fn snapshot(&self) -> SelectionView {
        self.state.borrow().view()
    }

    pub fn subscribe(&self) -> watch::Receiver<EnrichmentState> {
        self.state.subscribe()
    }

    /// Waits until neither channel is loading and returns the view at that point.
    pub async fn settled(&self) -> SelectionView {
        let mut rx = self.state.subscribe();
        // 綁定到區域變數，讓 Ref 在 rx 之前釋放
        let view = match rx.wait_for(|state| !state.is_loading()).await {
            Ok(state) => state.view(),
            Err(_) => self.snapshot(),
        };
        view
    }
}

async fn run_text(
    provider: Arc<dyn TextProvider>,
    state: Arc<watch::Sender<EnrichmentState>>,
    ticket: SelectionTicket,
    product_name: &'static str,
) -> bool {
    let (enrichment, status) = match provider.generate_insights(product_name).await {
        Ok(enrichment) => (enrichment, ChannelStatus::Resolved),
        Err(e) => {
            tracing::warn!(
                "⚠️ Text enrichment for '{}' failed, using fallback copy: {}",
                product_name,
                e
            );
            (Enrichment::fallback(), ChannelStatus::ResolvedWithFallback)
        }
    };

    let applied = state.send_if_modified(|current| {
        if !current.is_current(ticket) || current.text_status != ChannelStatus::Loading {
            return false;
        }
        current.text = Some(enrichment);
        current.text_status = status;
        true
    });

    if applied {
        tracing::debug!("Text enrichment applied to selection #{}", ticket.generation);
    } else {
        tracing::debug!(
            "Discarding stale text enrichment for '{}' (selection #{})",
            product_name,
            ticket.generation
        );
    }
    applied
}

async fn run_image(
    provider: Arc<dyn ImageProvider>,
    state: Arc<watch::Sender<EnrichmentState>>,
    ticket: SelectionTicket,
    product_name: &'static str,
) -> bool {
    let (image, status) = match provider.generate_image(product_name).await {
        Ok(Some(image)) => (Some(image.to_data_uri()), ChannelStatus::Resolved),
        Ok(None) => {
            tracing::warn!("⚠️ Image provider returned no image for '{}'", product_name);
            (None, ChannelStatus::ResolvedWithFallback)
        }
        Err(e) => {
            tracing::warn!("⚠️ Image enrichment for '{}' failed: {}", product_name, e);
            (None, ChannelStatus::ResolvedWithFallback)
        }
    };

    let applied = state.send_if_modified(|current| {
        if !current.is_current(ticket) || current.image_status != ChannelStatus::Loading {
            return false;
        }
        current.image = image;
        current.image_status = status;
        true
    });

    if applied {
        tracing::debug!("Image enrichment applied to selection #{}", ticket.generation);
    } else {
        tracing::debug!(
            "Discarding stale image for '{}' (selection #{})",
            product_name,
            ticket.generation
        );
    }
    applied
}
