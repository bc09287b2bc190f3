//! Service wiring: the shop service, the optional suggester, and the realtime channel.

use std::{convert::Infallible, sync::Arc, time::Duration};

use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::broadcast;
use tokio_stream::{wrappers::BroadcastStream, StreamExt};

use stallbook_ai::{GeminiClient, GeminiClientConfig, IngredientSuggester, LlmClient, LlmError};
use stallbook_infra::store::{InMemorySnapshotStore, JsonFileStore, SnapshotStore};
use stallbook_infra::{ServiceError, ShopService};

use crate::config::{AppConfig, StoreConfig};

/// Topics broadcast on `/stream` after a committed mutation.
pub const INVENTORY_UPDATED: &str = "inventory.updated";
pub const SALES_UPDATED: &str = "sales.updated";
pub const EXPENSES_UPDATED: &str = "expenses.updated";

/// Realtime message broadcast via SSE.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RealtimeMessage {
    pub topic: &'static str,
    pub payload: Value,
}

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("failed to load shop state: {0}")]
    Service(#[from] ServiceError),

    #[error("failed to create model client: {0}")]
    Llm(#[from] LlmError),
}

pub type Suggester = IngredientSuggester<Arc<dyn LlmClient>>;

pub struct AppServices {
    shop: ShopService<Box<dyn SnapshotStore>>,
    suggester: Option<Suggester>,
    realtime_tx: broadcast::Sender<RealtimeMessage>,
}

impl AppServices {
    pub fn new(
        store: Box<dyn SnapshotStore>,
        llm: Option<(Arc<dyn LlmClient>, String)>,
    ) -> Result<Self, BuildError> {
        let shop = ShopService::load(store)?;
        let suggester = llm.map(|(client, model)| IngredientSuggester::new(client, model));

        // Lossy broadcast: slow subscribers miss messages instead of blocking writers.
        let (realtime_tx, _realtime_rx) = broadcast::channel::<RealtimeMessage>(256);

        Ok(Self {
            shop,
            suggester,
            realtime_tx,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, BuildError> {
        let store: Box<dyn SnapshotStore> = match &config.store {
            StoreConfig::InMemory => {
                tracing::info!("using in-memory store");
                Box::new(InMemorySnapshotStore::seeded())
            }
            StoreConfig::JsonDir(dir) => {
                tracing::info!(dir = %dir.display(), "using JSON file store");
                Box::new(JsonFileStore::new(dir.clone()))
            }
        };

        let llm = match &config.gemini {
            Some(gemini) => {
                let client = GeminiClient::new(GeminiClientConfig {
                    api_key: gemini.api_key.clone(),
                    model: gemini.model.clone(),
                    ..GeminiClientConfig::default()
                })?;
                let client: Arc<dyn LlmClient> = Arc::new(client);
                Some((client, gemini.model.clone()))
            }
            None => {
                tracing::warn!("GEMINI_API_KEY not set; ingredient suggestions are disabled");
                None
            }
        };

        Self::new(store, llm)
    }

    pub fn shop(&self) -> &ShopService<Box<dyn SnapshotStore>> {
        &self.shop
    }

    pub fn suggester(&self) -> Option<&Suggester> {
        self.suggester.as_ref()
    }

    pub fn realtime_tx(&self) -> &broadcast::Sender<RealtimeMessage> {
        &self.realtime_tx
    }

    /// Tell connected dashboards that `topic` changed.
    pub fn notify(&self, topic: &'static str, payload: Value) {
        // An error only means nobody is listening.
        let receivers = self
            .realtime_tx
            .send(RealtimeMessage { topic, payload })
            .unwrap_or(0);
        tracing::debug!(topic, receivers, "realtime notification sent");
    }
}

/// SSE stream of every realtime message.
pub fn sse_stream(
    services: Arc<AppServices>,
) -> Sse<impl tokio_stream::Stream<Item = Result<SseEvent, Infallible>>> {
    let rx = services.realtime_tx().subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|msg| match msg {
        Ok(m) => {
            let data = serde_json::to_string(&m.payload).unwrap_or_else(|_| "{}".to_string());
            Some(Ok(SseEvent::default().event(m.topic).data(data)))
        }
        // Lagged receivers skip what they missed.
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}
