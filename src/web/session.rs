use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{Mutex, MutexGuard};
use tokio::task::JoinHandle;

use crate::catalog::FetchTicket;
use crate::catalog_client::CatalogSource;
use crate::view::render::render;
use crate::view::{Action, Debouncer, Followup, ViewController};

/// The one browser session this process serves.
///
/// Every request locks the controller for the duration of one action. The
/// remote fetch a refresh asks for runs with the lock released.
pub struct Session {
    controller: Mutex<ViewController>,
    source: Arc<dyn CatalogSource>,
    debouncer: Debouncer,
    debounce_delay: Duration,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("debounce_delay", &self.debounce_delay)
            .field("search_pending", &self.debouncer.is_pending())
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn new(
        controller: ViewController,
        source: Arc<dyn CatalogSource>,
        debounce_delay: Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            controller: Mutex::new(controller),
            source,
            debouncer: Debouncer::new(),
            debounce_delay,
        })
    }

    /// Load the first catalog page. Failures end up in the error banner.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn start(&self) {
        let followup = self.controller.lock().await.start(Utc::now());
        self.run(followup).await;
    }

    /// Run `start` in the background so pages render the loading state meanwhile.
    pub fn spawn_start(self: &Arc<Self>) -> JoinHandle<()> {
        let session = Arc::clone(self);
        tokio::spawn(async move { session.start().await })
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn dispatch(self: &Arc<Self>, action: Action) {
        if matches!(action, Action::ApplySearch(_)) {
            self.debouncer.cancel();
        }
        let followup = self.controller.lock().await.handle(action, Utc::now()).await;
        match followup {
            Followup::Debounce { text, generation } => {
                let session = Arc::clone(self);
                self.debouncer.schedule(self.debounce_delay, async move {
                    session.apply_search(text, generation).await;
                });
            }
            other => self.run(other).await,
        }
    }

    pub async fn render(&self) -> String {
        render(&*self.controller.lock().await)
    }

    /// Read access for the JSON endpoints.
    pub async fn controller(&self) -> MutexGuard<'_, ViewController> {
        self.controller.lock().await
    }

    pub fn search_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    async fn apply_search(&self, text: String, generation: u64) {
        tracing::debug!(%text, generation, "debounced search due");
        let followup = self
            .controller
            .lock()
            .await
            .handle(Action::DebouncedSearch { text, generation }, Utc::now())
            .await;
        self.run(followup).await;
    }

    async fn run(&self, followup: Followup) {
        match followup {
            Followup::Fetch(ticket) => self.fetch(ticket).await,
            Followup::None => {}
            Followup::Debounce { .. } => {
                tracing::warn!("nested debounce request ignored");
            }
        }
    }

    async fn fetch(&self, ticket: FetchTicket) {
        let result = self.source.fetch_page(ticket.page()).await;
        self.controller
            .lock()
            .await
            .complete_fetch(ticket, result, Utc::now());
    }
}
