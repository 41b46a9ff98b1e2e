use poem_openapi::payload::PlainText;

use crate::web::session::Session;

pub struct HealthService<'a> {
    pub session: &'a Session,
}

impl<'a> HealthService<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn status_text(&self) -> PlainText<String> {
        let ctrl = self.session.controller().await;
        let state = if ctrl.error().is_some() { "degraded" } else { "ok" };
        PlainText(format!(
            "{state} version={} books={} wishlist={} loading={}",
            env!("CARGO_PKG_VERSION"),
            ctrl.catalog().books().len(),
            ctrl.wishlist().len(),
            ctrl.catalog().is_loading()
        ))
    }
}
