use std::sync::Arc;

use poem_openapi::payload::PlainText;

use crate::pagination::PageSize;
use crate::view::{Action, Shortcut, View};
use crate::web::models::ActionResponse;
use crate::web::session::Session;

pub struct ActionService<'a> {
    pub session: &'a Arc<Session>,
}

impl<'a> ActionService<'a> {
    pub fn new(session: &'a Arc<Session>) -> Self {
        Self { session }
    }

    /// Apply `action` and send the browser back to the current view.
    pub async fn apply(&self, action: Action) -> ActionResponse {
        self.session.dispatch(action).await;
        ActionResponse::home()
    }

    pub async fn search_keystroke(&self, text: String) -> ActionResponse {
        self.session.dispatch(Action::SearchInput(text)).await;
        ActionResponse::Accepted
    }

    pub async fn select_page_size(&self, size: &str) -> ActionResponse {
        match PageSize::parse(size) {
            Some(size) => self.apply(Action::SelectPageSize(size)).await,
            None => {
                tracing::warn!(size, "unsupported page size");
                bad_request(format!("unsupported page size: {size}"))
            }
        }
    }

    pub async fn show(&self, name: &str) -> ActionResponse {
        match View::from_name(name) {
            Some(view) => self.apply(Action::Show(view)).await,
            None => bad_request(format!("unknown view: {name}")),
        }
    }

    pub async fn shortcut(&self, name: &str) -> ActionResponse {
        match Shortcut::from_name(name) {
            Some(shortcut) => self.apply(Action::Shortcut(shortcut)).await,
            None => bad_request(format!("unknown shortcut: {name}")),
        }
    }
}

fn bad_request(message: String) -> ActionResponse {
    ActionResponse::BadRequest(PlainText(message))
}
