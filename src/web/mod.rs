// Loopback HTTP surface: HTML views, view actions and a small JSON API

pub mod models;
pub mod routes;
pub mod services;
pub mod session;

use std::sync::Arc;

use poem_openapi::OpenApiService;

pub use routes::ShelfApi;
pub use session::Session;

pub fn api_service(session: Arc<Session>, server_url: &str) -> OpenApiService<ShelfApi, ()> {
    OpenApiService::new(ShelfApi { session }, "Gutendex Shelf", env!("CARGO_PKG_VERSION"))
        .server(server_url)
}
