use std::{path::Path, sync::Arc};

use anyhow::Context;
use chrono::TimeDelta;
use gutendex_shelf::{
    catalog::PageCache,
    catalog_client::GutendexClient,
    config::Config,
    storage::SqliteKvStore,
    view::ViewController,
    web::{self, Session},
};
use poem::{
    EndpointExt, Route, Server,
    listener::TcpListener,
    middleware::Tracing as PoemTracing,
};
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt::SubscriberBuilder, prelude::*};

type ShelfResult<T> = anyhow::Result<T>;

#[tokio::main]
async fn main() -> ShelfResult<()> {
    // Respect RUST_LOG if set, default to info for our crate and warn for deps.
    let default_filter = format!(
        "{}=info,poem=info,reqwest=warn,sea_orm=warn",
        env!("CARGO_PKG_NAME")
    );
    let env_filter = std::env::var("RUST_LOG").unwrap_or(default_filter);
    SubscriberBuilder::default()
        .with_env_filter(EnvFilter::new(env_filter))
        .with_target(false)
        .with_level(true)
        .pretty()
        .finish()
        .with(ErrorLayer::default())
        .init();
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "starting Gutendex Shelf"
    );
    if Path::new(".env.local").exists() {
        dotenvy::from_filename(".env.local")?;
    } else if Path::new(".env").exists() {
        dotenvy::from_filename(".env")?;
    };
    let config = Config::load()?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    let storage = SqliteKvStore::connect(&config.db_connection_string)
        .await
        .with_context(|| "Failed to open the key-value store")?;

    let client = GutendexClient::new(&config.catalog_base_url)?;
    tracing::info!(catalog_base = %client.base_url(), "configured catalog client");

    let ttl = TimeDelta::from_std(config.cache_ttl).with_context(|| "CACHE_TTL_SECS out of range")?;
    let controller = ViewController::init(Arc::new(storage), PageCache::new(ttl)).await;
    let session = Session::new(controller, Arc::new(client), config.search_debounce);
    session.spawn_start();

    run_poem(session, &config).await
}

pub async fn run_poem(session: Arc<Session>, config: &Config) -> ShelfResult<()> {
    let server_url = format!("http://{}", config.bind_addr);
    let api_service = web::api_service(session, &server_url);
    let ui = api_service.rapidoc();
    let spec = api_service.spec();
    let route = Route::new()
        .nest("/", api_service)
        .nest("/ui", ui)
        .nest("/spec", poem::endpoint::make_sync(move |_| spec.clone()))
        .with(PoemTracing);

    tracing::info!(bind_addr = %config.bind_addr, "open {server_url}/ in a browser");
    Server::new(TcpListener::bind(config.bind_addr.as_str()))
        .run(route)
        .await?;
    Ok(())
}
