mod common;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use common::{GutendexStub, StubPage};
use gutendex_shelf::{
    catalog::PageCache,
    catalog_client::GutendexClient,
    storage::{KeyValueStore, SqliteKvStore},
    view::ViewController,
    web::{self, Session},
};
use poem::{Route, http::StatusCode, test::TestClient};
use serde_json::Value;

struct Harness {
    stub: GutendexStub,
    storage: Arc<dyn KeyValueStore>,
    session: Arc<Session>,
}

impl Harness {
    async fn start(pages: Vec<(u32, StubPage)>) -> anyhow::Result<Self> {
        let storage: Arc<dyn KeyValueStore> =
            Arc::new(SqliteKvStore::connect("sqlite::memory:").await?);
        Self::with_storage(pages, storage).await
    }

    async fn with_storage(
        pages: Vec<(u32, StubPage)>,
        storage: Arc<dyn KeyValueStore>,
    ) -> anyhow::Result<Self> {
        let stub = GutendexStub::spawn(pages.into_iter().collect::<HashMap<_, _>>());
        let client = GutendexClient::new(&stub.base_url)?;
        let controller = ViewController::init(Arc::clone(&storage), PageCache::default()).await;
        let session = Session::new(controller, Arc::new(client), Duration::from_millis(200));
        session.start().await;
        Ok(Self {
            stub,
            storage,
            session,
        })
    }

    fn client(&self) -> TestClient<Route> {
        TestClient::new(Route::new().nest(
            "/",
            web::api_service(Arc::clone(&self.session), "http://localhost:3000"),
        ))
    }
}

fn two_pages() -> Vec<(u32, StubPage)> {
    vec![
        (
            1,
            StubPage::Books {
                count: 40,
                ids: (1..=32).collect(),
            },
        ),
        (
            2,
            StubPage::Books {
                count: 40,
                ids: (33..=40).collect(),
            },
        ),
    ]
}

async fn text(resp: poem::test::TestResponse) -> String {
    resp.0.into_body().into_string().await.expect("utf-8 body")
}

async fn json(resp: poem::test::TestResponse) -> Value {
    serde_json::from_str(&text(resp).await).expect("json body")
}

#[tokio::test]
async fn home_page_lists_the_first_catalog_page() -> anyhow::Result<()> {
    let harness = Harness::start(two_pages()).await?;
    let cli = harness.client();

    let resp = cli.get("/").send().await;
    resp.assert_status_is_ok();
    let html = text(resp).await;
    assert!(html.contains("data-view=\"list\""));
    assert_eq!(html.matches("class=\"book-card\"").count(), 32);
    assert!(html.contains("Load more books"));
    assert_eq!(harness.stub.requests(), ["/books/?page=1"]);
    Ok(())
}

#[tokio::test]
async fn load_more_appends_and_page_size_repaginates() -> anyhow::Result<()> {
    let harness = Harness::start(two_pages()).await?;
    let cli = harness.client();

    let resp = cli.get("/actions/load-more").send().await;
    resp.assert_status(StatusCode::SEE_OTHER);
    resp.assert_header("location", "/");

    let resp = cli.get("/actions/page-size").query("size", &"16").send().await;
    resp.assert_status(StatusCode::SEE_OTHER);
    let resp = cli.get("/actions/page/3").send().await;
    resp.assert_status(StatusCode::SEE_OTHER);

    let page = json(cli.get("/api/books").send().await).await;
    assert_eq!(page["total_loaded"], 40);
    assert_eq!(page["total_pages"], 3);
    assert_eq!(page["page"], 3);
    assert_eq!(page["page_size"], 16);
    assert_eq!(page["has_more"], false);
    assert_eq!(page["books"].as_array().map(Vec::len), Some(8));
    assert_eq!(page["books"][0]["id"], 33);

    assert_eq!(
        harness.storage.get("booksPerPage").await?.as_deref(),
        Some("16")
    );
    Ok(())
}

#[tokio::test]
async fn unsupported_page_size_is_rejected() -> anyhow::Result<()> {
    let harness = Harness::start(two_pages()).await?;
    let cli = harness.client();

    let resp = cli.get("/actions/page-size").query("size", &"20").send().await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    let page = json(cli.get("/api/books").send().await).await;
    assert_eq!(page["page_size"], 32);
    Ok(())
}

#[tokio::test]
async fn search_and_genre_filters_narrow_the_list() -> anyhow::Result<()> {
    let harness = Harness::start(vec![(
        1,
        StubPage::Books {
            count: 3,
            ids: vec![11, 84, 1342],
        },
    )])
    .await?;
    let cli = harness.client();

    cli.get("/actions/search/submit")
        .query("q", &"WONDERLAND")
        .send()
        .await
        .assert_status(StatusCode::SEE_OTHER);
    let page = json(cli.get("/api/books").send().await).await;
    assert_eq!(page["total_matching"], 1);
    assert_eq!(page["books"][0]["title"], "Alice's Adventures in Wonderland");

    cli.get("/actions/search/submit")
        .query("q", &"")
        .send()
        .await
        .assert_status(StatusCode::SEE_OTHER);
    cli.get("/actions/genre")
        .query("genre", &"Fiction")
        .send()
        .await
        .assert_status(StatusCode::SEE_OTHER);
    let page = json(cli.get("/api/books").send().await).await;
    assert_eq!(page["total_matching"], 1);
    assert_eq!(page["books"][0]["id"], 1342);
    assert_eq!(page["genre"], "Fiction");

    assert_eq!(harness.storage.get("lastGenre").await?.as_deref(), Some("Fiction"));
    assert_eq!(harness.storage.get("lastSearch").await?.as_deref(), Some(""));
    Ok(())
}

#[tokio::test]
async fn debounced_keystrokes_apply_after_a_pause() -> anyhow::Result<()> {
    let harness = Harness::start(vec![(
        1,
        StubPage::Books {
            count: 3,
            ids: vec![11, 84, 1342],
        },
    )])
    .await?;
    let cli = harness.client();

    for q in ["p", "pr", "pride"] {
        cli.get("/actions/search")
            .query("q", &q)
            .send()
            .await
            .assert_status(StatusCode::ACCEPTED);
    }
    let page = json(cli.get("/api/books").send().await).await;
    assert_eq!(page["total_matching"], 3);

    tokio::time::sleep(Duration::from_millis(600)).await;
    let page = json(cli.get("/api/books").send().await).await;
    assert_eq!(page["search"], "pride");
    assert_eq!(page["total_matching"], 1);
    Ok(())
}

#[tokio::test]
async fn detail_wishlist_and_back_navigation() -> anyhow::Result<()> {
    let harness = Harness::start(vec![(
        1,
        StubPage::Books {
            count: 3,
            ids: vec![11, 84, 1342],
        },
    )])
    .await?;
    let cli = harness.client();

    cli.get("/actions/books/84").send().await.assert_status(StatusCode::SEE_OTHER);
    let html = text(cli.get("/").send().await).await;
    assert!(html.contains("data-view=\"detail\""));
    assert!(html.contains("<h1>Frankenstein; Or, The Modern Prometheus</h1>"));
    assert!(html.contains("<strong>Author:</strong> Shelley, Mary Wollstonecraft (1800)"));

    cli.get("/actions/wishlist/84/toggle")
        .send()
        .await
        .assert_status(StatusCode::SEE_OTHER);
    let wishlist = json(cli.get("/api/wishlist").send().await).await;
    assert_eq!(wishlist[0]["id"], 84);
    assert_eq!(wishlist[0]["wishlisted"], true);

    cli.get("/actions/key/escape").send().await.assert_status(StatusCode::SEE_OTHER);
    let html = text(cli.get("/").send().await).await;
    assert!(html.contains("data-view=\"list\""));
    assert!(html.contains("Wishlist (1)"));

    cli.get("/actions/show/wishlist").send().await.assert_status(StatusCode::SEE_OTHER);
    let html = text(cli.get("/").send().await).await;
    assert!(html.contains("data-view=\"wishlist\""));
    assert!(html.contains("Frankenstein"));

    cli.get("/actions/show/nowhere").send().await.assert_status(StatusCode::BAD_REQUEST);
    cli.get("/actions/key/f5").send().await.assert_status(StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn wishlist_and_preferences_survive_a_restart() -> anyhow::Result<()> {
    let first = Harness::start(vec![(
        1,
        StubPage::Books {
            count: 3,
            ids: vec![11, 84, 1342],
        },
    )])
    .await?;
    let cli = first.client();
    cli.get("/actions/wishlist/11/toggle").send().await.assert_status(StatusCode::SEE_OTHER);
    cli.get("/actions/page-size").query("size", &"48").send().await.assert_status(StatusCode::SEE_OTHER);
    cli.get("/actions/search/submit").query("q", &"alice").send().await.assert_status(StatusCode::SEE_OTHER);

    // Catalog is down on the second run; the wishlist still comes from storage.
    let second = Harness::with_storage(vec![(1, StubPage::Status(503))], Arc::clone(&first.storage)).await?;
    let cli = second.client();

    let wishlist = json(cli.get("/api/wishlist").send().await).await;
    assert_eq!(wishlist[0]["title"], "Alice's Adventures in Wonderland");

    let page = json(cli.get("/api/books").send().await).await;
    assert_eq!(page["page_size"], 48);
    assert_eq!(page["search"], "alice");
    assert!(page["error"].as_str().is_some_and(|e| e.starts_with("Failed to load books")));

    let html = text(cli.get("/").send().await).await;
    assert!(html.contains("value=\"alice\""));
    assert!(html.contains("href=\"/actions/reload\""));

    let health = text(cli.get("/health").send().await).await;
    assert!(health.starts_with("degraded"));
    assert!(health.contains("wishlist=1"));
    Ok(())
}

#[tokio::test]
async fn reload_retries_after_a_failure() -> anyhow::Result<()> {
    let harness = Harness::start(vec![(1, StubPage::Raw("not json".into()))]).await?;
    let cli = harness.client();

    let page = json(cli.get("/api/books").send().await).await;
    assert!(page["error"].is_string());
    assert_eq!(page["total_loaded"], 0);

    cli.get("/actions/reload").send().await.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(harness.stub.requests(), ["/books/?page=1", "/books/?page=1"]);
    Ok(())
}
