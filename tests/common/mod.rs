// Stub Gutendex listing server for integration tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::Duration;

use serde_json::{Value, json};

/// What the stub returns for one listing page.
#[derive(Debug, Clone)]
pub enum StubPage {
    Books { count: u64, ids: Vec<u64> },
    Status(u16),
    Raw(String),
}

pub struct GutendexStub {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
    shutdown_tx: Option<mpsc::Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl GutendexStub {
    pub fn spawn(pages: HashMap<u32, StubPage>) -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start gutendex stub server");
        let addr = server.server_addr();
        let base_url = format!("http://{addr}/books/");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);

        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || {
            loop {
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }

                let request = match server.recv_timeout(Duration::from_millis(50)) {
                    Ok(Some(req)) => req,
                    Ok(None) => continue,
                    Err(_) => break,
                };

                let url = request.url().to_string();
                seen.lock().unwrap().push(url.clone());

                let page = page_param(&url);
                let response = match page.and_then(|p| pages.get(&p)) {
                    Some(StubPage::Books { count, ids }) => json_response(&listing(*count, ids)),
                    Some(StubPage::Status(code)) => {
                        tiny_http::Response::from_string("upstream trouble").with_status_code(*code)
                    }
                    Some(StubPage::Raw(body)) => tiny_http::Response::from_string(body.clone()),
                    None => tiny_http::Response::from_string("not found").with_status_code(404),
                };
                let _ = request.respond(response);
            }
        });

        Self {
            base_url,
            requests,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    /// Request URLs received so far, in order.
    #[allow(dead_code)]
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for GutendexStub {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn page_param(url: &str) -> Option<u32> {
    let (path, query) = url.split_once('?').unwrap_or((url, ""));
    if path != "/books/" {
        return None;
    }
    if query.is_empty() {
        return Some(1);
    }
    query
        .split('&')
        .find_map(|pair| pair.strip_prefix("page="))
        .and_then(|v| v.parse().ok())
}

fn json_response(body: &Value) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    let header = tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
        .expect("content-type header");
    tiny_http::Response::from_string(body.to_string()).with_header(header)
}

/// A Gutendex-shaped listing envelope for the given ids.
pub fn listing(count: u64, ids: &[u64]) -> Value {
    json!({
        "count": count,
        "next": null,
        "previous": null,
        "results": ids.iter().map(|&id| stub_book(id)).collect::<Vec<_>>(),
    })
}

pub fn stub_book(id: u64) -> Value {
    let (title, author, subject) = match id {
        11 => ("Alice's Adventures in Wonderland", "Carroll, Lewis", "Fantasy fiction"),
        84 => ("Frankenstein; Or, The Modern Prometheus", "Shelley, Mary Wollstonecraft", "Horror tales"),
        1342 => ("Pride and Prejudice", "Austen, Jane", "Fiction -- England"),
        _ => ("Untitled", "Anonymous", "Fiction -- Test"),
    };
    let title = if title == "Untitled" { format!("Book {id}") } else { title.to_owned() };
    json!({
        "id": id,
        "title": title,
        "authors": [{ "name": author, "birth_year": 1800, "death_year": null }],
        "translators": [],
        "subjects": [subject],
        "bookshelves": [],
        "languages": ["en"],
        "copyright": false,
        "media_type": "Text",
        "formats": {
            "text/html": format!("https://www.gutenberg.org/ebooks/{id}.html.images"),
            "image/jpeg": format!("https://www.gutenberg.org/cache/epub/{id}/pg{id}.cover.medium.jpg")
        },
        "download_count": id * 3
    })
}
