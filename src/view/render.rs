// HTML rendering of the controller state. Everything here is a pure function
// of its inputs: the same state always yields the same markup.

use super::controller::ViewController;
use super::navigation::View;
use crate::domain::Book;
use crate::domain::mapping::{
    author_lifespan, copyright_label, cover_url, download_links, genre_token, grouped_count,
    languages_label, primary_author, primary_genre, summary,
};
use crate::pagination::{MAX_VISIBLE_PAGES, PageLink, PageSize, page_window};

const TITLE: &str = "Online Book Reader";
const MAX_DETAIL_GENRES: usize = 5;

pub fn render(ctrl: &ViewController) -> String {
    let active = ctrl.navigation().active();
    let body = match active {
        View::List => list_view(ctrl),
        View::Wishlist => wishlist_view(ctrl),
        View::Detail(id) => match ctrl.lookup(id) {
            Some(book) => detail_view(ctrl, book),
            None => missing_book_view(id),
        },
    };
    page_shell(ctrl, active, &body)
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn page_shell(ctrl: &ViewController, active: View, body: &str) -> String {
    let nav_class = |view: View| if active == view { "nav-link active" } else { "nav-link" };
    let mut out = String::new();
    out.push_str("<!doctype html>\n<html lang=\"en\">\n<head>\n");
    out.push_str("  <meta charset=\"utf-8\">\n");
    out.push_str(&format!("  <title>{TITLE}</title>\n"));
    out.push_str(STYLE);
    out.push_str("</head>\n");
    out.push_str(&format!("<body data-view=\"{}\">\n", active.name()));
    out.push_str("<nav class=\"navbar\">\n");
    out.push_str(&format!("  <span class=\"logo\">{TITLE}</span>\n"));
    out.push_str(&format!(
        "  <a class=\"{}\" href=\"/actions/show/list\">Home</a>\n",
        nav_class(View::List)
    ));
    out.push_str(&format!(
        "  <a class=\"{}\" href=\"/actions/show/wishlist\">Wishlist ({})</a>\n",
        nav_class(View::Wishlist),
        ctrl.wishlist().len()
    ));
    out.push_str("</nav>\n<main>\n");
    out.push_str(body);
    out.push_str("</main>\n");
    out.push_str(SCRIPT);
    out.push_str("</body>\n</html>\n");
    out
}

fn list_view(ctrl: &ViewController) -> String {
    let catalog = ctrl.catalog();
    let mut out = String::from("<section id=\"home-page\" class=\"page active\">\n");

    out.push_str("<div class=\"controls\">\n");
    out.push_str(&format!(
        "  <form action=\"/actions/search/submit\" method=\"get\" role=\"search\">\n    <input id=\"search-input\" type=\"search\" name=\"q\" placeholder=\"Search by title or author\" value=\"{}\"{}>\n  </form>\n",
        escape_html(ctrl.search_draft()),
        if ctrl.focus_search() { " autofocus" } else { "" }
    ));

    out.push_str("  <form action=\"/actions/genre\" method=\"get\">\n    <select id=\"genre-filter\" name=\"genre\" onchange=\"this.form.submit()\">\n");
    let current_genre = &catalog.filter().genre;
    out.push_str(&option("", "All Genres", current_genre.is_empty()));
    for genre in catalog.available_genres() {
        let selected = &genre == current_genre;
        out.push_str(&option(&genre, &genre, selected));
    }
    out.push_str("    </select>\n    <noscript><button type=\"submit\">Filter</button></noscript>\n  </form>\n");

    out.push_str("  <form action=\"/actions/page-size\" method=\"get\">\n    <select id=\"page-select\" name=\"size\" onchange=\"this.form.submit()\">\n");
    for size in PageSize::CHOICES {
        let value = size.to_string();
        let label = format!("{size} per page");
        out.push_str(&option(&value, &label, size == ctrl.cursor().page_size()));
    }
    out.push_str("    </select>\n    <noscript><button type=\"submit\">Apply</button></noscript>\n  </form>\n");
    out.push_str("</div>\n");

    if let Some(message) = ctrl.error() {
        out.push_str(&format!(
            "<div id=\"loading\" class=\"error\"><p>&#10060; {}</p><a href=\"/actions/reload\">Try again</a></div>\n",
            escape_html(message)
        ));
    } else if catalog.is_loading() {
        out.push_str("<div id=\"loading\"><p>Loading books...</p></div>\n");
    }

    let books = ctrl.visible_books();
    if books.is_empty() {
        if !catalog.is_loading() && ctrl.error().is_none() {
            out.push_str("<div id=\"no-results\"><p>No books found. Try a different search or genre.</p></div>\n");
        }
    } else {
        out.push_str("<div id=\"books-grid\" class=\"books-grid\">\n");
        for book in books {
            out.push_str(&book_card(book, ctrl.wishlist().contains(book.id)));
        }
        out.push_str("</div>\n");
        out.push_str(&pagination(ctrl.cursor().current_page(), ctrl.total_pages()));
    }

    if catalog.has_more() {
        out.push_str(&format!(
            "<p class=\"load-more\">{} books loaded from {} of {} catalog pages. <a href=\"/actions/load-more\">Load more books</a></p>\n",
            catalog.books().len(),
            catalog.current_api_page(),
            catalog.total_api_pages()
        ));
    }
    out.push_str("</section>\n");
    out
}

fn option(value: &str, label: &str, selected: bool) -> String {
    format!(
        "      <option value=\"{}\"{}>{}</option>\n",
        escape_html(value),
        if selected { " selected" } else { "" },
        escape_html(label)
    )
}

fn book_card(book: &Book, wishlisted: bool) -> String {
    let title = escape_html(&book.title);
    let genre = escape_html(primary_genre(book));
    let (heart, hint, class) = if wishlisted {
        ("&#9829;", "Remove from wishlist", "wishlist-btn active")
    } else {
        ("&#9825;", "Add to wishlist", "wishlist-btn")
    };
    format!(
        r#"  <div class="book-card">
    <a href="/actions/books/{id}" aria-label="View details for {title}"><img src="{cover}" alt="Cover of {title}" class="book-image" loading="lazy"></a>
    <div class="book-info">
      <h3 class="book-title">{title}</h3>
      <p class="book-author">by {author}</p>
      <span class="book-genre" title="{genre}">{genre}</span>
      <div class="book-actions">
        <a class="read-btn" href="/actions/books/{id}" aria-label="Read more about {title}">Read More</a>
        <a class="{class}" href="/actions/wishlist/{id}/toggle" title="{hint}" aria-label="{hint}">{heart}</a>
      </div>
    </div>
  </div>
"#,
        id = book.id,
        cover = escape_html(cover_url(book)),
        author = escape_html(primary_author(book)),
    )
}

fn pagination(current: usize, total: usize) -> String {
    if total <= 1 {
        return String::new();
    }
    let mut out = String::from("<nav id=\"pagination\" class=\"pagination\">\n");
    out.push_str(&step_link(current > 1, current.saturating_sub(1), "&larr; Previous", "Previous page"));
    for link in page_window(total, current, MAX_VISIBLE_PAGES) {
        match link {
            PageLink::Page { number, current: true } => out.push_str(&format!(
                "  <a class=\"pagination-btn active\" href=\"/actions/page/{number}\" aria-label=\"Page {number}\" aria-current=\"page\">{number}</a>\n"
            )),
            PageLink::Page { number, current: false } => out.push_str(&format!(
                "  <a class=\"pagination-btn\" href=\"/actions/page/{number}\" aria-label=\"Page {number}\">{number}</a>\n"
            )),
            PageLink::Ellipsis => out.push_str("  <span>...</span>\n"),
        }
    }
    out.push_str(&step_link(current < total, current + 1, "Next &rarr;", "Next page"));
    out.push_str("</nav>\n");
    out
}

fn step_link(enabled: bool, target: usize, label: &str, aria: &str) -> String {
    if enabled {
        format!("  <a class=\"pagination-btn\" href=\"/actions/page/{target}\" aria-label=\"{aria}\">{label}</a>\n")
    } else {
        format!("  <span class=\"pagination-btn disabled\" aria-label=\"{aria}\" aria-disabled=\"true\">{label}</span>\n")
    }
}

fn detail_view(ctrl: &ViewController, book: &Book) -> String {
    let title = escape_html(&book.title);
    let wishlisted = ctrl.wishlist().contains(book.id);
    let (heart, hint, class) = if wishlisted {
        ("&#9829;", "Remove from wishlist", "wishlist-btn active")
    } else {
        ("&#9825;", "Add to wishlist", "wishlist-btn")
    };
    let genres = book
        .subjects
        .iter()
        .take(MAX_DETAIL_GENRES)
        .map(|s| escape_html(genre_token(s)))
        .collect::<Vec<_>>()
        .join(", ");

    let mut out = String::from("<section id=\"book-detail-page\" class=\"page active\">\n");
    out.push_str("<a class=\"back-btn\" href=\"/actions/back\">&larr; Back</a>\n");
    out.push_str("<div class=\"book-detail-content\">\n");
    out.push_str(&format!(
        "  <img src=\"{}\" alt=\"Cover of {title}\" class=\"book-detail-image\">\n",
        escape_html(cover_url(book))
    ));
    out.push_str("  <div class=\"book-detail-info\">\n");
    out.push_str(&format!("    <h1>{title}</h1>\n"));
    out.push_str(&format!(
        "    <p><strong>Author:</strong> {}{}</p>\n",
        escape_html(primary_author(book)),
        author_lifespan(book)
    ));
    out.push_str(&format!("    <p><strong>Book ID:</strong> {}</p>\n", book.id));
    out.push_str(&format!(
        "    <p><strong>Language:</strong> {}</p>\n",
        escape_html(&languages_label(book))
    ));
    out.push_str(&format!(
        "    <p><strong>Download Count:</strong> {}</p>\n",
        grouped_count(book.download_count)
    ));
    out.push_str(&format!("    <p><strong>Genres:</strong> {genres}</p>\n"));
    out.push_str(&format!(
        "    <p><strong>Copyright:</strong> {}</p>\n",
        copyright_label(book)
    ));

    out.push_str("    <div class=\"book-actions-detail\">\n");
    out.push_str(&format!(
        "      <a class=\"{class}\" href=\"/actions/wishlist/{}/toggle\" title=\"{hint}\" aria-label=\"{hint}\">{heart}</a>\n",
        book.id
    ));
    for (format, url) in download_links(book) {
        let class = if format.is_primary() { " class=\"read-btn\"" } else { "" };
        out.push_str(&format!(
            "      <a href=\"{}\" target=\"_blank\" rel=\"noopener\"{class} aria-label=\"Download {label}\">{label}</a>\n",
            escape_html(url),
            label = format.label()
        ));
    }
    out.push_str("    </div>\n");

    if book.subjects.len() > MAX_DETAIL_GENRES {
        let all = book
            .subjects
            .iter()
            .map(|s| escape_html(s))
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!(
            "    <div class=\"download-links\">\n      <h4>All Subjects:</h4>\n      <p>{all}</p>\n    </div>\n"
        ));
    }

    out.push_str(&format!(
        "    <div class=\"book-summary\">\n      <h3>Summary</h3>\n      <p>{}</p>\n    </div>\n",
        escape_html(summary(book))
    ));
    out.push_str("  </div>\n</div>\n</section>\n");
    out
}

fn missing_book_view(id: u64) -> String {
    format!(
        "<section id=\"book-detail-page\" class=\"page active\">\n<a class=\"back-btn\" href=\"/actions/back\">&larr; Back</a>\n<p>Book {id} is no longer available.</p>\n</section>\n"
    )
}

fn wishlist_view(ctrl: &ViewController) -> String {
    let mut out = String::from("<section id=\"wishlist-page\" class=\"page active\">\n<h2>My Wishlist</h2>\n");
    let books = ctrl.wishlist().all();
    if books.is_empty() {
        out.push_str("<div id=\"wishlist-empty\"><p>Your wishlist is empty. Browse the catalog and tap &#9825; to save books for later.</p></div>\n");
    } else {
        out.push_str("<div id=\"wishlist-grid\" class=\"books-grid\">\n");
        for book in books {
            out.push_str(&book_card(book, true));
        }
        out.push_str("</div>\n");
    }
    out.push_str("</section>\n");
    out
}

const STYLE: &str = r#"  <style>
    body { font-family: system-ui, sans-serif; margin: 0; background: #f5f6fa; color: #222; }
    .navbar { display: flex; gap: 1rem; align-items: center; padding: 1rem 2rem; background: #667eea; }
    .navbar a, .logo { color: #fff; text-decoration: none; }
    .nav-link.active { font-weight: bold; text-decoration: underline; }
    main { padding: 1.5rem 2rem; }
    .controls { display: flex; gap: 1rem; flex-wrap: wrap; margin-bottom: 1.5rem; }
    .books-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(200px, 1fr)); gap: 1.5rem; }
    .book-card { background: #fff; border-radius: 8px; overflow: hidden; box-shadow: 0 2px 6px rgba(0,0,0,.1); }
    .book-image { width: 100%; height: 280px; object-fit: cover; }
    .book-info { padding: .75rem; }
    .book-actions, .book-actions-detail { display: flex; gap: .75rem; align-items: center; }
    .wishlist-btn { font-size: 1.5rem; color: #e25555; text-decoration: none; }
    .pagination { display: flex; gap: .5rem; justify-content: center; margin: 2rem 0; }
    .pagination-btn.active { font-weight: bold; }
    .pagination-btn.disabled { color: #aaa; }
    .error { color: #ff6b6b; }
    .book-detail-content { display: flex; gap: 2rem; }
    .book-detail-image { width: 300px; }
  </style>
"#;

const SCRIPT: &str = r#"<script>
(function () {
  var input = document.getElementById('search-input');
  var timer = null;
  if (input) {
    input.addEventListener('input', function () {
      fetch('/actions/search?q=' + encodeURIComponent(input.value));
      clearTimeout(timer);
      timer = setTimeout(function () { window.location.assign('/'); }, 450);
    });
  }
  document.addEventListener('keydown', function (event) {
    if (event.key === 'Escape' && document.body.dataset.view === 'detail') {
      window.location.assign('/actions/key/escape');
    }
    if ((event.ctrlKey || event.metaKey) && event.key === 'f') {
      event.preventDefault();
      if (input) { input.focus(); } else { window.location.assign('/actions/key/focus-search'); }
    }
  });
})();
</script>
"#;
