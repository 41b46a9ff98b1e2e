// Mapping from a Book to the display values the views need

use super::models::{Book, DownloadFormat};

pub const GENRE_SEPARATOR: &str = " -- ";
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";
pub const DEFAULT_GENRE: &str = "General";
pub const PLACEHOLDER_COVER: &str =
    "https://via.placeholder.com/300x400/667eea/ffffff?text=No+Cover";
const COVER_CONTENT_TYPE: &str = "image/jpeg";

/// The coarse genre label of a subject: everything before the first ` -- `.
pub fn genre_token(subject: &str) -> &str {
    subject
        .split(GENRE_SEPARATOR)
        .next()
        .unwrap_or(subject)
        .trim()
}

pub fn primary_genre(book: &Book) -> &str {
    book.subjects
        .first()
        .map(|s| genre_token(s))
        .unwrap_or(DEFAULT_GENRE)
}

pub fn primary_author(book: &Book) -> &str {
    book.authors
        .first()
        .map(|a| a.name.as_str())
        .unwrap_or(UNKNOWN_AUTHOR)
}

/// " (1832-1898)" style suffix for the first author, empty without a birth year.
pub fn author_lifespan(book: &Book) -> String {
    let Some(author) = book.authors.first() else {
        return String::new();
    };
    match (author.birth_year, author.death_year) {
        (Some(born), Some(died)) => format!(" ({born}-{died})"),
        (Some(born), None) => format!(" ({born})"),
        _ => String::new(),
    }
}

pub fn cover_url(book: &Book) -> &str {
    book.formats
        .get(COVER_CONTENT_TYPE)
        .map(String::as_str)
        .unwrap_or(PLACEHOLDER_COVER)
}

pub fn summary(book: &Book) -> &str {
    book.summaries
        .first()
        .map(String::as_str)
        .unwrap_or("No summary available for this book.")
}

/// Download links available for the book, in display order.
pub fn download_links(book: &Book) -> Vec<(DownloadFormat, &str)> {
    DownloadFormat::ALL
        .into_iter()
        .filter_map(|format| {
            book.formats
                .get(format.content_type())
                .map(|url| (format, url.as_str()))
        })
        .collect()
}

pub fn languages_label(book: &Book) -> String {
    book.languages.join(", ").to_uppercase()
}

pub fn copyright_label(book: &Book) -> &'static str {
    if book.copyright == Some(true) {
        "Yes"
    } else {
        "No (Public Domain)"
    }
}

/// 1234567 -> "1,234,567"
pub fn grouped_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
