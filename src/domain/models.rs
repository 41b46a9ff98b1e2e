// Domain models shared by the catalog, the wishlist snapshots and the views.
// Field names follow the Gutendex payload so a stored snapshot decodes with the
// same derive as a fresh API result.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Person {
    pub name: String,
    #[serde(default)]
    pub birth_year: Option<i32>,
    #[serde(default)]
    pub death_year: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: u64,
    pub title: String,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub authors: Vec<Person>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub translators: Vec<Person>,
    /// Free-text subjects; the segment before ` -- ` is the genre token
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub subjects: Vec<String>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub bookshelves: Vec<String>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub languages: Vec<String>,
    #[serde(default)]
    pub copyright: Option<bool>,
    #[serde(default)]
    pub media_type: Option<String>,
    /// Content type -> URL
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub formats: BTreeMap<String, String>,
    #[serde(default)]
    pub download_count: u64,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub summaries: Vec<String>,
}

// Books are identified by id alone; metadata may differ between snapshots.
impl PartialEq for Book {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Book {}

/// Download formats offered on the detail page, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadFormat {
    Html,
    Epub,
    Kindle,
    PlainText,
}

impl DownloadFormat {
    pub const ALL: [DownloadFormat; 4] = [
        DownloadFormat::Html,
        DownloadFormat::Epub,
        DownloadFormat::Kindle,
        DownloadFormat::PlainText,
    ];

    pub fn content_type(self) -> &'static str {
        match self {
            DownloadFormat::Html => "text/html",
            DownloadFormat::Epub => "application/epub+zip",
            DownloadFormat::Kindle => "application/x-mobipocket-ebook",
            DownloadFormat::PlainText => "text/plain; charset=us-ascii",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DownloadFormat::Html => "Read Online (HTML)",
            DownloadFormat::Epub => "EPUB",
            DownloadFormat::Kindle => "Kindle",
            DownloadFormat::PlainText => "Plain Text",
        }
    }

    pub fn is_primary(self) -> bool {
        matches!(self, DownloadFormat::Html)
    }
}

/// Internal serde helpers
pub mod de {
    use serde::{Deserialize, Deserializer};

    /// Treat an explicit `null` like a missing field.
    pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + Default,
    {
        Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn book_deserialize_gutendex_example() {
        let json = r#"{
            "id": 11,
            "title": "Alice's Adventures in Wonderland",
            "authors": [{ "name": "Carroll, Lewis", "birth_year": 1832, "death_year": 1898 }],
            "summaries": ["A young girl named Alice falls down a rabbit hole."],
            "translators": [],
            "subjects": ["Alice (Fictitious character from Carroll) -- Juvenile fiction", "Fantasy fiction"],
            "bookshelves": ["Children's Literature"],
            "languages": ["en"],
            "copyright": false,
            "media_type": "Text",
            "formats": {
                "text/html": "https://www.gutenberg.org/ebooks/11.html.images",
                "application/epub+zip": "https://www.gutenberg.org/ebooks/11.epub3.images",
                "image/jpeg": "https://www.gutenberg.org/cache/epub/11/pg11.cover.medium.jpg"
            },
            "download_count": 30518
        }"#;

        let book: Book = serde_json::from_str(json).unwrap();
        assert_eq!(book.id, 11);
        assert_eq!(book.authors[0].birth_year, Some(1832));
        assert_eq!(book.subjects.len(), 2);
        assert_eq!(book.copyright, Some(false));
        assert_eq!(book.download_count, 30518);
        assert_eq!(
            book.formats.get("text/html").map(String::as_str),
            Some("https://www.gutenberg.org/ebooks/11.html.images")
        );
    }

    #[test]
    fn null_and_missing_collections_default_to_empty() {
        let json = r#"{ "id": 7, "title": "Untitled", "summaries": null, "authors": null, "copyright": null }"#;
        let book: Book = serde_json::from_str(json).unwrap();
        assert!(book.summaries.is_empty());
        assert!(book.authors.is_empty());
        assert!(book.formats.is_empty());
        assert_eq!(book.copyright, None);
    }

    #[test]
    fn equality_uses_id_only() {
        let a: Book = serde_json::from_str(r#"{ "id": 1, "title": "First edition" }"#).unwrap();
        let b: Book = serde_json::from_str(r#"{ "id": 1, "title": "Second edition" }"#).unwrap();
        let c: Book = serde_json::from_str(r#"{ "id": 2, "title": "First edition" }"#).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
