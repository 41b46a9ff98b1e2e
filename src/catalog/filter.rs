use std::collections::BTreeSet;

use crate::domain::{Book, mapping::genre_token};

/// Genre tokens this long are almost always malformed subject strings.
const MAX_GENRE_LEN: usize = 50;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub search: String,
    pub genre: String,
}

impl FilterState {
    pub fn new(search: impl Into<String>, genre: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            genre: genre.into(),
        }
    }

    /// Case-insensitive substring match on title or any author, and prefix
    /// match of the genre against any subject's genre token.
    pub fn matches(&self, book: &Book) -> bool {
        Matcher::new(self).matches(book)
    }

    pub fn apply(&self, books: &[Book]) -> Vec<Book> {
        let matcher = Matcher::new(self);
        books
            .iter()
            .filter(|b| matcher.matches(b))
            .cloned()
            .collect()
    }
}

struct Matcher {
    search: String,
    genre: String,
}

impl Matcher {
    fn new(filter: &FilterState) -> Self {
        Self {
            search: filter.search.trim().to_lowercase(),
            genre: filter.genre.to_lowercase(),
        }
    }

    fn matches(&self, book: &Book) -> bool {
        let search_ok = self.search.is_empty()
            || book.title.to_lowercase().contains(&self.search)
            || book
                .authors
                .iter()
                .any(|a| a.name.to_lowercase().contains(&self.search));
        let genre_ok = self.genre.is_empty()
            || book
                .subjects
                .iter()
                .any(|s| genre_token(s).to_lowercase().starts_with(&self.genre));
        search_ok && genre_ok
    }
}

/// Sorted, de-duplicated genre tokens across `books`.
pub fn available_genres(books: &[Book]) -> Vec<String> {
    books
        .iter()
        .flat_map(|b| b.subjects.iter())
        .map(|s| genre_token(s))
        .filter(|g| !g.is_empty() && g.chars().count() < MAX_GENRE_LEN)
        .map(str::to_owned)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
