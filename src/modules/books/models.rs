use serde::Deserialize;

use shelf_http::error::AppError;
use shelf_store::{Book, DEFAULT_STATUS};

/// Payload accepted by `POST /api/books`.
///
/// Everything is optional at the wire level; `validate` enforces the
/// required fields and fills documented defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateBook {
    pub title: Option<String>,
    pub author: Option<String>,
    pub cover: Option<String>,
    pub rating: Option<f64>,
    pub pages: Option<u32>,
    pub genre: Option<String>,
    pub status: Option<String>,
}

/// A validated creation request with defaults applied.
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub cover: String,
    pub rating: f64,
    pub pages: u32,
    pub genre: String,
    pub status: String,
}

impl CreateBook {
    /// Fail fast on missing required fields instead of persisting
    /// empty-string records.
    pub fn validate(self) -> Result<NewBook, AppError> {
        let title = self
            .title
            .filter(|title| !title.is_empty())
            .ok_or_else(|| AppError::invalid_argument("title is required"))?;
        let author = self
            .author
            .filter(|author| !author.is_empty())
            .ok_or_else(|| AppError::invalid_argument("author is required"))?;

        Ok(NewBook {
            title,
            author,
            cover: self.cover.unwrap_or_default(),
            rating: self.rating.unwrap_or(0.0),
            pages: self.pages.unwrap_or(0),
            genre: self.genre.unwrap_or_default(),
            status: self.status.unwrap_or_else(|| DEFAULT_STATUS.to_string()),
        })
    }
}

/// Payload accepted by `PUT /api/books/{id}`; absent fields are left
/// unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub cover: Option<String>,
    pub rating: Option<f64>,
    pub pages: Option<u32>,
    pub genre: Option<String>,
    pub status: Option<String>,
}

impl BookPatch {
    pub fn apply(self, book: &mut Book) {
        if let Some(title) = self.title {
            book.title = title;
        }
        if let Some(author) = self.author {
            book.author = author;
        }
        if let Some(cover) = self.cover {
            book.cover = cover;
        }
        if let Some(rating) = self.rating {
            book.rating = rating;
        }
        if let Some(pages) = self.pages {
            book.pages = pages;
        }
        if let Some(genre) = self.genre {
            book.genre = genre;
        }
        if let Some(status) = self.status {
            book.status = status;
        }
    }
}

/// Raw query parameters accepted by `GET /api/books`.
///
/// `minRating` stays a string here so a malformed value can surface as an
/// invalid-argument error rather than a generic extractor rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BookQuery {
    pub search: Option<String>,
    pub genre: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "minRating")]
    pub min_rating: Option<String>,
}
