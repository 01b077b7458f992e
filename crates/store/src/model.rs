use serde::{Deserialize, Serialize};

/// A single book record as persisted in the collection file.
///
/// Optional fields fall back to their documented defaults when absent from
/// the file, so hand-edited or older collections still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Unique identifier, assigned at creation time
    pub id: u64,
    /// Title of the book
    pub title: String,
    /// Author of the book
    pub author: String,
    /// Cover image URL
    #[serde(default)]
    pub cover: String,
    /// Rating, conventionally 0-5 but not enforced
    #[serde(default)]
    pub rating: f64,
    /// Number of pages
    #[serde(default)]
    pub pages: u32,
    /// Genre label
    #[serde(default)]
    pub genre: String,
    /// Reading status: `want-to-read`, `reading`, or `read` by convention
    #[serde(default = "default_status")]
    pub status: String,
}

/// Status assigned to newly created books when the caller supplies none.
pub const DEFAULT_STATUS: &str = "want-to-read";

pub(crate) fn default_status() -> String {
    DEFAULT_STATUS.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_fields_default_when_absent() {
        let book: Book =
            serde_json::from_str(r#"{"id": 1, "title": "Dune", "author": "Herbert"}"#).unwrap();

        assert_eq!(book.cover, "");
        assert_eq!(book.rating, 0.0);
        assert_eq!(book.pages, 0);
        assert_eq!(book.genre, "");
        assert_eq!(book.status, "want-to-read");
    }

    #[test]
    fn full_record_round_trips() {
        let book = Book {
            id: 7,
            title: "Dune".to_string(),
            author: "Herbert".to_string(),
            cover: "https://covers.example/dune.jpg".to_string(),
            rating: 5.0,
            pages: 412,
            genre: "scifi".to_string(),
            status: "read".to_string(),
        };

        let raw = serde_json::to_string(&book).unwrap();
        let parsed: Book = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, book);
    }
}
