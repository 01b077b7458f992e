use shelf_http::error::AppError;
use shelf_store::Book;

use super::models::BookQuery;

/// Sentinel query value meaning "do not filter on this field".
const NO_FILTER: &str = "all";

/// Conjunction of the optional list filters: every supplied criterion must
/// hold for a book to pass.
#[derive(Debug, Clone, Default)]
pub struct BookFilter {
    search: Option<String>,
    genre: Option<String>,
    status: Option<String>,
    min_rating: Option<f64>,
}

impl BookFilter {
    /// Build a filter from raw query parameters.
    ///
    /// An empty `search` and the `all` sentinel on `genre`/`status` disable
    /// the respective criterion. A non-numeric `minRating` is an invalid
    /// argument.
    pub fn from_query(query: &BookQuery) -> Result<Self, AppError> {
        let search = query
            .search
            .as_deref()
            .filter(|search| !search.is_empty())
            .map(str::to_lowercase);
        let genre = query.genre.clone().filter(|genre| genre != NO_FILTER);
        let status = query.status.clone().filter(|status| status != NO_FILTER);
        let min_rating = query
            .min_rating
            .as_deref()
            .map(|raw| {
                raw.parse::<f64>().map_err(|_| {
                    AppError::invalid_argument(format!("minRating must be a number, got '{raw}'"))
                })
            })
            .transpose()?;

        Ok(Self {
            search,
            genre,
            status,
            min_rating,
        })
    }

    /// True when the book satisfies every supplied criterion.
    pub fn matches(&self, book: &Book) -> bool {
        if let Some(needle) = &self.search {
            if !book.title.to_lowercase().contains(needle)
                && !book.author.to_lowercase().contains(needle)
            {
                return false;
            }
        }

        if let Some(genre) = &self.genre {
            if book.genre != *genre {
                return false;
            }
        }

        if let Some(status) = &self.status {
            if book.status != *status {
                return false;
            }
        }

        if let Some(min_rating) = self.min_rating {
            if book.rating < min_rating {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dune() -> Book {
        Book {
            id: 1,
            title: "Dune".to_string(),
            author: "Herbert".to_string(),
            cover: String::new(),
            rating: 5.0,
            pages: 412,
            genre: "scifi".to_string(),
            status: "read".to_string(),
        }
    }

    fn filter(query: BookQuery) -> BookFilter {
        BookFilter::from_query(&query).unwrap()
    }

    #[test]
    fn empty_query_matches_everything() {
        assert!(filter(BookQuery::default()).matches(&dune()));
    }

    #[test]
    fn search_is_case_insensitive_on_title() {
        let filter = filter(BookQuery {
            search: Some("dune".to_string()),
            ..BookQuery::default()
        });

        assert!(filter.matches(&dune()));
    }

    #[test]
    fn search_matches_author_substring() {
        let filter = filter(BookQuery {
            search: Some("herb".to_string()),
            ..BookQuery::default()
        });

        assert!(filter.matches(&dune()));
    }

    #[test]
    fn search_misses_unrelated_text() {
        let filter = filter(BookQuery {
            search: Some("asimov".to_string()),
            ..BookQuery::default()
        });

        assert!(!filter.matches(&dune()));
    }

    #[test]
    fn all_sentinel_disables_genre_and_status() {
        let filter = filter(BookQuery {
            genre: Some("all".to_string()),
            status: Some("all".to_string()),
            ..BookQuery::default()
        });

        assert!(filter.matches(&dune()));
    }

    #[test]
    fn genre_is_an_exact_match() {
        let scifi = filter(BookQuery {
            genre: Some("scifi".to_string()),
            ..BookQuery::default()
        });
        let fantasy = filter(BookQuery {
            genre: Some("fantasy".to_string()),
            ..BookQuery::default()
        });

        assert!(scifi.matches(&dune()));
        assert!(!fantasy.matches(&dune()));
    }

    #[test]
    fn min_rating_is_inclusive() {
        let exactly = filter(BookQuery {
            min_rating: Some("5".to_string()),
            ..BookQuery::default()
        });
        let above = filter(BookQuery {
            min_rating: Some("6".to_string()),
            ..BookQuery::default()
        });

        assert!(exactly.matches(&dune()));
        assert!(!above.matches(&dune()));
    }

    #[test]
    fn criteria_combine_with_logical_and() {
        let filter = filter(BookQuery {
            search: Some("dune".to_string()),
            genre: Some("scifi".to_string()),
            status: Some("want-to-read".to_string()),
            ..BookQuery::default()
        });

        // search and genre match, status does not
        assert!(!filter.matches(&dune()));
    }

    #[test]
    fn malformed_min_rating_is_invalid_argument() {
        let result = BookFilter::from_query(&BookQuery {
            min_rating: Some("high".to_string()),
            ..BookQuery::default()
        });

        assert!(matches!(
            result,
            Err(AppError::InvalidArgument { .. })
        ));
    }
}
