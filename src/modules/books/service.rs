use std::sync::{Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use shelf_http::error::AppError;
use shelf_store::{Book, BookStore, StoreError};

use super::filter::BookFilter;
use super::models::{BookPatch, NewBook};

#[derive(Debug, Error)]
pub enum BookServiceError {
    #[error("Book not found")]
    NotFound { id: u64 },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<BookServiceError> for AppError {
    fn from(err: BookServiceError) -> Self {
        match err {
            BookServiceError::NotFound { .. } => AppError::not_found("Book not found"),
            BookServiceError::Store(err) => AppError::Internal(err.into()),
        }
    }
}

struct Collection {
    books: Vec<Book>,
    next_id: u64,
}

/// CRUD over the book collection.
///
/// The in-memory collection is the single source of truth for the lifetime
/// of the process; every mutation persists the full collection before it is
/// considered committed, and rolls back on a persistence failure. The lock
/// serializes the whole read-modify-persist sequence, so concurrent
/// mutations cannot lose updates or double-assign ids.
pub struct BookService {
    store: BookStore,
    collection: Mutex<Collection>,
}

impl BookService {
    pub fn new(store: BookStore) -> Self {
        Self {
            store,
            collection: Mutex::new(Collection {
                books: Vec::new(),
                next_id: 1,
            }),
        }
    }

    // Rollback-on-failure keeps the guarded state consistent, so a lock
    // poisoned by a panicking peer is still safe to reuse.
    fn lock(&self) -> MutexGuard<'_, Collection> {
        self.collection
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Seed the in-memory collection from the store.
    ///
    /// The id counter resumes above the highest persisted id, never from the
    /// collection length, so deletions cannot lead to id collisions.
    pub fn load(&self) -> Result<usize, StoreError> {
        let books = self.store.load()?;
        let mut collection = self.lock();
        collection.next_id = books.iter().map(|book| book.id).max().map_or(1, |id| id + 1);
        collection.books = books;
        Ok(collection.books.len())
    }

    /// Filtered view of the collection, in insertion order. Never mutates.
    pub fn list(&self, filter: &BookFilter) -> Vec<Book> {
        self.lock()
            .books
            .iter()
            .filter(|book| filter.matches(book))
            .cloned()
            .collect()
    }

    pub fn get(&self, id: u64) -> Result<Book, BookServiceError> {
        self.lock()
            .books
            .iter()
            .find(|book| book.id == id)
            .cloned()
            .ok_or(BookServiceError::NotFound { id })
    }

    /// Append a new record and persist the collection.
    pub fn create(&self, new: NewBook) -> Result<Book, BookServiceError> {
        let mut collection = self.lock();

        let book = Book {
            id: collection.next_id,
            title: new.title,
            author: new.author,
            cover: new.cover,
            rating: new.rating,
            pages: new.pages,
            genre: new.genre,
            status: new.status,
        };

        collection.books.push(book.clone());
        if let Err(err) = self.store.save(&collection.books) {
            collection.books.pop();
            return Err(err.into());
        }
        collection.next_id += 1;

        Ok(book)
    }

    /// Partial update: fields absent from the patch are left unchanged.
    pub fn update(&self, id: u64, patch: BookPatch) -> Result<Book, BookServiceError> {
        let mut collection = self.lock();

        let index = collection
            .books
            .iter()
            .position(|book| book.id == id)
            .ok_or(BookServiceError::NotFound { id })?;

        let previous = collection.books[index].clone();
        patch.apply(&mut collection.books[index]);

        if let Err(err) = self.store.save(&collection.books) {
            collection.books[index] = previous;
            return Err(err.into());
        }

        Ok(collection.books[index].clone())
    }

    /// Remove a record, persist, and return the removed record.
    pub fn delete(&self, id: u64) -> Result<Book, BookServiceError> {
        let mut collection = self.lock();

        let index = collection
            .books
            .iter()
            .position(|book| book.id == id)
            .ok_or(BookServiceError::NotFound { id })?;

        let removed = collection.books.remove(index);
        if let Err(err) = self.store.save(&collection.books) {
            collection.books.insert(index, removed);
            return Err(err.into());
        }

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::books::models::{BookQuery, CreateBook};

    fn service(dir: &std::path::Path) -> BookService {
        BookService::new(BookStore::new(dir.join("books.json")))
    }

    fn new_book(title: &str, author: &str) -> NewBook {
        CreateBook {
            title: Some(title.to_string()),
            author: Some(author.to_string()),
            ..CreateBook::default()
        }
        .validate()
        .unwrap()
    }

    #[test]
    fn create_assigns_sequential_ids() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path());

        let first = service.create(new_book("Dune", "Herbert")).unwrap();
        let second = service.create(new_book("Hyperion", "Simmons")).unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[test]
    fn get_returns_the_created_record() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path());

        let created = service.create(new_book("Dune", "Herbert")).unwrap();
        assert_eq!(service.get(created.id).unwrap(), created);
    }

    #[test]
    fn get_missing_id_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path());

        assert!(matches!(
            service.get(42),
            Err(BookServiceError::NotFound { id: 42 })
        ));
    }

    #[test]
    fn list_without_criteria_returns_insertion_order() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path());

        let first = service.create(new_book("Dune", "Herbert")).unwrap();
        let second = service.create(new_book("Hyperion", "Simmons")).unwrap();

        let filter = BookFilter::from_query(&BookQuery::default()).unwrap();
        assert_eq!(service.list(&filter), vec![first, second]);
    }

    #[test]
    fn update_changes_only_patched_fields() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path());

        let created = service.create(new_book("Dune", "Herbert")).unwrap();
        let updated = service
            .update(
                created.id,
                BookPatch {
                    rating: Some(4.5),
                    ..BookPatch::default()
                },
            )
            .unwrap();

        assert_eq!(updated.rating, 4.5);
        assert_eq!(
            updated,
            Book {
                rating: 4.5,
                ..created
            }
        );
    }

    #[test]
    fn update_missing_id_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path());

        assert!(matches!(
            service.update(7, BookPatch::default()),
            Err(BookServiceError::NotFound { id: 7 })
        ));
    }

    #[test]
    fn delete_returns_record_and_second_delete_fails() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path());

        let created = service.create(new_book("Dune", "Herbert")).unwrap();

        let removed = service.delete(created.id).unwrap();
        assert_eq!(removed, created);
        assert!(matches!(
            service.get(created.id),
            Err(BookServiceError::NotFound { .. })
        ));
        assert!(matches!(
            service.delete(created.id),
            Err(BookServiceError::NotFound { .. })
        ));
    }

    #[test]
    fn create_after_delete_never_reuses_a_live_id() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path());

        let first = service.create(new_book("Dune", "Herbert")).unwrap();
        let second = service.create(new_book("Hyperion", "Simmons")).unwrap();
        service.delete(first.id).unwrap();

        let third = service.create(new_book("Ubik", "Dick")).unwrap();
        assert_ne!(third.id, second.id);
        assert_eq!(third.id, 3);
    }

    #[test]
    fn mutations_survive_a_reload() {
        let dir = tempfile::tempdir().unwrap();

        let created = {
            let service = service(dir.path());
            service.create(new_book("Dune", "Herbert")).unwrap()
        };

        let reopened = service(dir.path());
        assert_eq!(reopened.load().unwrap(), 1);
        assert_eq!(reopened.get(created.id).unwrap(), created);
    }

    #[test]
    fn id_counter_resumes_above_highest_persisted_id() {
        let dir = tempfile::tempdir().unwrap();

        {
            let service = service(dir.path());
            service.create(new_book("Dune", "Herbert")).unwrap();
            service.create(new_book("Hyperion", "Simmons")).unwrap();
            service.delete(1).unwrap();
        }

        let reopened = service(dir.path());
        reopened.load().unwrap();
        let created = reopened.create(new_book("Ubik", "Dick")).unwrap();
        assert_eq!(created.id, 3);
    }

    #[test]
    fn failed_persist_rolls_back_the_mutation() {
        let dir = tempfile::tempdir().unwrap();
        // Parent directory does not exist, so every save fails.
        let service = BookService::new(BookStore::new(
            dir.path().join("missing").join("books.json"),
        ));

        assert!(matches!(
            service.create(new_book("Dune", "Herbert")),
            Err(BookServiceError::Store(_))
        ));

        let filter = BookFilter::from_query(&BookQuery::default()).unwrap();
        assert!(service.list(&filter).is_empty());
    }
}
