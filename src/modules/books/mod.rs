pub mod filter;
pub mod models;
pub mod service;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::json;

use shelf_http::error::AppError;
use shelf_kernel::{settings::Settings, InitCtx, Module};
use shelf_store::{Book, BookStore};

use self::filter::BookFilter;
use self::models::{BookPatch, BookQuery, CreateBook};
use self::service::BookService;

/// Books module: CRUD over the flat-file collection
pub struct BooksModule {
    service: Arc<BookService>,
}

impl BooksModule {
    pub fn new(store: BookStore) -> Self {
        Self {
            service: Arc::new(BookService::new(store)),
        }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let count = self.service.load()?;
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            count,
            "book collection loaded"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(list_books).post(create_book))
            .route("/{id}", get(get_book).put(update_book).delete(delete_book))
            .with_state(self.service.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "parameters": [
                            {
                                "name": "search",
                                "in": "query",
                                "required": false,
                                "schema": { "type": "string" },
                                "description": "Case-insensitive substring match on title or author"
                            },
                            {
                                "name": "genre",
                                "in": "query",
                                "required": false,
                                "schema": { "type": "string" },
                                "description": "Exact genre match; 'all' disables the filter"
                            },
                            {
                                "name": "status",
                                "in": "query",
                                "required": false,
                                "schema": { "type": "string" },
                                "description": "Exact status match; 'all' disables the filter"
                            },
                            {
                                "name": "minRating",
                                "in": "query",
                                "required": false,
                                "schema": { "type": "number" },
                                "description": "Minimum rating, inclusive"
                            }
                        ],
                        "responses": {
                            "200": {
                                "description": "Filtered list of books",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/Book" }
                                        }
                                    }
                                }
                            },
                            "400": {
                                "description": "Malformed filter parameter",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    },
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/CreateBook" }
                                }
                            }
                        },
                        "responses": {
                            "201": {
                                "description": "Created book",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Book" }
                                    }
                                }
                            },
                            "400": {
                                "description": "Missing required field",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get a book by id",
                        "tags": ["Books"],
                        "parameters": [
                            {
                                "name": "id",
                                "in": "path",
                                "required": true,
                                "schema": { "type": "integer" }
                            }
                        ],
                        "responses": {
                            "200": {
                                "description": "The book",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Book" }
                                    }
                                }
                            },
                            "404": {
                                "description": "No book with this id",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    },
                    "put": {
                        "summary": "Partially update a book",
                        "tags": ["Books"],
                        "parameters": [
                            {
                                "name": "id",
                                "in": "path",
                                "required": true,
                                "schema": { "type": "integer" }
                            }
                        ],
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/BookPatch" }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "Updated book",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Book" }
                                    }
                                }
                            },
                            "404": {
                                "description": "No book with this id",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "parameters": [
                            {
                                "name": "id",
                                "in": "path",
                                "required": true,
                                "schema": { "type": "integer" }
                            }
                        ],
                        "responses": {
                            "200": {
                                "description": "The deleted book",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Book" }
                                    }
                                }
                            },
                            "404": {
                                "description": "No book with this id",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer" },
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "cover": { "type": "string" },
                            "rating": { "type": "number" },
                            "pages": { "type": "integer" },
                            "genre": { "type": "string" },
                            "status": { "type": "string" }
                        },
                        "required": ["id", "title", "author", "cover", "rating", "pages", "genre", "status"]
                    },
                    "CreateBook": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "cover": { "type": "string" },
                            "rating": { "type": "number" },
                            "pages": { "type": "integer" },
                            "genre": { "type": "string" },
                            "status": { "type": "string" }
                        },
                        "required": ["title", "author"]
                    },
                    "BookPatch": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "cover": { "type": "string" },
                            "rating": { "type": "number" },
                            "pages": { "type": "integer" },
                            "genre": { "type": "string" },
                            "status": { "type": "string" }
                        }
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// List books matching the query filters
async fn list_books(
    State(service): State<Arc<BookService>>,
    Query(query): Query<BookQuery>,
) -> Result<Json<Vec<Book>>, AppError> {
    let filter = BookFilter::from_query(&query)?;
    Ok(Json(service.list(&filter)))
}

/// Create a book from the JSON body
async fn create_book(
    State(service): State<Arc<BookService>>,
    Json(payload): Json<CreateBook>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let book = service.create(payload.validate()?)?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Get a book by id
async fn get_book(
    State(service): State<Arc<BookService>>,
    Path(id): Path<u64>,
) -> Result<Json<Book>, AppError> {
    Ok(Json(service.get(id)?))
}

/// Partially update a book by id
async fn update_book(
    State(service): State<Arc<BookService>>,
    Path(id): Path<u64>,
    Json(patch): Json<BookPatch>,
) -> Result<Json<Book>, AppError> {
    Ok(Json(service.update(id, patch)?))
}

/// Delete a book by id
async fn delete_book(
    State(service): State<Arc<BookService>>,
    Path(id): Path<u64>,
) -> Result<Json<Book>, AppError> {
    Ok(Json(service.delete(id)?))
}

/// Create a new instance of the books module backed by the configured
/// collection file
pub fn create_module(settings: &Settings) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(BookStore::new(
        &settings.storage.data_file,
    )))
}
