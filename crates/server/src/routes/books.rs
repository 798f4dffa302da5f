use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};

use models::book;
use service::{book_service, errors::ServiceError};

use crate::errors::JsonApiError;
use crate::routes::ServerState;

fn default_pages() -> i32 {
    book::DEFAULT_PAGES
}

/// Creation payload. `pages` also accepts the legacy `count_pages` name.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct IncomingBook {
    pub title: String,
    pub author: String,
    pub year: i32,
    #[serde(default = "default_pages", alias = "count_pages")]
    pub pages: i32,
    pub seller_id: i32,
}

/// Full-replacement payload for PUT; unknown fields (e.g. `id`) are ignored.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct UpdateBook {
    pub title: String,
    pub author: String,
    pub year: i32,
    pub pages: i32,
    pub seller_id: Option<i32>,
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct BookResponse {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub year: i32,
    pub pages: i32,
    pub seller_id: Option<i32>,
}

impl From<book::Model> for BookResponse {
    fn from(m: book::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            author: m.author,
            year: m.year,
            pages: m.pages,
            seller_id: m.seller_id,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct BooksList {
    pub books: Vec<BookResponse>,
}

fn field_error(field: &str, e: models::errors::ModelError) -> serde_json::Value {
    let msg = match e {
        models::errors::ModelError::Validation(m) => m,
        other => other.to_string(),
    };
    json!({ "field": field, "error": msg })
}

impl IncomingBook {
    /// Boundary validation; failures reject the request with 422 before any
    /// service logic runs.
    fn validate(&self) -> Result<(), JsonApiError> {
        let mut errors = Vec::new();
        if let Err(e) = book::validate_title(&self.title) {
            errors.push(field_error("title", e));
        }
        if let Err(e) = book::validate_author(&self.author) {
            errors.push(field_error("author", e));
        }
        if let Err(e) = book::validate_year(self.year) {
            errors.push(field_error("year", e));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(JsonApiError::validation(errors))
        }
    }
}

#[utoipa::path(
    post, path = "/books/", tag = "books",
    request_body = IncomingBook,
    responses(
        (status = 201, description = "Created", body = BookResponse),
        (status = 400, description = "Referenced seller does not exist"),
        (status = 422, description = "Validation Error")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<IncomingBook>,
) -> Result<(StatusCode, Json<BookResponse>), JsonApiError> {
    input.validate()?;

    match book_service::create_book(
        &state.db,
        &input.title,
        &input.author,
        input.year,
        input.pages,
        Some(input.seller_id),
    )
    .await
    {
        Ok(m) => {
            info!(id = m.id, seller_id = ?m.seller_id, "created book");
            Ok((StatusCode::CREATED, Json(m.into())))
        }
        Err(e @ ServiceError::InvalidReference(_)) => {
            Err(JsonApiError::new(StatusCode::BAD_REQUEST, "Invalid Reference", Some(e.to_string())))
        }
        Err(e @ (ServiceError::Validation(_) | ServiceError::Conflict(_))) => {
            Err(JsonApiError::new(StatusCode::BAD_REQUEST, "Validation Error", Some(e.to_string())))
        }
        Err(e) => {
            error!(err = %e, "create book failed");
            Err(JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Create Failed", Some(e.to_string())))
        }
    }
}

#[utoipa::path(
    get, path = "/books/", tag = "books",
    responses((status = 200, description = "All books", body = BooksList))
)]
pub async fn list(State(state): State<ServerState>) -> Result<Json<BooksList>, JsonApiError> {
    match book_service::list_books(&state.db).await {
        Ok(models) => {
            info!(count = models.len(), "list books");
            Ok(Json(BooksList { books: models.into_iter().map(Into::into).collect() }))
        }
        Err(e) => {
            error!(err = %e, "list books failed");
            Err(JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "List Failed", Some(e.to_string())))
        }
    }
}

#[utoipa::path(
    get, path = "/books/{id}", tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "OK", body = BookResponse),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<BookResponse>, StatusCode> {
    match book_service::get_book(&state.db, id).await {
        Ok(Some(m)) => Ok(Json(m.into())),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            error!(err = %e, "get book failed");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

#[utoipa::path(
    put, path = "/books/{id}", tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Updated", body = BookResponse),
        (status = 404, description = "Book or new seller not found")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateBook>,
) -> Result<Json<BookResponse>, StatusCode> {
    match book_service::update_book(
        &state.db,
        id,
        &input.title,
        &input.author,
        input.year,
        input.pages,
        input.seller_id,
    )
    .await
    {
        Ok(m) => {
            info!(id = m.id, "updated book");
            Ok(Json(m.into()))
        }
        Err(ServiceError::NotFound(_)) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            error!(err = %e, "update book failed");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

#[utoipa::path(
    delete, path = "/books/{id}", tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i32>) -> StatusCode {
    match book_service::delete_book(&state.db, id).await {
        Ok(true) => {
            info!(id, "deleted book");
            StatusCode::NO_CONTENT
        }
        Ok(false) => StatusCode::NOT_FOUND,
        Err(e) => {
            error!(err = %e, "delete book failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
