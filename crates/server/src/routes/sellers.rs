use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};

use models::{book, seller};
use service::{errors::ServiceError, seller_service};

use crate::errors::JsonApiError;
use crate::routes::ServerState;

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CreateSeller {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Partial update; absent or empty fields keep their prior value.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct UpdateSeller {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

/// Book embedded in a seller response; no seller_id back-reference.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct SellerBook {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub year: i32,
    pub pages: i32,
}

impl From<book::Model> for SellerBook {
    fn from(m: book::Model) -> Self {
        Self { id: m.id, title: m.title, author: m.author, year: m.year, pages: m.pages }
    }
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct SellerResponse {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub books: Vec<SellerBook>,
}

impl From<(seller::Model, Vec<book::Model>)> for SellerResponse {
    fn from((s, books): (seller::Model, Vec<book::Model>)) -> Self {
        Self {
            id: s.id,
            first_name: s.first_name,
            last_name: s.last_name,
            email: s.email,
            books: books.into_iter().map(Into::into).collect(),
        }
    }
}

fn field_error(field: &str, e: models::errors::ModelError) -> serde_json::Value {
    let msg = match e {
        models::errors::ModelError::Validation(m) => m,
        other => other.to_string(),
    };
    json!({ "field": field, "error": msg })
}

impl CreateSeller {
    fn validate(&self) -> Result<(), JsonApiError> {
        let mut errors = Vec::new();
        if let Err(e) = seller::validate_name(&self.first_name, "first_name") {
            errors.push(field_error("first_name", e));
        }
        if let Err(e) = seller::validate_name(&self.last_name, "last_name") {
            errors.push(field_error("last_name", e));
        }
        if let Err(e) = seller::validate_email(&self.email) {
            errors.push(field_error("email", e));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(JsonApiError::validation(errors))
        }
    }
}

#[utoipa::path(
    post, path = "/seller/", tag = "sellers",
    request_body = CreateSeller,
    responses(
        (status = 201, description = "Created", body = SellerResponse),
        (status = 400, description = "Email already registered"),
        (status = 422, description = "Validation Error")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<CreateSeller>,
) -> Result<(StatusCode, Json<SellerResponse>), JsonApiError> {
    input.validate()?;

    match seller_service::create_seller(&state.db, &input.first_name, &input.last_name, &input.email)
        .await
    {
        Ok(s) => {
            info!(id = s.id, "created seller");
            Ok((StatusCode::CREATED, Json(SellerResponse::from((s, Vec::new())))))
        }
        Err(e @ ServiceError::Conflict(_)) => {
            Err(JsonApiError::new(StatusCode::BAD_REQUEST, "Conflict", Some(e.to_string())))
        }
        Err(e @ ServiceError::Validation(_)) => {
            Err(JsonApiError::new(StatusCode::BAD_REQUEST, "Validation Error", Some(e.to_string())))
        }
        Err(e) => {
            error!(err = %e, "create seller failed");
            Err(JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Create Failed", Some(e.to_string())))
        }
    }
}

#[utoipa::path(
    get, path = "/seller/", tag = "sellers",
    responses((status = 200, description = "All sellers with books", body = [SellerResponse]))
)]
pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<Vec<SellerResponse>>, JsonApiError> {
    match seller_service::list_sellers(&state.db).await {
        Ok(pairs) => {
            info!(count = pairs.len(), "list sellers");
            Ok(Json(pairs.into_iter().map(Into::into).collect()))
        }
        Err(e) => {
            error!(err = %e, "list sellers failed");
            Err(JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "List Failed", Some(e.to_string())))
        }
    }
}

#[utoipa::path(
    get, path = "/seller/{id}", tag = "sellers",
    params(("id" = i32, Path, description = "Seller ID")),
    responses(
        (status = 200, description = "OK", body = SellerResponse),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<SellerResponse>, StatusCode> {
    match seller_service::get_seller(&state.db, id).await {
        Ok(Some(pair)) => Ok(Json(pair.into())),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            error!(err = %e, "get seller failed");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

#[utoipa::path(
    put, path = "/seller/{id}", tag = "sellers",
    params(("id" = i32, Path, description = "Seller ID")),
    request_body = UpdateSeller,
    responses(
        (status = 200, description = "Updated", body = SellerResponse),
        (status = 400, description = "Email already registered"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateSeller>,
) -> Response {
    match seller_service::update_seller(
        &state.db,
        id,
        input.first_name.as_deref(),
        input.last_name.as_deref(),
        input.email.as_deref(),
    )
    .await
    {
        Ok(pair) => {
            info!(id, "updated seller");
            Json(SellerResponse::from(pair)).into_response()
        }
        Err(ServiceError::NotFound(_)) => StatusCode::NOT_FOUND.into_response(),
        Err(e @ (ServiceError::Conflict(_) | ServiceError::Validation(_))) => {
            JsonApiError::new(StatusCode::BAD_REQUEST, "Validation Error", Some(e.to_string()))
                .into_response()
        }
        Err(e) => {
            error!(err = %e, "update seller failed");
            JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Update Failed", Some(e.to_string()))
                .into_response()
        }
    }
}

#[utoipa::path(
    delete, path = "/seller/{id}", tag = "sellers",
    params(("id" = i32, Path, description = "Seller ID")),
    responses(
        (status = 204, description = "Deleted together with its books"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i32>) -> StatusCode {
    match seller_service::delete_seller(&state.db, id).await {
        Ok(true) => {
            info!(id, "deleted seller");
            StatusCode::NO_CONTENT
        }
        Ok(false) => StatusCode::NOT_FOUND,
        Err(e) => {
            error!(err = %e, "delete seller failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
