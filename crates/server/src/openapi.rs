use utoipa::OpenApi;

use crate::routes::books::{BookResponse, BooksList, IncomingBook, UpdateBook};
use crate::routes::sellers::{CreateSeller, SellerBook, SellerResponse, UpdateSeller};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::books::create,
        crate::routes::books::list,
        crate::routes::books::get,
        crate::routes::books::update,
        crate::routes::books::delete,
        crate::routes::sellers::create,
        crate::routes::sellers::list,
        crate::routes::sellers::get,
        crate::routes::sellers::update,
        crate::routes::sellers::delete,
    ),
    components(
        schemas(
            IncomingBook,
            UpdateBook,
            BookResponse,
            BooksList,
            CreateSeller,
            UpdateSeller,
            SellerBook,
            SellerResponse,
        )
    ),
    tags(
        (name = "health"),
        (name = "books"),
        (name = "sellers")
    )
)]
pub struct ApiDoc;
