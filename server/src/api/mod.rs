pub mod form;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    routing::{any, get},
    Router,
};

use common::v1::upload::ENDPOINT;

pub fn router() -> Router {
    Router::new()
        .route("/", get(form::get))
        // Size limits are enforced while spooling.
        .route(
            ENDPOINT,
            any(upload::upload).layer(DefaultBodyLimit::disable()),
        )
}
