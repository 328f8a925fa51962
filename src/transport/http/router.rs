use crate::domain::form::RegistrationForm;
use crate::domain::model::{Category, Pet};
use crate::transport::http::handlers::{health, pets};
use crate::transport::http::types::{ApiResponse, AppState};
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        pets::index_handler,
        pets::register_form_handler,
        pets::register_handler,
        pets::edit_form_handler,
        pets::update_handler,
        pets::delete_handler
    ),
    components(schemas(ApiResponse, RegistrationForm, Pet, Category))
)]
pub struct ApiDoc;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(pets::index_handler))
        .route(
            "/register",
            get(pets::register_form_handler).post(pets::register_handler),
        )
        .route(
            "/update/:id",
            get(pets::edit_form_handler).post(pets::update_handler),
        )
        .route("/delete/:id", get(pets::delete_handler))
        .route("/health", get(health::healthcheck_handler))
        .fallback(pets::not_found_handler)
        .with_state(app_state)
}
