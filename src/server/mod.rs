mod api;
mod error;
mod state;
mod types;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use self::error::AppError;
pub use self::state::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::classify_image_handler,
        api::classify_attributes_handler,
        api::add_animal_handler,
        api::list_animals_handler,
        api::get_animal_handler,
    ),
    components(schemas(
        types::ClassifyImageForm,
        types::ClassifyAttributesRequest,
        types::AddAnimalForm,
        types::AddAnimalResponse,
    ))
)]
pub struct ApiDoc;

/// 构建API服务器
pub fn create_app(state: Arc<AppState>) -> Router {
    let uploads = ServeDir::new(state.catalog.uploads_dir());
    let body_limit = state.body_limit;

    Router::new()
        .route("/api/classify-image", post(api::classify_image_handler))
        .route("/api/classify-attributes", post(api::classify_attributes_handler))
        .route("/api/improve-faunara", post(api::add_animal_handler))
        .route("/api/animals", get(api::list_animals_handler))
        .route("/api/animals/{id}", get(api::get_animal_handler))
        .nest_service("/uploads", uploads)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(api::not_found_handler)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
