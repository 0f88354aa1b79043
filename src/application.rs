use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{Method, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use log::{error, warn};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    services::ServeDir,
};

use crate::app_state::AppState;
use crate::error::AppError;
use crate::modules::post::controller;

const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let mut app = Router::new()
        .route("/feed", get(controller::get_feed))
        .route("/feed/revision", get(controller::get_feed_revision))
        .route("/posts", post(controller::create_post))
        .route("/posts/{id}/like", post(controller::toggle_like));

    let base_url = state.config.upload_base_url.trim_end_matches('/');
    if base_url.starts_with('/') && base_url.len() > 1 {
        app = app.nest_service(base_url, ServeDir::new(&state.config.upload_dir));
    } else {
        warn!("Upload base URL {} is not a local path, uploads will not be served", base_url);
    }

    app.layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors)
        .with_state(state)
}

fn panic_response(_: Box<dyn Any + Send + 'static>) -> Response {
    error!("Request handler panicked");
    AppError::unexpected().into_response()
}
