use std::net::SocketAddr;

use anyhow::Context;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tower_http::normalize_path::NormalizePathLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

mod config;
use crate::config::{Config, SchemaFailure};

mod db;
use db::Database;

mod error;
pub(crate) use error::{ApiError, ApiResult};

mod controllers;
mod models;
pub(crate) mod types;

use types::api::CreatePaste;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // try to load .env, ignoring any errors
    _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = Config::load().context("failed to load config")?;

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));

    let database = Database::connect(&config.database.url, config.database.tls.ssl_mode())
        .await
        .context("failed to connect to database")?;

    if let Err(source) = database.init_schema().await {
        match config.schema_failure {
            SchemaFailure::Abort => {
                return Err(source).context("failed to create pastes table");
            }
            SchemaFailure::Continue => {
                error!("failed to create pastes table: {source}");
            }
        }
    }

    axum::Server::bind(&addr)
        .serve(app(database).into_make_service())
        .await?;

    Ok(())
}

fn app(database: Database) -> Router {
    // every method router carries the fallback so that method mismatches on
    // defined paths also get the JSON 404
    Router::new()
        .route("/", get(index).fallback(fallback))
        .route("/paste", post(create_paste).fallback(fallback))
        .route("/paste/:id", get(get_paste).fallback(fallback))
        .fallback(fallback)
        .layer(TraceLayer::new_for_http())
        .route_layer(NormalizePathLayer::trim_trailing_slash())
        .with_state(database)
}

async fn index() -> Json<serde_json::Value> {
    Json(json!({ "message": "Pastebin Backend is running" }))
}

async fn create_paste(
    State(mut db): State<Database>,
    request: Result<Json<CreatePaste>, JsonRejection>,
) -> crate::ApiResult<impl IntoResponse> {
    let Json(request) = request?;
    let paste = controllers::paste::create(&mut db, request).await?;
    Ok((StatusCode::CREATED, Json(paste)))
}

async fn get_paste(
    State(mut db): State<Database>,
    Path(id): Path<String>,
) -> crate::ApiResult<impl IntoResponse> {
    let paste = controllers::paste::read(&mut db, &id).await?;
    Ok(Json(paste))
}

async fn fallback() -> ApiError {
    ApiError::RouteNotFound
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use tower::ServiceExt;

    use super::*;

    // a lazy pool never connects, so routing and validation behavior is
    // testable without a live database
    fn test_app() -> Router {
        let database = Database::connect_lazy("postgres://localhost/tinybin").unwrap();
        app(database)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn request(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn health_check_responds() {
        let response = test_app().oneshot(request(Method::GET, "/")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Pastebin Backend is running");
    }

    #[tokio::test]
    async fn unknown_route_is_a_json_404() {
        let response = test_app()
            .oneshot(request(Method::GET, "/nope"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Route not found");
    }

    #[tokio::test]
    async fn method_mismatch_is_a_json_404() {
        let response = test_app()
            .oneshot(request(Method::GET, "/paste"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Route not found");

        let response = test_app()
            .oneshot(request(Method::POST, "/paste/123"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Route not found");
    }

    #[tokio::test]
    async fn non_json_body_is_a_json_400() {
        let response = test_app()
            .oneshot(request(Method::POST, "/paste"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Invalid request body");
    }

    #[tokio::test]
    async fn missing_content_is_a_json_400_without_touching_the_database() {
        // the lazy pool has nothing to connect to, so a 400 here proves the
        // request was rejected before any insert
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/paste")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"maxViews": 1}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Content is required");
    }
}
