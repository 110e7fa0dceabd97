pub mod drink_handler;
pub mod error;
pub mod health;

use std::sync::Arc;

use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, patch, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use barista_auth::{auth_middleware, require_permission, AuthState};

use crate::usecase::{
    CreateDrinkUseCase, DeleteDrinkUseCase, GetDrinkUseCase, ListDrinksUseCase,
    UpdateDrinkUseCase,
};
use self::error::AppError;

/// Shared application state for REST handlers.
#[derive(Clone)]
pub struct AppState {
    pub list_drinks_uc: Arc<ListDrinksUseCase>,
    pub get_drink_uc: Arc<GetDrinkUseCase>,
    pub create_drink_uc: Arc<CreateDrinkUseCase>,
    pub update_drink_uc: Arc<UpdateDrinkUseCase>,
    pub delete_drink_uc: Arc<DeleteDrinkUseCase>,
    pub auth_state: Option<AuthState>,
}

/// Build the REST API router.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/healthz", get(health::healthz))
        .route("/readyz", get(health::readyz))
        .route("/api/v1/drinks", get(drink_handler::list_drinks));

    let api_routes = if let Some(ref auth_state) = state.auth_state {
        // 参照系ルート (get:drinks-detail)
        let detail_routes = Router::new()
            .route(
                "/api/v1/drinks-detail",
                get(drink_handler::list_drinks_detail),
            )
            .route("/api/v1/drinks/{id}", get(drink_handler::get_drink))
            .route_layer(axum::middleware::from_fn(move |req, next| {
                let gate = require_permission("get:drinks-detail");
                gate(req, next)
            }));

        // 作成ルート (post:drinks)
        let create_routes = Router::new()
            .route("/api/v1/drinks", post(drink_handler::create_drink))
            .route_layer(axum::middleware::from_fn(move |req, next| {
                let gate = require_permission("post:drinks");
                gate(req, next)
            }));

        // 更新ルート (patch:drinks)
        let update_routes = Router::new()
            .route("/api/v1/drinks/{id}", patch(drink_handler::update_drink))
            .route_layer(axum::middleware::from_fn(move |req, next| {
                let gate = require_permission("patch:drinks");
                gate(req, next)
            }));

        // 削除ルート (delete:drinks)
        let delete_routes = Router::new()
            .route("/api/v1/drinks/{id}", delete(drink_handler::delete_drink))
            .route_layer(axum::middleware::from_fn(move |req, next| {
                let gate = require_permission("delete:drinks");
                gate(req, next)
            }));

        detail_routes
            .merge(create_routes)
            .merge(update_routes)
            .merge(delete_routes)
            .layer(from_fn_with_state(auth_state.clone(), auth_middleware))
    } else {
        // 認証なし（開発環境用）
        Router::new()
            .route(
                "/api/v1/drinks-detail",
                get(drink_handler::list_drinks_detail),
            )
            .route("/api/v1/drinks", post(drink_handler::create_drink))
            .route(
                "/api/v1/drinks/{id}",
                get(drink_handler::get_drink)
                    .patch(drink_handler::update_drink)
                    .delete(drink_handler::delete_drink),
            )
    };

    public_routes
        .merge(api_routes)
        .fallback(not_found_handler)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn not_found_handler() -> AppError {
    AppError::not_found("resource not found")
}
