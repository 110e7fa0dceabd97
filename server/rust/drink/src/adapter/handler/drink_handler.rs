use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::error::AppError;
use super::AppState;
use crate::domain::entity::drink::{Drink, RecipeIngredient};
use crate::usecase::create_drink::{CreateDrinkError, CreateDrinkInput};
use crate::usecase::delete_drink::DeleteDrinkError;
use crate::usecase::get_drink::GetDrinkError;
use crate::usecase::update_drink::{UpdateDrinkError, UpdateDrinkInput};

/// GET /api/v1/drinks
pub async fn list_drinks(State(state): State<AppState>) -> Result<Response, AppError> {
    let drinks = state
        .list_drinks_uc
        .execute()
        .await
        .map_err(|e| AppError::internal(&e.to_string()))?;

    let items: Vec<ShortDrinkResponse> =
        drinks.into_iter().map(ShortDrinkResponse::from).collect();

    Ok((
        StatusCode::OK,
        Json(json!({ "success": true, "drinks": items })),
    )
        .into_response())
}

/// GET /api/v1/drinks-detail
pub async fn list_drinks_detail(State(state): State<AppState>) -> Result<Response, AppError> {
    let drinks = state
        .list_drinks_uc
        .execute()
        .await
        .map_err(|e| AppError::internal(&e.to_string()))?;

    let items: Vec<DrinkResponse> = drinks.into_iter().map(DrinkResponse::from).collect();

    Ok((
        StatusCode::OK,
        Json(json!({ "success": true, "drinks": items })),
    )
        .into_response())
}

/// GET /api/v1/drinks/{id}
pub async fn get_drink(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_id(&id)?;

    match state.get_drink_uc.execute(&id).await {
        Ok(drink) => Ok(drinks_response(DrinkResponse::from(drink))),
        Err(GetDrinkError::NotFound(id)) => {
            Err(AppError::not_found(&format!("drink not found: {}", id)))
        }
        Err(GetDrinkError::Internal(msg)) => Err(AppError::internal(&msg)),
    }
}

/// POST /api/v1/drinks
pub async fn create_drink(
    State(state): State<AppState>,
    payload: Result<Json<CreateDrinkRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(req) = payload.map_err(|e| AppError::unprocessable(&e.to_string()))?;

    let input = CreateDrinkInput {
        title: req.title,
        recipe: req.recipe,
    };

    match state.create_drink_uc.execute(&input).await {
        Ok(drink) => Ok(drinks_response(DrinkResponse::from(drink))),
        Err(CreateDrinkError::AlreadyExists(title)) => Err(AppError::unprocessable(&format!(
            "drink already exists: {}",
            title
        ))),
        Err(e @ (CreateDrinkError::EmptyTitle | CreateDrinkError::EmptyRecipe)) => {
            Err(AppError::unprocessable(&e.to_string()))
        }
        Err(CreateDrinkError::Internal(msg)) => Err(AppError::internal(&msg)),
    }
}

/// PATCH /api/v1/drinks/{id}
pub async fn update_drink(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateDrinkRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let id = parse_id(&id)?;
    let Json(req) = payload.map_err(|e| AppError::unprocessable(&e.to_string()))?;

    let input = UpdateDrinkInput {
        id,
        title: req.title,
        recipe: req.recipe,
    };

    match state.update_drink_uc.execute(&input).await {
        Ok(drink) => Ok(drinks_response(DrinkResponse::from(drink))),
        Err(UpdateDrinkError::NotFound(id)) => {
            Err(AppError::not_found(&format!("drink not found: {}", id)))
        }
        Err(e @ (UpdateDrinkError::NoFields | UpdateDrinkError::EmptyTitle)) => {
            Err(AppError::unprocessable(&e.to_string()))
        }
        Err(UpdateDrinkError::Internal(msg)) => Err(AppError::internal(&msg)),
    }
}

/// DELETE /api/v1/drinks/{id}
pub async fn delete_drink(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_id(&id)?;

    match state.delete_drink_uc.execute(&id).await {
        Ok(()) => Ok((
            StatusCode::OK,
            Json(json!({ "success": true, "delete": id.to_string() })),
        )
            .into_response()),
        Err(DeleteDrinkError::NotFound(id)) => {
            Err(AppError::not_found(&format!("drink not found: {}", id)))
        }
        Err(DeleteDrinkError::Internal(msg)) => Err(AppError::internal(&msg)),
    }
}

/// パスパラメータの id を解析する。不正な id は存在しないリソース扱い。
fn parse_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::not_found(&format!("drink not found: {}", id)))
}

fn drinks_response(drink: DrinkResponse) -> Response {
    (
        StatusCode::OK,
        Json(json!({ "success": true, "drinks": [drink] })),
    )
        .into_response()
}

// --- Request / Response types ---

#[derive(Debug, Deserialize)]
pub struct CreateDrinkRequest {
    pub title: String,
    pub recipe: Vec<RecipeIngredient>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateDrinkRequest {
    pub title: Option<String>,
    pub recipe: Option<Vec<RecipeIngredient>>,
}

/// 材料の短縮表現。材料名は伏せて色と分量のみ返す。
#[derive(Debug, Serialize)]
pub struct ShortIngredient {
    pub color: String,
    pub parts: i32,
}

/// ドリンクの短縮表現（公開エンドポイント用）。
#[derive(Debug, Serialize)]
pub struct ShortDrinkResponse {
    pub id: String,
    pub title: String,
    pub recipe: Vec<ShortIngredient>,
}

impl From<Drink> for ShortDrinkResponse {
    fn from(d: Drink) -> Self {
        Self {
            id: d.id.to_string(),
            title: d.title,
            recipe: d
                .recipe
                .into_iter()
                .map(|i| ShortIngredient {
                    color: i.color,
                    parts: i.parts,
                })
                .collect(),
        }
    }
}

/// ドリンクの詳細表現（要認可エンドポイント用）。
#[derive(Debug, Serialize)]
pub struct DrinkResponse {
    pub id: String,
    pub title: String,
    pub recipe: Vec<RecipeIngredient>,
}

impl From<Drink> for DrinkResponse {
    fn from(d: Drink) -> Self {
        Self {
            id: d.id.to_string(),
            title: d.title,
            recipe: d.recipe,
        }
    }
}
