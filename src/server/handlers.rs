//! Request handlers for the JSON API

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::error::ApiError;
use super::AppState;
use crate::kitchen_model::{Occurrence, Recipe, ShoppingEntry};

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Body of `PUT /api/to-be-bought/{index}`
#[derive(Debug, Deserialize)]
pub struct RenameRequest {
    #[serde(rename = "newName", default)]
    pub new_name: Option<String>,
}

/// Parse a JSON request body; an empty body counts as `{}`
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::from_str("{}")?);
    }
    Ok(serde_json::from_slice(body)?)
}

fn parse_param<T: std::str::FromStr>(raw: &str, what: &str) -> Result<T, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("{what} must be an integer, got '{raw}'")))
}

fn success() -> Json<Value> {
    Json(json!({ "success": true }))
}

/// GET /api/rezepte
pub async fn list_recipes(State(state): State<AppState>) -> ApiResult<Vec<Recipe>> {
    Ok(Json(state.kitchen.recipes().await?))
}

/// GET /api/to-be-cooked
pub async fn list_to_cook(State(state): State<AppState>) -> ApiResult<Vec<Recipe>> {
    Ok(Json(state.kitchen.to_cook().await?))
}

/// POST /api/to-be-cooked
pub async fn add_to_cook(State(state): State<AppState>, body: Bytes) -> ApiResult<Value> {
    let value: Value = parse_body(&body)?;
    // Stored records may lack an id, new ones must carry one
    if value.get("id").and_then(Value::as_i64).is_none() {
        return Err(ApiError::BadRequest("Recipe id must be an integer".to_string()));
    }
    let recipe: Recipe = serde_json::from_value(value)?;
    debug!(recipe_id = recipe.id, name = %recipe.name, "Received recipe to cook");
    state.kitchen.add_to_cook(recipe).await?;
    Ok(success())
}

/// DELETE /api/to-be-cooked/{id}
pub async fn remove_from_cook(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Value> {
    let rezept_id: i64 = parse_param(&raw_id, "Recipe id")?;
    let already_bought = state.kitchen.remove_from_cook(rezept_id).await?;
    Ok(Json(json!({
        "success": true,
        "alreadyBoughtIngredients": already_bought,
    })))
}

/// GET /api/to-be-bought
pub async fn list_to_buy(State(state): State<AppState>) -> ApiResult<Vec<ShoppingEntry>> {
    Ok(Json(state.kitchen.to_buy().await?))
}

/// POST /api/to-be-bought
pub async fn add_to_buy(State(state): State<AppState>, body: Bytes) -> ApiResult<Value> {
    let item: Occurrence = parse_body(&body)?;
    state.kitchen.add_to_buy(item).await?;
    Ok(success())
}

/// DELETE /api/to-be-bought/{index}
pub async fn delete_to_buy(
    State(state): State<AppState>,
    Path(raw_index): Path<String>,
) -> ApiResult<Value> {
    let index: usize = parse_param(&raw_index, "Index")?;
    state.kitchen.delete_to_buy(index).await?;
    Ok(success())
}

/// PUT /api/to-be-bought/{index}
pub async fn rename_to_buy(
    State(state): State<AppState>,
    Path(raw_index): Path<String>,
    body: Bytes,
) -> ApiResult<Value> {
    let index: usize = parse_param(&raw_index, "Index")?;
    let request: RenameRequest = parse_body(&body)?;
    let new_name = request.new_name.unwrap_or_default();
    state.kitchen.rename_to_buy(index, &new_name).await?;
    Ok(success())
}

/// Fallback for unknown routes and unsupported methods
pub async fn not_found() -> ApiError {
    ApiError::NotFound("Not Found".to_string())
}
