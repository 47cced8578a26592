use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::middleware::RequestId;
use crate::models::{RecipeSelector, ShoppingList};
use crate::services::{
    build_shopping_list, filter_recipes, greeting_card::DEFAULT_RECIPIENT, images,
    restrictions::parse_restrictions, RequestContext, Tone,
};

use super::extract::JsonBody;
use super::AppState;

// Request/Response types

#[derive(Debug, Default, Deserialize)]
pub struct RecommendRequest {
    #[serde(rename = "type", default)]
    pub dessert_type: Option<String>,
    /// Minutes; accepted loosely and validated in the handler
    #[serde(default)]
    pub time: Option<Value>,
    #[serde(default)]
    pub restrictions: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResult {
    pub name: String,
    pub ai_reason: String,
    pub image_path: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub count: usize,
    pub results: Vec<RecommendationResult>,
    pub ai_model: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChristmasCardRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub desserts: Option<Vec<String>>,
    #[serde(default)]
    pub tone: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChristmasCardResponse {
    pub recipient: String,
    pub tone: String,
    pub message: String,
    pub ai_generated: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct ShoppingListRequest {
    /// Selectors of mixed shape; normalized into [`RecipeSelector`]s
    #[serde(default)]
    pub recipes: Option<Value>,
}

/// Parses the optional time budget: integers, truncated floats, integer strings
/// or booleans (read as 0 or 1)
pub fn parse_time_budget(raw: Option<&Value>) -> AppResult<Option<i64>> {
    let invalid = || AppError::InvalidInput("time must be an integer (minutes)".to_string());

    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .map(Some)
            .ok_or_else(invalid),
        Some(Value::String(s)) => s.trim().parse::<i64>().map(Some).map_err(|_| invalid()),
        Some(Value::Bool(b)) => Ok(Some(i64::from(*b))),
        Some(_) => Err(invalid()),
    }
}

fn request_host(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .filter(|host| !host.is_empty())
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Recommend up to two desserts with a festive reason for each
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    headers: HeaderMap,
    JsonBody(request): JsonBody<RecommendRequest>,
) -> AppResult<Json<RecommendResponse>> {
    let time_budget = parse_time_budget(request.time.as_ref())?;
    let dessert_type = request.dessert_type.unwrap_or_else(|| "All".to_string());
    let raw_restrictions = request.restrictions.unwrap_or_default();
    let restrictions = parse_restrictions(&raw_restrictions);

    tracing::info!(
        request_id = %request_id,
        dessert_type = %dessert_type,
        time_budget = ?time_budget,
        restrictions = ?restrictions,
        "Processing recommendation request"
    );

    let book = state.store.load().await?;
    let recommended = filter_recipes(&book, Some(dessert_type.as_str()), time_budget, &restrictions);

    let context = RequestContext {
        dessert_type,
        time: time_budget,
        restrictions: raw_restrictions,
    };
    let reasons = state.reasons.generate(&recommended, &context).await;

    let base_url = state.base_url(request_host(&headers));
    let results: Vec<RecommendationResult> = recommended
        .iter()
        .zip(reasons)
        .map(|(recipe, reason)| RecommendationResult {
            name: recipe.name.clone(),
            ai_reason: reason,
            image_path: images::image_url(recipe, &base_url),
            ingredients: recipe.ingredients.clone(),
            instructions: recipe.instructions.clone(),
        })
        .collect();

    tracing::info!(
        request_id = %request_id,
        count = results.len(),
        "Recommendation completed"
    );

    Ok(Json(RecommendResponse {
        count: results.len(),
        results,
        ai_model: state.ai_model.clone(),
    }))
}

/// Write a Christmas-card greeting
pub async fn christmas_card(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    JsonBody(request): JsonBody<ChristmasCardRequest>,
) -> AppResult<Json<ChristmasCardResponse>> {
    let recipient = request
        .name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_RECIPIENT.to_string());
    let desserts = request.desserts.unwrap_or_default();
    let tone_name = request
        .tone
        .map(|tone| tone.trim().to_lowercase())
        .filter(|tone| !tone.is_empty())
        .unwrap_or_else(|| "warm".to_string());
    let tone = Tone::parse(&tone_name);

    tracing::info!(
        request_id = %request_id,
        tone = ?tone,
        desserts = desserts.len(),
        "Processing christmas card request"
    );

    let message = state.cards.generate(&recipient, &desserts, tone).await;

    Ok(Json(ChristmasCardResponse {
        recipient,
        tone: tone_name,
        message: message.text,
        ai_generated: message.ai_generated,
    }))
}

/// Build a shopping list from selected recipes
pub async fn shopping_list(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    JsonBody(request): JsonBody<ShoppingListRequest>,
) -> AppResult<Json<ShoppingList>> {
    let selectors: Vec<RecipeSelector> = match request.recipes {
        Some(Value::Array(items)) if !items.is_empty() => {
            items.iter().map(RecipeSelector::from).collect()
        }
        _ => {
            return Err(AppError::InvalidInput(
                "recipes must be a non-empty list".to_string(),
            ))
        }
    };

    tracing::info!(
        request_id = %request_id,
        selections = selectors.len(),
        "Processing shopping list request"
    );

    let book = state.store.load().await?;
    let list = build_shopping_list(&book, &selectors);

    tracing::info!(
        request_id = %request_id,
        resolved = list.count,
        items = list.shopping_list.len(),
        "Shopping list built"
    );

    Ok(Json(list))
}
