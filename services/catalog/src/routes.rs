//! Catalog service routes

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{
    error::{ApiError, ApiResult},
    middleware::{AuthUser, session_middleware},
    models::{
        ChangePasswordRequest, PageQuery, UpdateProfileRequest,
        favorite::{FavoriteCheck, ToggleResponse},
        film::Film,
    },
    state::AppState,
};

/// Create the router for the catalog service
pub fn create_router(state: AppState) -> Router {
    let account_routes = Router::new()
        .route("/user/profile/data", get(profile_data))
        .route("/user/account/update", post(update_profile))
        .route("/user/password/change", post(change_password));

    let favorite_routes = Router::new()
        .route("/user/favorites", get(list_favorites))
        .route("/user/favorites/check/:film_id", get(check_favorite))
        .route("/user/favorites/toggle/:film_id", post(toggle_favorite))
        .route("/films/favorites", get(favorites_page));

    Router::new()
        .route("/health", get(health_check))
        .merge(account_routes)
        .merge(favorite_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "catalog-service",
        "database": state.database.health_check().await,
    }))
}

/// Profile of the session user
pub async fn profile_data(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<impl IntoResponse> {
    let profile = state.accounts.get_profile(&user).await?;
    Ok(Json(profile))
}

/// Update the session user's profile
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    state.accounts.update_profile(&user, &payload).await?;
    Ok(Json(json!({"message": "Profile updated successfully"})))
}

/// Change the session user's password
pub async fn change_password(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<ChangePasswordRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    state.accounts.change_password(&user, &payload).await?;
    Ok(Json(json!({"message": "Password updated successfully"})))
}

/// Favorite films of the session user, empty for anonymous requests
pub async fn list_favorites(
    State(state): State<AppState>,
    user: Option<AuthUser>,
) -> ApiResult<Json<Vec<Film>>> {
    let Some(user) = user else {
        return Ok(Json(Vec::new()));
    };
    let films = state.favorites.list_favorite_films(&user).await?;
    Ok(Json(films))
}

/// Whether the session user has favorited the film
pub async fn check_favorite(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    Path(film_id): Path<String>,
) -> ApiResult<Json<FavoriteCheck>> {
    let is_favorite = state.favorites.is_favorite(user.as_ref(), &film_id).await?;
    Ok(Json(FavoriteCheck { is_favorite }))
}

/// Add or remove the film from the session user's favorites
pub async fn toggle_favorite(
    State(state): State<AppState>,
    user: AuthUser,
    Path(film_id): Path<String>,
) -> ApiResult<Json<ToggleResponse>> {
    let outcome = state.favorites.toggle_favorite(&user, &film_id).await?;
    Ok(Json(ToggleResponse::from(outcome)))
}

/// Paginated favorites of the session user
pub async fn favorites_page(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<PageQuery>,
) -> ApiResult<impl IntoResponse> {
    let page = state.favorites.favorite_page(&user, query.page).await?;
    Ok(Json(page))
}
