//! User routes: registration and login.

use crate::{
    api::{AppState, error::ValidJson},
    core::{
        user::{self, Credentials},
        view::UserView,
    },
    errors::Result,
};
use axum::{Json, Router, extract::State, http::StatusCode, routing::post};

/// User route group
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/users/create-user", post(create_user))
        .route("/api/users/login", post(login))
}

async fn create_user(
    State(state): State<AppState>,
    ValidJson(credentials): ValidJson<Credentials>,
) -> Result<(StatusCode, Json<UserView>)> {
    let user = user::register_user(&state.db, credentials).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn login(
    State(state): State<AppState>,
    ValidJson(credentials): ValidJson<Credentials>,
) -> Result<Json<UserView>> {
    Ok(Json(user::login(&state.db, credentials).await?))
}
