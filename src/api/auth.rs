use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
    Extension, Json,
};
use axum_extra::extract::{
    cookie::{Cookie, SameSite},
    CookieJar, WithRejection,
};
use rand::Rng;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use std::sync::Arc;

use super::error::ApiError;
use super::validation::require_fields;
use crate::store::{Id, LoginRequest, LoginResponse, NewUser, RegisterRequest, UserResponse};
use crate::AppState;

/// Session cookie name
pub const SESSION_COOKIE: &str = "sid";

/// The user id resolved from the session cookie, set by [`require_session`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub Id);

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Generate a random session token
fn generate_token() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();
    hex::encode(bytes)
}

/// Sessions are stored under the token's hash, never the token itself
fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

fn session_cookie(value: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Resolve the `sid` cookie to a user id, if it names a live session
fn session_user_id(state: &AppState, jar: &CookieJar) -> Option<Id> {
    let token = jar.get(SESSION_COOKIE).map(|c| c.value()).filter(|v| !v.is_empty())?;
    state.store.resolve_session(&hash_token(token)).ok()
}

/// POST /auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(mut request), _): WithRejection<Json<RegisterRequest>, ApiError>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    const REQUIRED: &str = "name, email, password are required";

    require_fields(&mut [&mut request.name, &mut request.email], REQUIRED)?;
    if request.password.is_empty() {
        return Err(ApiError::bad_request(REQUIRED));
    }

    let password_hash = hash_password(&request.password).map_err(|e| {
        tracing::error!(error = %e, "Failed to hash password");
        ApiError::internal("could not hash password")
    })?;

    let user = state
        .store
        .create_user(NewUser::customer(request.name, request.email, password_hash))?;

    tracing::info!(user_id = user.id, "Registered user");

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// POST /auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    WithRejection(Json(mut request), _): WithRejection<Json<LoginRequest>, ApiError>,
) -> Result<(CookieJar, Json<LoginResponse>), ApiError> {
    request.email = request.email.trim().to_string();
    if request.email.is_empty() || request.password.is_empty() {
        return Err(ApiError::bad_request("email and password are required"));
    }

    let user = match state.store.find_user_by_email(&request.email) {
        Ok(user) if verify_password(&request.password, &user.password_hash) => user,
        _ => return Err(ApiError::unauthorized("invalid credentials")),
    };

    let token = generate_token();
    state.store.create_session(hash_token(&token), user.id);

    tracing::info!(user_id = user.id, "User logged in");

    Ok((
        jar.add(session_cookie(token)),
        Json(LoginResponse {
            message: "logged in".to_string(),
            user_id: user.id,
        }),
    ))
}

/// POST /auth/logout
pub async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (CookieJar, Json<Value>) {
    if let Some(cookie) = jar.get(SESSION_COOKIE).filter(|c| !c.value().is_empty()) {
        state.store.delete_session(&hash_token(cookie.value()));
    }

    let jar = jar.remove(session_cookie(String::new()));
    (jar, Json(json!({ "message": "logged out" })))
}

/// GET /me
pub async fn me(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Json<UserResponse>, ApiError> {
    let user_id =
        session_user_id(&state, &jar).ok_or_else(|| ApiError::unauthorized("not logged in"))?;

    let user = state
        .store
        .get_user(user_id)
        .map_err(|_| ApiError::unauthorized("invalid session"))?;

    Ok(Json(UserResponse::from(user)))
}

/// Rejects requests without a live session and exposes the session's user
/// to handlers as `Extension<AuthUser>`.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let user_id =
        session_user_id(&state, &jar).ok_or_else(|| ApiError::unauthorized("login required"))?;

    request.extensions_mut().insert(AuthUser(user_id));
    Ok(next.run(request).await)
}

/// Handlers behind [`require_session`] can take this to learn the caller.
pub type CurrentUser = Extension<AuthUser>;
