//! Handlers for the `/api/client` resource: registration with email
//! verification, login, token verification, and profile.

use std::time::Duration;

use axum::extract::State;
use axum::Json;
use pagedock_core::types::DbId;
use pagedock_core::verification::{code_cache_key, generate_code, CODE_TTL_SECS};
use pagedock_db::models::user::{CreateUser, User};
use pagedock_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::{Envelope, CODE_BAD_REQUEST, CODE_NOT_FOUND};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/client/send-email`.
#[derive(Debug, Deserialize)]
pub struct SendEmailRequest {
    pub email: String,
}

/// Request body for `POST /api/client/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub code: String,
    pub password: String,
}

/// Request body for `POST /api/client/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Payload for a successful registration.
#[derive(Debug, Serialize)]
pub struct RegisterData {
    pub token: String,
}

/// Payload for a successful login.
#[derive(Debug, Serialize)]
pub struct LoginData {
    pub token: String,
    pub user: UserInfo,
}

/// Public user info embedded in [`LoginData`].
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: DbId,
    pub username: String,
    pub email: String,
}

/// Payload for a successful token verification.
#[derive(Debug, Serialize)]
pub struct VerifyData {
    pub user_id: DbId,
    pub username: String,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/client/send-email
///
/// Issue a registration verification code for an unregistered address.
/// An unexpired previous code is reused rather than replaced, so rapid
/// re-requests do not invalidate a code already sitting in an inbox.
pub async fn send_email(
    State(state): State<AppState>,
    Json(input): Json<SendEmailRequest>,
) -> AppResult<Json<Envelope<()>>> {
    if UserRepo::email_exists(&state.pool, &input.email).await? {
        return Ok(Json(Envelope::soft(
            CODE_BAD_REQUEST,
            "Email is already registered",
        )));
    }

    let key = code_cache_key(&input.email);

    if state.cache.get(&key).await?.is_some() {
        return Ok(Json(Envelope::ok_empty(
            "A verification code was already sent; use it, or retry once it expires",
        )));
    }

    let code = generate_code();
    state
        .cache
        .put(&key, &code, Duration::from_secs(CODE_TTL_SECS))
        .await?;

    match &state.mailer {
        Some(mailer) => {
            mailer
                .send_verification_code(&input.email, &code)
                .await
                .map_err(|e| AppError::InternalError(format!("Email delivery failed: {e}")))?;
        }
        None => {
            // SMTP not configured: development mode, surface the code in logs.
            tracing::info!(email = %input.email, code = %code, "SMTP not configured; verification code logged");
        }
    }

    Ok(Json(Envelope::ok_empty("Verification code sent")))
}

/// POST /api/client/register
///
/// Create an account. The verification code must match the cached one for
/// the given email.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<Json<Envelope<RegisterData>>> {
    let key = code_cache_key(&input.email);
    let cached = state.cache.get(&key).await?;

    if cached.as_deref() != Some(input.code.as_str()) {
        return Ok(Json(Envelope::soft(
            CODE_BAD_REQUEST,
            "Invalid or expired verification code",
        )));
    }

    if UserRepo::username_exists(&state.pool, &input.username).await? {
        return Ok(Json(Envelope::soft(
            CODE_BAD_REQUEST,
            "Username is already taken",
        )));
    }
    if UserRepo::email_exists(&state.pool, &input.email).await? {
        return Ok(Json(Envelope::soft(
            CODE_BAD_REQUEST,
            "Email is already registered",
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username: input.username.clone(),
            email: input.email.clone(),
            password_hash,
        },
    )
    .await?;

    let token = generate_access_token(user.id, &user.username, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");

    Ok(Json(Envelope::ok(
        "Registration successful",
        RegisterData { token },
    )))
}

/// POST /api/client/login
///
/// Authenticate with username **or** email plus password.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<Envelope<LoginData>>> {
    let Some(user) = UserRepo::find_by_login(&state.pool, &input.username).await? else {
        return Ok(Json(Envelope::soft(CODE_BAD_REQUEST, "User does not exist")));
    };

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        return Ok(Json(Envelope::soft(CODE_BAD_REQUEST, "Incorrect password")));
    }

    let token = generate_access_token(user.id, &user.username, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(Json(Envelope::ok(
        "Login successful",
        LoginData {
            token,
            user: UserInfo::from(&user),
        },
    )))
}

/// GET /api/client/verify
///
/// Validate the Bearer token and echo its claims. Missing or invalid
/// tokens are rejected by the [`AuthUser`] extractor with 401.
pub async fn verify(auth: AuthUser) -> AppResult<Json<Envelope<VerifyData>>> {
    Ok(Json(Envelope::ok(
        "Token valid",
        VerifyData {
            user_id: auth.user_id,
            username: auth.username,
        },
    )))
}

/// POST /api/client/logout
///
/// Tokens are stateless; logout is a client-side discard. Always succeeds.
pub async fn logout() -> Json<Envelope<()>> {
    Json(Envelope::ok_empty("Logged out"))
}

/// GET /api/client/profile
///
/// Return the stored account row for the authenticated user.
pub async fn profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<Envelope<UserInfo>>> {
    let Some(user) = UserRepo::find_by_id(&state.pool, auth.user_id).await? else {
        return Ok(Json(Envelope::soft(CODE_NOT_FOUND, "User no longer exists")));
    };

    Ok(Json(Envelope::ok("Profile fetched", UserInfo::from(&user))))
}
