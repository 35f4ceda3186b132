//! API endpoints for registration and email verification.
//!
//! Registration is two-step: a submission parks the hashed password in
//! `pending_users` behind a mailed verification code, and confirming that
//! code materializes the account and logs the new user in. Nothing reaches
//! the users table until the code round-trips.

use rocket::Route;
use rocket::http::{CookieJar, Status};
use rocket::response::status;
use rocket::serde::json::Json;
use rocket::{State, serde::json::json};
use serde::{Deserialize, Serialize};

use crate::DbConn;
use crate::api::{ErrorResponse, error_response, internal_error};
use crate::mail::{Mailer, OutboundEmail};
use crate::orm::login::{create_and_store_session, hash_password, set_session_cookie};
use crate::orm::registration::{
    find_pending_registration, generate_verification_code, promote_pending_user,
    upsert_pending_user,
};
use crate::orm::user::get_user_by_email;
use crate::session_guards::AuthenticatedUser;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub email: String,
}

#[derive(Deserialize)]
pub struct VerifyAccountRequest {
    pub email: String,
    pub code: String,
}

#[derive(Serialize)]
pub struct VerifyAccountResponse {
    pub message: String,
    pub user_id: i32,
    pub email: String,
}

/// Register endpoint.
///
/// - **URL:** `/api/1/register`
/// - **Method:** `POST`
/// - **Purpose:** Starts a registration and mails a verification code
/// - **Authentication:** None; an already-authenticated caller gets 409
///
/// Submitting again for the same address before verifying replaces the
/// earlier pending registration outright: new code, new password hash,
/// fresh validity window. Addresses that already belong to an account are
/// rejected with 409.
#[post("/1/register", data = "<request>")]
pub async fn register(
    db: DbConn,
    mailer: &State<Mailer>,
    current_user: Option<AuthenticatedUser>,
    request: Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, status::Custom<Json<ErrorResponse>>> {
    if current_user.is_some() {
        return Err(error_response(Status::Conflict, "Already authenticated."));
    }

    if request.email.trim().is_empty() || request.password.trim().is_empty() {
        return Err(error_response(
            Status::BadRequest,
            "Email and password are required.",
        ));
    }

    let cleaned_email = request.email.trim().to_lowercase();

    let lookup_email = cleaned_email.clone();
    let existing = db
        .run(move |conn| get_user_by_email(conn, &lookup_email))
        .await
        .map_err(|_| internal_error())?;
    if existing.is_some() {
        return Err(error_response(Status::Conflict, "Email already registered."));
    }

    let password_hash = hash_password(&request.password);
    let code = generate_verification_code();

    let (upsert_email, upsert_code) = (cleaned_email.clone(), code.clone());
    db.run(move |conn| upsert_pending_user(conn, &upsert_email, &password_hash, &upsert_code))
        .await
        .map_err(|_| internal_error())?;

    mailer
        .send(OutboundEmail {
            subject: "Verify your email".to_string(),
            to: vec![cleaned_email.clone()],
            template: "email_verification".to_string(),
            params: json!({ "verification_code": code }),
        })
        .await;

    Ok(Json(RegisterResponse {
        message: format!(
            "Verification email sent. Please check your inbox {}.",
            cleaned_email
        ),
        email: cleaned_email,
    }))
}

/// Verify Account endpoint.
///
/// - **URL:** `/api/1/verify-account`
/// - **Method:** `POST`
/// - **Purpose:** Confirms a mailed code, creates the account, and logs in
/// - **Authentication:** None
///
/// The (email, code) pair must match a pending registration that is still
/// inside its validity window. Account creation and pending-row deletion
/// are atomic, so retrying an invalid or expired code never leaves partial
/// state behind.
#[post("/1/verify-account", data = "<request>")]
pub async fn verify_account(
    db: DbConn,
    cookies: &CookieJar<'_>,
    request: Json<VerifyAccountRequest>,
) -> Result<Json<VerifyAccountResponse>, status::Custom<Json<ErrorResponse>>> {
    let cleaned_email = request.email.trim().to_lowercase();
    let code = request.code.clone();

    let lookup_email = cleaned_email.clone();
    let pending = db
        .run(move |conn| find_pending_registration(conn, &lookup_email, &code))
        .await
        .map_err(|_| internal_error())?;

    let pending = match pending {
        Some(p) if p.is_valid() => p,
        _ => {
            return Err(error_response(
                Status::BadRequest,
                "Invalid or expired verification code.",
            ));
        }
    };

    let user = db
        .run(move |conn| promote_pending_user(conn, &pending))
        .await
        .map_err(|_| internal_error())?;

    let session_token = create_and_store_session(&db, user.id)
        .await
        .map_err(|_| internal_error())?;
    set_session_cookie(cookies, &session_token);

    Ok(Json(VerifyAccountResponse {
        message: "Account verified successfully. You are now logged in.".to_string(),
        user_id: user.id,
        email: user.email,
    }))
}

pub fn routes() -> Vec<Route> {
    routes![register, verify_account]
}
