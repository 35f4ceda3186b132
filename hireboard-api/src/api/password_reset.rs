//! API endpoints for the password-reset flow.
//!
//! Three steps: request a reset link by email, verify the mailed link, and
//! set the new password. The verify and confirm steps answer every failure
//! mode (wrong token, wrong email, expired) with the same body, so the
//! endpoints cannot be used to enumerate accounts or probe token state.

use rocket::Route;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use rocket::{State, serde::json::json};
use serde::{Deserialize, Serialize};

use crate::DbConn;
use crate::api::{ErrorResponse, MessageResponse, error_response, internal_error};
use crate::mail::{Mailer, OutboundEmail};
use crate::orm::login::hash_password;
use crate::orm::password_reset::{
    consume_reset_token, find_reset_token, upsert_password_reset_token,
};
use crate::orm::user::get_user_by_email;

const INVALID_LINK: &str = "Invalid or expired password reset link.";

#[derive(Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

#[derive(Serialize)]
pub struct ResetLinkResponse {
    pub email: String,
    pub token: String,
}

#[derive(Deserialize)]
pub struct SetNewPasswordRequest {
    pub email: String,
    pub token: String,
    pub password1: String,
    pub password2: String,
}

/// Password Reset Request endpoint.
///
/// - **URL:** `/api/1/password-reset`
/// - **Method:** `POST`
/// - **Purpose:** Issues a reset token and mails it to the account holder
/// - **Authentication:** None
///
/// Issuing is a keyed replace on (user, token type): asking again replaces
/// the previous token string and restarts its validity window. Unknown
/// addresses get a 404 and no token is created.
#[post("/1/password-reset", data = "<request>")]
pub async fn password_reset(
    db: DbConn,
    mailer: &State<Mailer>,
    request: Json<PasswordResetRequest>,
) -> Result<Json<MessageResponse>, status::Custom<Json<ErrorResponse>>> {
    let cleaned_email = request.email.trim().to_lowercase();

    let lookup_email = cleaned_email.clone();
    let user = db
        .run(move |conn| get_user_by_email(conn, &lookup_email))
        .await
        .map_err(|_| internal_error())?;

    let Some(user) = user else {
        return Err(error_response(Status::NotFound, "Email not found."));
    };

    let token = db
        .run(move |conn| upsert_password_reset_token(conn, user.id))
        .await
        .map_err(|_| internal_error())?;

    mailer
        .send(OutboundEmail {
            subject: "Password Reset Request".to_string(),
            to: vec![cleaned_email.clone()],
            template: "password_reset".to_string(),
            params: json!({ "email": cleaned_email, "token": token.token }),
        })
        .await;

    Ok(Json(MessageResponse {
        message: "Password reset link sent to your email.".to_string(),
    }))
}

/// Verify Reset Link endpoint.
///
/// - **URL:** `/api/1/password-reset/verify?email=..&token=..`
/// - **Method:** `GET`
/// - **Purpose:** Checks a mailed link before showing the new-password form
/// - **Authentication:** None
///
/// Success echoes the pair back for the client to resubmit with the new
/// password. Any mismatch or expiry is the same 400.
#[get("/1/password-reset/verify?<email>&<token>")]
pub async fn verify_password_reset_link(
    db: DbConn,
    email: String,
    token: String,
) -> Result<Json<ResetLinkResponse>, status::Custom<Json<ErrorResponse>>> {
    let cleaned_email = email.trim().to_lowercase();

    let (lookup_email, lookup_token) = (cleaned_email.clone(), token.clone());
    let stored = db
        .run(move |conn| find_reset_token(conn, &lookup_email, &lookup_token))
        .await
        .map_err(|_| internal_error())?;

    match stored {
        Some(stored_token) if stored_token.is_valid() => Ok(Json(ResetLinkResponse {
            email: cleaned_email,
            token,
        })),
        _ => Err(error_response(Status::BadRequest, INVALID_LINK)),
    }
}

/// Set New Password endpoint.
///
/// - **URL:** `/api/1/password-reset/confirm`
/// - **Method:** `POST`
/// - **Purpose:** Consumes a valid reset token and stores the new password
/// - **Authentication:** None
///
/// A confirmation mismatch fails before the token is looked at, so the
/// token survives typos and can be retried. On success the token is
/// deleted; it is single-use.
#[post("/1/password-reset/confirm", data = "<request>")]
pub async fn set_new_password(
    db: DbConn,
    request: Json<SetNewPasswordRequest>,
) -> Result<Json<MessageResponse>, status::Custom<Json<ErrorResponse>>> {
    if request.password1 != request.password2 {
        return Err(error_response(Status::BadRequest, "Passwords do not match."));
    }

    let cleaned_email = request.email.trim().to_lowercase();
    let token_string = request.token.clone();

    let stored = db
        .run(move |conn| find_reset_token(conn, &cleaned_email, &token_string))
        .await
        .map_err(|_| internal_error())?;

    let stored_token = match stored {
        Some(t) if t.is_valid() => t,
        _ => return Err(error_response(Status::BadRequest, INVALID_LINK)),
    };

    let new_hash = hash_password(&request.password1);
    db.run(move |conn| consume_reset_token(conn, &stored_token, &new_hash))
        .await
        .map_err(|_| internal_error())?;

    Ok(Json(MessageResponse {
        message: "Your password has been reset successfully. You can now log in.".to_string(),
    }))
}

pub fn routes() -> Vec<Route> {
    routes![password_reset, verify_password_reset_link, set_new_password]
}
