//! API endpoints for session login.

use rocket::Route;
use rocket::http::CookieJar;
use rocket::response::status;
use rocket::serde::json::Json;
use serde::{Deserialize, Serialize};

use crate::DbConn;
use crate::api::{ErrorResponse, error_response};
use crate::orm::login::process_login;
use crate::session_guards::AuthenticatedUser;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub user_id: i32,
    pub email: String,
    pub is_staff: bool,
}

/// Login endpoint.
///
/// - **URL:** `/api/1/login`
/// - **Method:** `POST`
/// - **Purpose:** Verifies credentials and opens a session
/// - **Authentication:** None; an already-authenticated caller is turned
///   away with 409
///
/// Emails are matched case-insensitively (stored lowercase). Unknown
/// addresses and wrong passwords produce the same 401 body.
#[post("/1/login", data = "<login>")]
pub async fn login(
    db: DbConn,
    cookies: &CookieJar<'_>,
    current_user: Option<AuthenticatedUser>,
    login: Json<LoginRequest>,
) -> Result<Json<LoginResponse>, status::Custom<Json<ErrorResponse>>> {
    if current_user.is_some() {
        return Err(error_response(
            rocket::http::Status::Conflict,
            "Already authenticated.",
        ));
    }

    match process_login(&db, cookies, &login.email, &login.password).await {
        Ok(user) => Ok(Json(LoginResponse {
            message: "Login successful.".to_string(),
            user_id: user.id,
            email: user.email,
            is_staff: user.is_staff,
        })),
        Err(status) => {
            let message = match status.code {
                400 => "Email and password are required.",
                401 => "Invalid email or password.",
                _ => "Internal server error",
            };
            Err(error_response(status, message))
        }
    }
}

pub fn routes() -> Vec<Route> {
    routes![login]
}
