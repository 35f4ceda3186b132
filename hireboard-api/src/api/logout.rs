//! API endpoint for logout and session termination.

use rocket::Route;
use rocket::http::{Cookie, CookieJar};
use rocket::serde::json::Json;

use crate::DbConn;
use crate::api::MessageResponse;
use crate::orm::logout::revoke_session;

/// Logout endpoint.
///
/// - **URL:** `/api/1/logout`
/// - **Method:** `POST`
/// - **Purpose:** Revokes the current session and removes the cookie
/// - **Authentication:** None required; succeeds with or without a session
#[post("/1/logout")]
pub async fn logout(db: DbConn, cookies: &CookieJar<'_>) -> Json<MessageResponse> {
    // Take the cookie value first without holding a reference into the jar
    let cookie_value = cookies.get("session").map(|c| c.value().to_string());

    if let Some(session_id) = cookie_value {
        if let Err(e) = revoke_session(&db, &session_id).await {
            error!("failed to revoke session: {:?}", e);
        }
        cookies.remove(Cookie::from("session"));
    }

    Json(MessageResponse {
        message: "You have been logged out.".to_string(),
    })
}

pub fn routes() -> Vec<Route> {
    routes![logout]
}
