//! Session-based authentication guard for Rocket routes.
//!
//! Validates the `session` cookie against the sessions table and loads the
//! account it belongs to. Add [`AuthenticatedUser`] as a route parameter to
//! require a logged-in caller; wrap it in `Option` where a route merely
//! wants to know whether one is present.

use chrono::Utc;
use diesel::prelude::*;
use rocket::http::Status;
use rocket::outcome::Outcome;
use rocket::request::{self, FromRequest, Request};

use crate::DbConn;
use crate::models::{Session, User};
use crate::schema::{sessions, users};

/// A request guard for routes that require an authenticated user.
///
/// The guard checks, in order:
/// 1. A `session` cookie is present
/// 2. The session row exists, is not revoked, and has not expired
/// 3. The owning user row exists and is active
///
/// # Returns
/// - `Outcome::Success(AuthenticatedUser)` if all checks pass
/// - `Outcome::Error(Status::Unauthorized)` otherwise
/// - `Outcome::Error(Status::InternalServerError)` if the database pool is
///   unavailable
#[derive(Debug)]
pub struct AuthenticatedUser {
    /// The authenticated user from the database
    pub user: User,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthenticatedUser {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let cookies = request.cookies();
        let db = match request.guard::<DbConn>().await {
            Outcome::Success(db) => db,
            _ => return Outcome::Error((Status::InternalServerError, ())),
        };

        let session_cookie = match cookies.get("session") {
            Some(cookie) => cookie,
            None => return Outcome::Error((Status::Unauthorized, ())),
        };

        let session_id = session_cookie.value().to_string();

        let session_result = db
            .run(move |conn| {
                sessions::table
                    .filter(sessions::id.eq(&session_id))
                    .filter(sessions::revoked.eq(false))
                    .filter(
                        sessions::expires_at
                            .is_null()
                            .or(sessions::expires_at.gt(Utc::now().naive_utc())),
                    )
                    .first::<Session>(conn)
                    .optional()
            })
            .await;

        let session = match session_result {
            Ok(Some(sess)) => sess,
            Ok(None) => return Outcome::Error((Status::Unauthorized, ())),
            Err(e) => {
                error!("Database error finding session: {:?}", e);
                return Outcome::Error((Status::Unauthorized, ()));
            }
        };

        let user_result = db
            .run(move |conn| {
                users::table
                    .filter(users::id.eq(session.user_id))
                    .first::<User>(conn)
                    .optional()
            })
            .await;

        match user_result {
            Ok(Some(user)) if user.is_active => Outcome::Success(AuthenticatedUser { user }),
            Ok(_) => Outcome::Error((Status::Unauthorized, ())),
            Err(e) => {
                error!("Database error finding user: {:?}", e);
                Outcome::Error((Status::Unauthorized, ()))
            }
        }
    }
}
