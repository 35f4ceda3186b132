//! Database operations for user authentication and session management.
//!
//! This module provides database layer functions for login, password
//! hashing and verification, and session storage. It abstracts database
//! operations to support both production and testing environments.

use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use diesel::prelude::*;
use rocket::http::{Cookie, CookieJar, SameSite, Status};
use uuid::Uuid;

use crate::DbConn;
use crate::models::{NewSession, User};
#[cfg(feature = "test-staging")]
use crate::orm::testing::FakeDbConn;
use crate::schema::{sessions, users};

/// Trait for abstracting database operations to support both production and
/// testing.
///
/// This allows the same functions to work with both `DbConn` (production)
/// and `FakeDbConn` (testing) by providing a unified interface.
pub trait DbRunner {
    /// Executes a database operation with a connection.
    fn run<F, R>(&self, f: F) -> impl std::future::Future<Output = R>
    where
        F: FnOnce(&mut diesel::SqliteConnection) -> R + Send + 'static,
        R: Send + 'static;
}

impl DbRunner for DbConn {
    fn run<F, R>(&self, f: F) -> impl std::future::Future<Output = R>
    where
        F: FnOnce(&mut diesel::SqliteConnection) -> R + Send + 'static,
        R: Send + 'static,
    {
        DbConn::run(self, f)
    }
}

#[cfg(feature = "test-staging")]
impl<'a> DbRunner for FakeDbConn<'a> {
    fn run<F, R>(&self, f: F) -> impl std::future::Future<Output = R>
    where
        F: FnOnce(&mut diesel::SqliteConnection) -> R + Send + 'static,
        R: Send + 'static,
    {
        FakeDbConn::run(self, f)
    }
}

/// Generates a new UUID-based session token.
fn generate_session_token() -> String {
    Uuid::new_v4().to_string()
}

/// Finds a user by email address. Emails are stored lowercase; callers
/// normalize before lookup.
///
/// # Returns
/// * `Ok(Some(User))` - User found with matching email
/// * `Ok(None)` - No user found with that email
/// * `Err(Status::InternalServerError)` - Database query failed
pub async fn find_user_by_email<D: DbRunner>(db: &D, email: &str) -> Result<Option<User>, Status> {
    let email = email.to_owned();
    db.run(move |conn| {
        users::table
            .filter(users::email.eq(email))
            .first::<User>(conn)
            .optional()
    })
    .await
    .map_err(|_| Status::InternalServerError)
}

/// Verifies a password against a stored Argon2 hash. Returns `false` for
/// non-matching passwords and for malformed hash strings alike.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Creates a new session row and returns the token for the cookie.
///
/// # Returns
/// * `Ok(String)` - Session token that was created and stored
/// * `Err(Status::InternalServerError)` - Database insertion failed
pub async fn create_and_store_session<D: DbRunner>(db: &D, user_id: i32) -> Result<String, Status> {
    let session_token = generate_session_token();
    let now = Utc::now().naive_utc();

    let new_session = NewSession {
        id: session_token.clone(),
        user_id,
        created_at: now,
        expires_at: None,
        revoked: false,
    };

    db.run(move |conn| {
        diesel::insert_into(sessions::table)
            .values(&new_session)
            .execute(conn)
    })
    .await
    .map_err(|_| Status::InternalServerError)?;

    Ok(session_token)
}

/// Sets the session cookie on the response.
///
/// - `http_only(true)` - Prevents JavaScript access to the cookie
/// - `secure(true)` - Requires HTTPS for cookie transmission (off in tests)
/// - `same_site(SameSite::Lax)` - Provides CSRF protection
pub fn set_session_cookie(cookies: &CookieJar<'_>, session_token: &str) {
    let secure_flag = !cfg!(test);
    let cookie = Cookie::build(("session", session_token.to_string()))
        .http_only(true)
        .secure(secure_flag)
        .same_site(SameSite::Lax)
        .path("/")
        .build();
    cookies.add(cookie);
}

/// Processes a complete login: validates input, finds the user, verifies
/// the password, creates a session, and sets the session cookie.
///
/// # Returns
/// * `Ok(User)` - Login successful, session created and cookie set
/// * `Err(Status::BadRequest)` - Empty email or password provided
/// * `Err(Status::Unauthorized)` - Unknown user, wrong password, or
///   deactivated account; deliberately indistinguishable to the caller
/// * `Err(Status::InternalServerError)` - Database operation failed
pub async fn process_login<D: DbRunner>(
    db: &D,
    cookies: &CookieJar<'_>,
    email: &str,
    password: &str,
) -> Result<User, Status> {
    if email.trim().is_empty() || password.trim().is_empty() {
        return Err(Status::BadRequest);
    }

    let user = match find_user_by_email(db, &email.to_lowercase()).await? {
        Some(user) => user,
        None => return Err(Status::Unauthorized),
    };

    if !user.is_active || !verify_password(password, &user.password_hash) {
        return Err(Status::Unauthorized);
    }

    let session_token = create_and_store_session(db, user.id).await?;
    set_session_cookie(cookies, &session_token);

    Ok(user)
}

/// Hashes a password using Argon2 with a random salt.
///
/// # Panics
/// Panics if hashing fails (should not happen in normal operation)
pub fn hash_password(password: &str) -> String {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .expect("Hashing should succeed")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_password() {
        let password = "correct_password";
        let wrong_password = "wrong_password";
        let hash = hash_password(password);

        assert!(verify_password(password, &hash));
        assert!(!verify_password(wrong_password, &hash));
    }

    #[test]
    fn malformed_stored_hash_never_verifies() {
        assert!(!verify_password("anything", "not-an-argon2-hash"));
    }

    #[cfg(feature = "test-staging")]
    mod staged {
        use super::super::*;
        use crate::models::UserInput;
        use crate::orm::testing::{setup_test_db, setup_test_dbconn};
        use crate::orm::user::insert_user;

        #[tokio::test]
        async fn test_find_user_by_email() {
            let mut conn = setup_test_db();

            let inserted = insert_user(
                &mut conn,
                UserInput {
                    email: "karla@example.com".to_string(),
                    password_hash: hash_password("dummy password"),
                    is_staff: false,
                },
            )
            .expect("insert dummy user");

            let fake_db = setup_test_dbconn(&mut conn);

            let found = find_user_by_email(&fake_db, "karla@example.com")
                .await
                .expect("db query should succeed");

            assert!(found.is_some());
            let found_user = found.unwrap();
            assert_eq!(found_user.email, inserted.email);
            assert_eq!(found_user.password_hash, inserted.password_hash);
            assert!(found_user.is_active);
        }

        #[tokio::test]
        async fn test_create_and_store_session() {
            let mut conn = setup_test_db();

            let inserted = insert_user(
                &mut conn,
                UserInput {
                    email: "karla@example.com".to_string(),
                    password_hash: hash_password("dummy password"),
                    is_staff: false,
                },
            )
            .expect("insert dummy user");

            let fake_db = setup_test_dbconn(&mut conn);

            let session_token = create_and_store_session(&fake_db, inserted.id)
                .await
                .expect("session creation should succeed");

            let token_clone = session_token.clone();
            let stored = fake_db
                .run(move |conn| {
                    sessions::table
                        .filter(sessions::id.eq(&session_token))
                        .first::<crate::models::Session>(conn)
                        .optional()
                })
                .await
                .expect("db query should succeed");

            assert!(stored.is_some());
            let session = stored.unwrap();
            assert_eq!(session.id, token_clone);
            assert_eq!(session.user_id, inserted.id);
            assert!(!session.revoked);
            assert!(session.expires_at.is_none());

            let now = Utc::now().naive_utc();
            assert!(session.created_at <= now);
            assert!(session.created_at > now - chrono::Duration::minutes(1));
        }
    }
}
