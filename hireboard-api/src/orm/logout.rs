//! Database operations for logout and session revocation.

use diesel::prelude::*;

use crate::orm::login::DbRunner;
use crate::schema::sessions::dsl::*;

/// Revokes a session by marking it as revoked in the database.
///
/// The row is kept rather than deleted so the session history remains
/// auditable; the token is unusable once revoked.
///
/// # Returns
/// * `Ok(usize)` - Number of rows affected (0 for unknown session ids)
/// * `Err(diesel::result::Error)` - Database operation failed
pub async fn revoke_session<D: DbRunner>(
    db: &D,
    session_id: &str,
) -> Result<usize, diesel::result::Error> {
    let session_id = session_id.to_string();
    db.run(move |conn| {
        diesel::update(sessions.filter(id.eq(&session_id)))
            .set(revoked.eq(true))
            .execute(conn)
    })
    .await
}
