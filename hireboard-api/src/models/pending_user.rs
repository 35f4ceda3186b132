use chrono::{NaiveDateTime, Utc};
use diesel::{Identifiable, Insertable, Queryable};

use crate::models::VALIDITY_WINDOW_SECS;
use crate::schema::pending_users;

/// A registration awaiting email verification. At most one row per email;
/// re-registering replaces the stored hash and code in place.
#[derive(Queryable, Identifiable, Debug)]
pub struct PendingUser {
    pub id: i32,
    pub email: String,
    pub password_hash: String,
    pub verification_code: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = pending_users)]
pub struct NewPendingUser {
    pub email: String,
    pub password_hash: String,
    pub verification_code: String,
    pub created_at: NaiveDateTime,
}

impl PendingUser {
    /// Whether the verification code is still usable. The window is closed
    /// at the upper bound: a check exactly at the window edge passes.
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now().naive_utc())
    }

    pub fn is_valid_at(&self, now: NaiveDateTime) -> bool {
        now - self.created_at <= chrono::Duration::seconds(VALIDITY_WINDOW_SECS)
    }
}
