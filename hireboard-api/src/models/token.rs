use chrono::{NaiveDateTime, Utc};
use diesel::{Identifiable, Insertable, Queryable};

use crate::models::VALIDITY_WINDOW_SECS;
use crate::schema::tokens;

/// A single-use credential mailed to a user, currently only for password
/// resets. One live row per (user, type); reissuing replaces the string.
#[derive(Queryable, Identifiable, Debug)]
pub struct Token {
    pub id: String, // UUID
    pub user_id: i32,
    pub token: String,
    pub token_type: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = tokens)]
pub struct NewToken {
    pub id: String,
    pub user_id: i32,
    pub token: String,
    pub token_type: String,
    pub created_at: NaiveDateTime,
}

impl Token {
    /// Whether the token is still usable, closed at the upper bound.
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now().naive_utc())
    }

    pub fn is_valid_at(&self, now: NaiveDateTime) -> bool {
        now - self.created_at <= chrono::Duration::seconds(VALIDITY_WINDOW_SECS)
    }
}
