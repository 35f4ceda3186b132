use chrono::NaiveDateTime;
use diesel::{Identifiable, Insertable, Queryable};

use crate::schema::users;

#[derive(Queryable, Identifiable, Debug, Clone)]
#[diesel(table_name = users)]
pub struct User {
    pub id: i32,
    pub email: String, // Sole identity field, stored lowercase and unique
    pub password_hash: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub created_at: NaiveDateTime,
}

/// Caller-supplied fields for user creation, before the row id exists.
pub struct UserInput {
    pub email: String,
    pub password_hash: String,
    pub is_staff: bool,
}
