//! Database operations for the registration and email-verification flow.
//!
//! Registration never writes to the users table directly. A submission
//! parks the hashed password behind a random verification code in
//! `pending_users`; only a confirmed code promotes it to a real account.

use chrono::Utc;
use diesel::prelude::*;
use rand::distr::{Alphanumeric, SampleString};

use crate::models::{NewPendingUser, PendingUser, User, UserInput};
use crate::orm::user::insert_user;
use crate::schema::pending_users;

const VERIFICATION_CODE_LEN: usize = 10;

/// Generates a random opaque verification code.
pub fn generate_verification_code() -> String {
    Alphanumeric.sample_string(&mut rand::rng(), VERIFICATION_CODE_LEN)
}

/// Creates or replaces the pending registration for an email address.
///
/// Keyed on email: re-registering before verification overwrites the stored
/// hash and code and restarts the validity window, so the prior code stops
/// working. Expired rows are overwritten the same way.
pub fn upsert_pending_user(
    conn: &mut SqliteConnection,
    email: &str,
    password_hash: &str,
    verification_code: &str,
) -> Result<PendingUser, diesel::result::Error> {
    let new_pending = NewPendingUser {
        email: email.to_string(),
        password_hash: password_hash.to_string(),
        verification_code: verification_code.to_string(),
        created_at: Utc::now().naive_utc(),
    };

    diesel::insert_into(pending_users::table)
        .values(&new_pending)
        .on_conflict(pending_users::email)
        .do_update()
        .set((
            pending_users::password_hash.eq(&new_pending.password_hash),
            pending_users::verification_code.eq(&new_pending.verification_code),
            pending_users::created_at.eq(new_pending.created_at),
        ))
        .execute(conn)?;

    pending_users::table
        .filter(pending_users::email.eq(email))
        .first::<PendingUser>(conn)
}

/// Looks up a pending registration by the (email, code) pair. Expiry is not
/// checked here; callers decide what an expired row means.
pub fn find_pending_registration(
    conn: &mut SqliteConnection,
    email: &str,
    code: &str,
) -> Result<Option<PendingUser>, diesel::result::Error> {
    pending_users::table
        .filter(pending_users::email.eq(email))
        .filter(pending_users::verification_code.eq(code))
        .first::<PendingUser>(conn)
        .optional()
}

/// Promotes a verified pending registration to a real user account.
///
/// User creation and pending-row deletion run in one transaction so a crash
/// cannot leave both rows behind. The stored hash is moved as-is; the raw
/// password never existed on this side.
pub fn promote_pending_user(
    conn: &mut SqliteConnection,
    pending: &PendingUser,
) -> Result<User, diesel::result::Error> {
    let email = pending.email.clone();
    let password_hash = pending.password_hash.clone();
    let pending_id = pending.id;

    conn.transaction(|conn| {
        let user = insert_user(
            conn,
            UserInput {
                email,
                password_hash,
                is_staff: false,
            },
        )?;

        diesel::delete(pending_users::table.filter(pending_users::id.eq(pending_id)))
            .execute(conn)?;

        Ok(user)
    })
}
