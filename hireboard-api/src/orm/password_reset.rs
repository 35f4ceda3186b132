//! Database operations for the password-reset token lifecycle.
//!
//! One live token per (user, type): issuing is a keyed replace, so a new
//! reset request invalidates the previously mailed token string. Tokens are
//! single-use and deleted on consumption; expired rows simply sit until the
//! next reissue overwrites them.

use chrono::Utc;
use diesel::prelude::*;
use rand::distr::{Alphanumeric, SampleString};
use uuid::Uuid;

use crate::models::{NewToken, Token, TokenType};
use crate::orm::user::set_password_hash;
use crate::schema::{tokens, users};

const RESET_TOKEN_LEN: usize = 20;

/// Generates a random opaque reset token string.
pub fn generate_reset_token() -> String {
    Alphanumeric.sample_string(&mut rand::rng(), RESET_TOKEN_LEN)
}

/// Creates or replaces the PASSWORD_RESET token for a user.
///
/// The row id survives a reissue; the token string and creation time are
/// replaced, restarting the validity window.
pub fn upsert_password_reset_token(
    conn: &mut SqliteConnection,
    target_user_id: i32,
) -> Result<Token, diesel::result::Error> {
    let new_token = NewToken {
        id: Uuid::new_v4().to_string(),
        user_id: target_user_id,
        token: generate_reset_token(),
        token_type: TokenType::PasswordReset.as_str().to_string(),
        created_at: Utc::now().naive_utc(),
    };

    diesel::insert_into(tokens::table)
        .values(&new_token)
        .on_conflict((tokens::user_id, tokens::token_type))
        .do_update()
        .set((
            tokens::token.eq(&new_token.token),
            tokens::created_at.eq(new_token.created_at),
        ))
        .execute(conn)?;

    tokens::table
        .filter(tokens::user_id.eq(target_user_id))
        .filter(tokens::token_type.eq(TokenType::PasswordReset.as_str()))
        .first::<Token>(conn)
}

/// Finds the PASSWORD_RESET token matching an (email, token string) pair.
///
/// Wrong email and wrong token both come back as `None`; callers fold that
/// together with expiry into one indistinguishable failure so the endpoint
/// cannot be used to probe which part was wrong.
pub fn find_reset_token(
    conn: &mut SqliteConnection,
    email: &str,
    token_string: &str,
) -> Result<Option<Token>, diesel::result::Error> {
    tokens::table
        .inner_join(users::table)
        .filter(users::email.eq(email))
        .filter(tokens::token.eq(token_string))
        .filter(tokens::token_type.eq(TokenType::PasswordReset.as_str()))
        .select(tokens::all_columns)
        .first::<Token>(conn)
        .optional()
}

/// Consumes a validated reset token: stores the new password hash and
/// deletes the token in one transaction (single-use).
pub fn consume_reset_token(
    conn: &mut SqliteConnection,
    token: &Token,
    new_password_hash: &str,
) -> Result<(), diesel::result::Error> {
    let token_id = token.id.clone();
    let target_user_id = token.user_id;
    let new_hash = new_password_hash.to_string();

    conn.transaction(|conn| {
        set_password_hash(conn, target_user_id, &new_hash)?;
        diesel::delete(tokens::table.filter(tokens::id.eq(token_id))).execute(conn)?;
        Ok(())
    })
}

#[cfg(all(test, feature = "test-staging"))]
mod tests {
    use super::*;
    use crate::models::UserInput;
    use crate::orm::login::{hash_password, verify_password};
    use crate::orm::testing::setup_test_db;
    use crate::orm::user::{get_user, insert_user};

    fn seeded_user(conn: &mut SqliteConnection) -> crate::models::User {
        insert_user(
            conn,
            UserInput {
                email: "reset@example.com".to_string(),
                password_hash: hash_password("old password"),
                is_staff: false,
            },
        )
        .expect("insert user")
    }

    #[test]
    fn reissue_replaces_the_token_string_in_place() {
        let mut conn = setup_test_db();
        let user = seeded_user(&mut conn);

        let first = upsert_password_reset_token(&mut conn, user.id).expect("first issue");
        let second = upsert_password_reset_token(&mut conn, user.id).expect("second issue");

        assert_eq!(first.id, second.id);
        assert_ne!(first.token, second.token);

        let count: i64 = tokens::table.count().get_result(&mut conn).unwrap();
        assert_eq!(count, 1);

        // The superseded string no longer resolves.
        let stale = find_reset_token(&mut conn, "reset@example.com", &first.token).unwrap();
        assert!(stale.is_none());
        let live = find_reset_token(&mut conn, "reset@example.com", &second.token).unwrap();
        assert!(live.is_some());
    }

    #[test]
    fn wrong_email_does_not_resolve_a_real_token() {
        let mut conn = setup_test_db();
        let user = seeded_user(&mut conn);
        let token = upsert_password_reset_token(&mut conn, user.id).expect("issue");

        let miss = find_reset_token(&mut conn, "other@example.com", &token.token).unwrap();
        assert!(miss.is_none());
    }

    #[test]
    fn consuming_sets_the_password_and_deletes_the_token() {
        let mut conn = setup_test_db();
        let user = seeded_user(&mut conn);
        let token = upsert_password_reset_token(&mut conn, user.id).expect("issue");

        let new_hash = hash_password("brand new password");
        consume_reset_token(&mut conn, &token, &new_hash).expect("consume");

        let reloaded = get_user(&mut conn, user.id).unwrap().unwrap();
        assert!(verify_password("brand new password", &reloaded.password_hash));

        let gone = find_reset_token(&mut conn, "reset@example.com", &token.token).unwrap();
        assert!(gone.is_none());
    }
}
