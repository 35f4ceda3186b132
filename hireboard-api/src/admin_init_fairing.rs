//! First-boot bootstrap of an operator account.
//!
//! Registration only ever produces ordinary accounts, so a fresh deployment
//! has no staff user until one is created out of band. When
//! `HIREBOARD_ADMIN_EMAIL` and `HIREBOARD_ADMIN_PASSWORD` are set, this
//! fairing creates that account on ignite if it does not exist yet.

use rocket::fairing::AdHoc;

use crate::DbConn;
use crate::models::UserInput;
use crate::orm::login::hash_password;
use crate::orm::user::{get_user_by_email, insert_user};

pub fn admin_init_fairing() -> AdHoc {
    AdHoc::on_ignite("Admin Init", |rocket| async {
        let email = std::env::var("HIREBOARD_ADMIN_EMAIL").ok();
        let password = std::env::var("HIREBOARD_ADMIN_PASSWORD").ok();

        let (Some(email), Some(password)) = (email, password) else {
            info!("[admin-init] HIREBOARD_ADMIN_EMAIL not set; skipping bootstrap");
            return rocket;
        };

        let conn = DbConn::get_one(&rocket)
            .await
            .expect("database connection for admin init");

        conn.run(move |c| {
            let email = email.to_lowercase();
            match get_user_by_email(c, &email) {
                Ok(Some(_)) => {
                    info!("[admin-init] staff user '{}' already exists", email);
                }
                Ok(None) => {
                    let result = insert_user(
                        c,
                        UserInput {
                            email: email.clone(),
                            password_hash: hash_password(&password),
                            is_staff: true,
                        },
                    );
                    match result {
                        Ok(_) => info!("[admin-init] created staff user '{}'", email),
                        Err(e) => error!("[admin-init] failed to create staff user: {:?}", e),
                    }
                }
                Err(e) => error!("[admin-init] lookup failed: {:?}", e),
            }
        })
        .await;

        rocket
    })
}
