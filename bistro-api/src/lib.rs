#[macro_use]
extern crate rocket;

use rocket::figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use rocket::{Build, Rocket};

pub mod api;
pub mod models;
pub mod orm;
pub mod schema;
#[cfg(feature = "test-staging")]
pub mod testing;

pub use orm::DbConn;

pub fn mount_api_routes(rocket: Rocket<Build>) -> Rocket<Build> {
    rocket.mount("/api", api::routes())
}

#[launch]
pub fn rocket() -> Rocket<Build> {
    let database_url = std::env::var("BISTRO_DATABASE_URL").expect("BISTRO_DATABASE_URL must be set");

    let figment = Figment::from(rocket::Config::default())
        .merge(Toml::file("Rocket.toml").nested())
        .merge(Env::prefixed("ROCKET_").global())
        .merge(("databases.bistro_db.url", database_url));

    let rocket = rocket::custom(figment)
        .attach(DbConn::fairing())
        .attach(orm::run_migrations_fairing());

    mount_api_routes(rocket)
}
