mod db;
pub mod job_advert;
pub mod job_application;
pub mod login;
pub mod logout;
pub mod pagination;
pub mod password_reset;
pub mod registration;
#[cfg(feature = "test-staging")]
pub mod testing;
pub mod user;

pub use db::*;
