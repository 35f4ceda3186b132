pub mod enums;
pub mod job_advert;
pub mod job_application;
pub mod pending_user;
pub mod session;
pub mod token;
pub mod user;

// Re-export models for easier access
pub use enums::*;
pub use job_advert::*;
pub use job_application::*;
pub use pending_user::*;
pub use session::*;
pub use token::*;
pub use user::*;

/// Window during which a verification code or reset token stays usable,
/// measured from its creation time. Checked on access, never swept.
pub const VALIDITY_WINDOW_SECS: i64 = 20 * 60;
