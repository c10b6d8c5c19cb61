pub mod auth;

pub use auth::CurrentStaff;
