mod client;
pub mod convert;
pub mod models;
pub mod token;

pub use client::GoogleCalendarSource;
pub use token::{ClientCredentials, StoredToken, TokenManager};
