pub mod auth;
pub mod health;
pub mod overview;
pub mod reports;
pub mod sectors;
