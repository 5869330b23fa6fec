pub mod session;

pub use session::{SessionManager, AUTH_COOKIE};
