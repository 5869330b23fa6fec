use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::{info, warn};

use crate::core::{AppError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Name of the session cookie
pub const AUTH_COOKIE: &str = "auth-token";

/// Issues and checks signed session tokens for the single dashboard account.
///
/// Token layout: `<username-hex>.<expires-unix>.<hmac-sha256-hex>`, the MAC
/// covering the first two parts.
pub struct SessionManager {
    username: String,
    password: String,
    secret: Vec<u8>,
    ttl: Duration,
    secure_cookies: bool,
}

impl SessionManager {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        secret: impl AsRef<[u8]>,
        ttl_hours: u32,
        secure_cookies: bool,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            secret: secret.as_ref().to_vec(),
            ttl: Duration::hours(i64::from(ttl_hours)),
            secure_cookies,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Whether cookies should carry the Secure attribute
    pub fn secure_cookies(&self) -> bool {
        self.secure_cookies
    }

    fn mac(&self) -> Result<HmacSha256> {
        HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| AppError::internal(format!("Invalid signing key: {}", e)))
    }

    /// Constant-time comparison of two secrets through their MACs
    fn matches(&self, provided: &str, expected: &str) -> Result<bool> {
        let mut expected_mac = self.mac()?;
        expected_mac.update(expected.as_bytes());
        let expected_tag = expected_mac.finalize().into_bytes();

        let mut provided_mac = self.mac()?;
        provided_mac.update(provided.as_bytes());
        Ok(provided_mac.verify_slice(&expected_tag).is_ok())
    }

    /// Check credentials and issue a token valid from now
    pub fn login(&self, username: &str, password: &str) -> Result<String> {
        // evaluate both so timing does not reveal which one was wrong
        let user_ok = self.matches(username, &self.username)?;
        let password_ok = self.matches(password, &self.password)?;

        if !(user_ok && password_ok) {
            warn!("Rejected login attempt");
            return Err(AppError::unauthorized("Invalid credentials"));
        }

        info!(username = %username, "Session issued");
        self.issue(username, Utc::now())
    }

    /// Sign a token for `username` expiring one TTL after `now`
    pub fn issue(&self, username: &str, now: DateTime<Utc>) -> Result<String> {
        let expires = (now + self.ttl).timestamp();
        let payload = format!("{}.{}", hex::encode(username.as_bytes()), expires);

        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        let signature = hex::encode(mac.finalize().into_bytes());

        Ok(format!("{}.{}", payload, signature))
    }

    /// Username carried by a valid, unexpired token
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<String> {
        let invalid = || AppError::unauthorized("Invalid session");

        let mut parts = token.split('.');
        let (user_hex, expires, signature) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(user), Some(expires), Some(signature), None) => (user, expires, signature),
            _ => return Err(invalid()),
        };

        let signature = hex::decode(signature).map_err(|_| invalid())?;
        let mut mac = self.mac()?;
        mac.update(user_hex.as_bytes());
        mac.update(b".");
        mac.update(expires.as_bytes());
        mac.verify_slice(&signature).map_err(|_| invalid())?;

        let expires: i64 = expires.parse().map_err(|_| invalid())?;
        if now.timestamp() >= expires {
            return Err(AppError::unauthorized("Session expired"));
        }

        let username = hex::decode(user_hex).map_err(|_| invalid())?;
        String::from_utf8(username).map_err(|_| invalid())
    }
}
