use std::sync::Arc;

use actix_web::cookie::{time, Cookie, SameSite};
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::core::error::AppError;
use crate::middleware::RateLimiter;
use crate::modules::auth::services::{SessionManager, AUTH_COOKIE};

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

fn session_cookie(sessions: &SessionManager, token: String) -> Cookie<'static> {
    Cookie::build(AUTH_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(sessions.secure_cookies())
        .max_age(time::Duration::seconds(sessions.ttl().num_seconds()))
        .finish()
}

/// Exchange credentials for a session cookie
/// POST /auth/login
pub async fn login(
    sessions: web::Data<Arc<SessionManager>>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let token = sessions.login(&request.username, &request.password)?;

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(&sessions, token))
        .json(serde_json::json!({ "authenticated": true })))
}

/// Clear the session cookie
/// POST /auth/logout
pub async fn logout() -> Result<HttpResponse, AppError> {
    let mut cookie = Cookie::build(AUTH_COOKIE, "").path("/").finish();
    cookie.make_removal();

    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(serde_json::json!({ "authenticated": false })))
}

/// Configure auth routes; login is throttled by `limiter`
pub fn configure(cfg: &mut web::ServiceConfig, limiter: RateLimiter) {
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(limiter)
                    .route(web::post().to(login)),
            )
            .route("/logout", web::post().to(logout)),
    );
}
