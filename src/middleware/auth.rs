use crate::core::AppError;
use crate::modules::auth::services::{SessionManager, AUTH_COOKIE};
use actix_web::{
    body::{BoxBody, EitherBody},
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage, ResponseError,
};
use chrono::Utc;
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;

/// Username of the session behind the current request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(pub String);

/// Paths reachable without a session
pub fn is_public_path(path: &str) -> bool {
    path == "/health" || path == "/ready" || path.starts_with("/api/auth/")
}

/// Session cookie authentication middleware
pub struct CookieAuth {
    sessions: Arc<SessionManager>,
}

impl CookieAuth {
    pub fn new(sessions: Arc<SessionManager>) -> Self {
        Self { sessions }
    }
}

impl<S, B> Transform<S, ServiceRequest> for CookieAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<BoxBody, B>>;
    type Error = Error;
    type InitError = ();
    type Transform = CookieAuthMiddleware<S>;
    type Future = Ready<std::result::Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CookieAuthMiddleware {
            service: Rc::new(service),
            sessions: self.sessions.clone(),
        }))
    }
}

pub struct CookieAuthMiddleware<S> {
    service: Rc<S>,
    sessions: Arc<SessionManager>,
}

impl<S, B> Service<ServiceRequest> for CookieAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<BoxBody, B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, std::result::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let svc = self.service.clone();
        let sessions = self.sessions.clone();

        Box::pin(async move {
            if is_public_path(req.path()) {
                return svc.call(req).await.map(|res| res.map_into_right_body());
            }

            let verified = match req.cookie(AUTH_COOKIE) {
                Some(cookie) => sessions.verify(cookie.value(), Utc::now()),
                None => Err(AppError::unauthorized("Missing session cookie")),
            };

            match verified {
                Ok(username) => {
                    req.extensions_mut().insert(AuthenticatedUser(username));
                    svc.call(req).await.map(|res| res.map_into_right_body())
                }
                Err(e) => {
                    tracing::debug!(path = %req.path(), error = %e, "Rejected unauthenticated request");
                    let http_response = e.error_response();
                    Ok(req.into_response(http_response).map_into_left_body())
                }
            }
        })
    }
}
