use actix_web::{
    body::BoxBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::Method,
    web, Error, HttpMessage, ResponseError,
};
use futures_util::future::{ok, Ready, LocalBoxFuture};
use std::{rc::Rc, task::{Context, Poll}};

use crate::{entities::token::Claims, errors::AuthError, AppState};

/// Decodes a bearer token when one is sent and attaches its `Claims` to the
/// request. Requests without a token pass through untouched; whether a route
/// needs claims is decided by the `AuthClaims`/`AdminClaims` extractors.
pub struct AuthMiddleware;

impl<S> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthMiddlewareService {
            service: Rc::new(service),
        })
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            if req.method() == Method::OPTIONS {
                return service.call(req).await;
            }

            let Some(token) = extract_token(&req) else {
                return service.call(req).await;
            };

            match decode_claims(&req, &token) {
                Ok(claims) => {
                    req.extensions_mut().insert(claims);
                    service.call(req).await
                }
                Err(err) => {
                    tracing::warn!(path = %req.path(), "Rejected bearer token: {}", err);
                    let response = err.error_response();
                    Ok(req.into_response(response))
                }
            }
        })
    }
}

/// `None` when no `Authorization` header is sent. A header that is present
/// but not a bearer token yields an empty token, which fails to decode.
fn extract_token(req: &ServiceRequest) -> Option<String> {
    let header = req.headers().get("Authorization")?;
    let value = header.to_str().unwrap_or_default();

    let parts: Vec<&str> = value.split_whitespace().collect();
    if parts.len() == 2 && parts[0].eq_ignore_ascii_case("bearer") {
        Some(parts[1].to_string())
    } else {
        Some(String::new())
    }
}

fn decode_claims(req: &ServiceRequest, token: &str) -> Result<Claims, AuthError> {
    if token.is_empty() {
        return Err(AuthError::InvalidToken);
    }

    let state = req.app_data::<web::Data<AppState>>().ok_or_else(|| {
        tracing::error!("AppState missing in middleware");
        AuthError::MissingJwtService
    })?;

    let decoded = state.auth_handler.token_service.decode_jwt(token)?;
    Ok(decoded.claims)
}
