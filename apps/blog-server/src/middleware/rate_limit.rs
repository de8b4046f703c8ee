//! Throttling for credential endpoints.

use actix_web::{
    Error, ResponseError,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::Method,
};
use std::future::{Future, Ready, ready};
use std::pin::Pin;
use std::rc::Rc;
use std::sync::Arc;

use inkwell_core::ports::{RateLimitDecision, RateLimiter};

use crate::middleware::error::AppError;

/// Limits `POST`s to the wrapped resource per client address.
/// Other methods pass straight through, as does everything when no limiter
/// is configured.
///
/// The client address is the socket peer. `Forwarded` and `X-Forwarded-For`
/// are client-controlled, so they only count with `trust_proxy_headers` set,
/// which is for deployments behind a proxy that overwrites them.
pub struct RateLimitMiddleware {
    limiter: Option<Arc<dyn RateLimiter>>,
    trust_proxy_headers: bool,
}

impl RateLimitMiddleware {
    pub fn new(limiter: Option<Arc<dyn RateLimiter>>, trust_proxy_headers: bool) -> Self {
        Self {
            limiter,
            trust_proxy_headers,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RateLimitMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddlewareService {
            service: Rc::new(service),
            limiter: self.limiter.clone(),
            trust_proxy_headers: self.trust_proxy_headers,
        }))
    }
}

pub struct RateLimitMiddlewareService<S> {
    service: Rc<S>,
    limiter: Option<Arc<dyn RateLimiter>>,
    trust_proxy_headers: bool,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        let limiter = match &self.limiter {
            Some(limiter) if req.method() == Method::POST => Arc::clone(limiter),
            _ => {
                return Box::pin(async move {
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                });
            }
        };

        let key = client_key(&req, self.trust_proxy_headers);

        Box::pin(async move {
            match limiter.check(&key).await {
                Ok(RateLimitDecision::Limited { retry_after }) => {
                    tracing::warn!(client = %key, path = %req.path(), "Rate limit exceeded");
                    let response = AppError::TooManyRequests { retry_after }.error_response();
                    return Ok(req.into_response(response).map_into_right_body());
                }
                Ok(RateLimitDecision::Allowed) => {}
                Err(e) => {
                    // Fail open: throttling is not worth locking users out.
                    tracing::error!(error = %e, "Rate limiter error, failing open");
                }
            }

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

fn client_key(req: &ServiceRequest, trust_proxy_headers: bool) -> String {
    let forwarded = trust_proxy_headers
        .then(|| req.connection_info().realip_remote_addr().map(String::from))
        .flatten();

    forwarded
        .or_else(|| req.peer_addr().map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn request() -> ServiceRequest {
        TestRequest::post()
            .peer_addr("192.0.2.7:50000".parse().unwrap())
            .insert_header(("X-Forwarded-For", "203.0.113.9"))
            .to_srv_request()
    }

    #[test]
    fn test_forwarded_header_ignored_by_default() {
        assert_eq!(client_key(&request(), false), "192.0.2.7");
    }

    #[test]
    fn test_forwarded_header_used_when_trusted() {
        assert_eq!(client_key(&request(), true), "203.0.113.9");
    }
}
