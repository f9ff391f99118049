//! Rate limiting middleware.

use actix_web::{
    Error, HttpMessage, HttpRequest, HttpResponse,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    web,
};
use redator_shared::ErrorResponse;
use std::future::{Future, Ready, ready};
use std::pin::Pin;
use std::rc::Rc;
use std::sync::Arc;

use redator_core::ports::RateLimiter;

use crate::middleware::auth::authenticate;
use crate::middleware::error::AppError;
use crate::observability::RequestId;

/// Rate limiting middleware factory.
///
/// The limiter is taken from app data; without one, requests pass.
pub struct RateLimitMiddleware;

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
        }))
    }
}

pub struct RateLimitMiddlewareService<S> {
    service: Rc<S>,
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
        let service = self.service.clone();
        let limiter = req
            .app_data::<web::Data<Arc<dyn RateLimiter>>>()
            .map(|data| data.get_ref().clone());

        let key = rate_limit_key(req.request());

        Box::pin(async move {
            let Some(limiter) = limiter else {
                let res = service.call(req).await?;
                return Ok(res.map_into_left_body());
            };

            match limiter.check(&key).await {
                Ok(result) if !result.allowed => {
                    tracing::warn!(key = %key, "Rate limit exceeded");

                    let retry_after = result.reset_after.as_secs().max(1);
                    let mut error = ErrorResponse::too_many_requests()
                        .with_detail(format!(
                            "Rate limit exceeded. Try again in {} seconds.",
                            retry_after
                        ))
                        .with_instance(req.path());
                    if let Some(id) = req.extensions().get::<RequestId>() {
                        error = error.with_request_id(id.as_str());
                    }

                    let response = HttpResponse::TooManyRequests()
                        .insert_header(("X-RateLimit-Remaining", "0"))
                        .insert_header(("Retry-After", retry_after.to_string()))
                        .json(error);

                    Ok(req.into_response(response).map_into_right_body())
                }
                Ok(_) => {
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Err(e) => {
                    // Fail open
                    tracing::error!(error = %e, "Rate limiter error, failing open");
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
            }
        })
    }
}

/// Requests are counted per authenticated user, falling back to the client
/// address.
fn rate_limit_key(req: &HttpRequest) -> String {
    match authenticate(req) {
        Ok(claims) => format!("user:{}", claims.user_id),
        Err(_) => format!(
            "ip:{}",
            req.connection_info().realip_remote_addr().unwrap_or("unknown")
        ),
    }
}

/// Count one model-backed request made outside the rate-limited scope.
///
/// Shares the budget of [`RateLimitMiddleware`]; without a limiter, or when
/// the limiter fails, the request is admitted.
pub async fn admit(req: &HttpRequest) -> Result<(), AppError> {
    let Some(limiter) = req
        .app_data::<web::Data<Arc<dyn RateLimiter>>>()
        .map(|data| data.get_ref().clone())
    else {
        return Ok(());
    };

    let key = rate_limit_key(req);
    match limiter.check(&key).await {
        Ok(result) if !result.allowed => {
            tracing::warn!(key = %key, "Rate limit exceeded");
            Err(AppError::TooManyRequests {
                retry_after: result.reset_after.as_secs().max(1),
            })
        }
        Ok(_) => Ok(()),
        Err(e) => {
            tracing::error!(error = %e, "Rate limiter error, failing open");
            Ok(())
        }
    }
}
