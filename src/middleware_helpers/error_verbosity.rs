use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::future::Future;

tokio::task_local! {
    static EXPOSE_INTERNAL_ERRORS: bool;
}

/// Runs `future` with the given error verbosity policy in effect.
pub async fn scope_error_verbosity<Fut, R>(expose: bool, future: Fut) -> R
where
    Fut: Future<Output = R>,
{
    EXPOSE_INTERNAL_ERRORS.scope(expose, future).await
}

/// Whether the current request may see unclassified error messages.
/// Outside a scope nothing is exposed.
pub fn internal_errors_exposed() -> bool {
    EXPOSE_INTERNAL_ERRORS.try_with(|v| *v).unwrap_or(false)
}

/// Scopes the configured verbosity around each request.
pub async fn error_verbosity_middleware(
    State(expose): State<bool>,
    request: Request,
    next: Next,
) -> Response {
    scope_error_verbosity(expose, next.run(request)).await
}
