//! Permission-gating middleware.

use std::future::Future;
use std::pin::Pin;

use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

use super::access::Access;
use super::permission::Permission;
use crate::api::error_response;
use crate::auth::AuthUser;

/// Middleware factory rejecting requests whose roles do not allow
/// `permission`.
///
/// Only [`Access::Allowed`] passes; `Denied` and `Undefined` both answer 403.
/// Must run after `require_auth`; a request without an `AuthUser` is treated
/// as having no roles.
///
/// ```ignore
/// Router::new()
///     .route("/users/{id}", get(handler))
///     .layer(axum::middleware::from_fn(require_permission(Permission::AdminDashboard)))
/// ```
pub fn require_permission(
    permission: Permission,
) -> impl Fn(Request, Next) -> Pin<Box<dyn Future<Output = Response> + Send>> + Clone + Send + 'static
{
    move |request: Request, next: Next| {
        Box::pin(async move {
            let access = request
                .extensions()
                .get::<AuthUser>()
                .map_or(Access::Undefined, |user| user.roles.access(permission));

            if access.is_allowed() {
                next.run(request).await
            } else {
                debug!(%permission, ?access, "Permission check rejected request");
                error_response(StatusCode::FORBIDDEN, "Forbidden")
            }
        })
    }
}
